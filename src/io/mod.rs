//! Symbol input and textual rendering
//!
//! These are the collaborators around the core: streams that feed symbols to
//! the counter and encoder, and the line-oriented text form of tables and bit
//! streams used by the command line tool.

pub mod symbol_stream;
pub mod text_table;

pub use symbol_stream::{CharStream, SliceSymbolStream, SymbolStream};
pub use text_table::{
    read_bits, read_decode_table, write_bits, write_decode_table, write_encode_table,
    write_frequencies,
};
