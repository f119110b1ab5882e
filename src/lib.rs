//! # huffcode: deterministic Huffman coding over symbol streams
//!
//! This crate builds prefix-free binary codes for a finite alphabet from
//! symbol frequencies (Huffman coding) and uses them to turn a symbol stream
//! into a bit sequence and back.
//!
//! ## Key Features
//!
//! - **Generic symbols**: any `Ord + Clone` type can be an alphabet symbol
//! - **Deterministic codes**: a documented tie-break rule makes the codes for
//!   a given frequency table identical on every run
//! - **Arena tree**: nodes are addressed by index, parent links included
//! - **Streaming decode**: bit-at-a-time decoding with truncation detection
//! - **Text format**: `<symbol>: <bits>` tables terminated by `END`
//!
//! ## Quick Start
//!
//! ```rust
//! use huffcode::{CharStream, HuffmanCodec};
//!
//! let mut input = CharStream::from_text("aaabbc", false);
//! let codec = HuffmanCodec::from_stream(&mut input)?;
//!
//! // `a` is the most frequent symbol and gets the shortest code
//! assert_eq!(codec.encode_table().get(&'a').map(|c| c.len()), Some(1));
//!
//! let bits = codec.encode(&mut input)?;
//! let text: String = codec.decode(&bits)?.into_iter().collect();
//! assert_eq!(text, "aaabbc");
//! # Ok::<(), huffcode::HuffError>(())
//! ```

#![warn(missing_docs)]

pub mod bits;
pub mod config;
pub mod entropy;
pub mod error;
pub mod io;

// Re-export core types
pub use bits::{parse_bits, BitSequence};
pub use error::{HuffError, Result};

pub use entropy::{
    count_frequencies, decode, decode_exact, encode, encode_symbols, CodeStats, DecodeTable,
    EncodeTable, FrequencyTable, HuffmanCodec, HuffmanTree, NodeId, NodeKind, StreamDecoder,
};
pub use io::{CharStream, SliceSymbolStream, SymbolStream};
pub use config::{CodecConfig, Config};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing huffcode v{}", VERSION);
}
