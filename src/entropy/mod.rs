//! Huffman code construction and stream coding
//!
//! The pipeline runs strictly in sequence, once per input:
//!
//! 1. [`count_frequencies`] reads the input once into a [`FrequencyTable`];
//! 2. [`HuffmanTree::build`] turns the table into a tree;
//! 3. [`EncodeTable::from_tree`] derives every symbol's code and
//!    [`EncodeTable::invert`] the matching [`DecodeTable`];
//! 4. [`encode`] and [`decode`] transform symbol streams and bit sequences.
//!
//! [`HuffmanCodec`] bundles steps 1-3 for the common case.

pub mod code_table;
pub mod codec;
pub mod frequency;
pub mod tree;

pub use code_table::{CodeStats, DecodeTable, EncodeTable};
pub use codec::{decode, decode_exact, encode, encode_symbols, HuffmanCodec, StreamDecoder};
pub use frequency::{count_frequencies, FrequencyTable};
pub use tree::{HuffmanTree, Node, NodeId, NodeKind};
