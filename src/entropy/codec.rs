//! Stream encoding and decoding
//!
//! [`encode`] concatenates the code of every symbol of a stream. Decoding goes
//! through [`StreamDecoder`], which accumulates bits until they spell a code
//! from the decode table. Codes are prefix-free, so the first match is final
//! and the decoder never backtracks.

use std::fmt;

use crate::bits::BitSequence;
use crate::entropy::code_table::{CodeStats, DecodeTable, EncodeTable};
use crate::entropy::frequency::{count_frequencies, FrequencyTable};
use crate::entropy::tree::HuffmanTree;
use crate::error::{HuffError, Result};
use crate::io::SymbolStream;

/// Encode every symbol read from `stream`
///
/// Consumes the stream to its end. Fails with [`HuffError::UnknownSymbol`] on
/// the first symbol that has no code, which only happens when the table was
/// derived from a different input.
pub fn encode<St>(stream: &mut St, table: &EncodeTable<St::Symbol>) -> Result<BitSequence>
where
    St: SymbolStream + ?Sized,
    St::Symbol: Ord + fmt::Debug,
{
    let mut out = BitSequence::new();
    while let Some(symbol) = stream.next_symbol()? {
        let code = table
            .get(&symbol)
            .ok_or_else(|| HuffError::unknown_symbol(&symbol))?;
        out.extend_from(code);
    }
    Ok(out)
}

/// Encode symbols from any iterator
pub fn encode_symbols<'a, S, I>(symbols: I, table: &EncodeTable<S>) -> Result<BitSequence>
where
    S: Ord + fmt::Debug + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut out = BitSequence::new();
    for symbol in symbols {
        let code = table
            .get(symbol)
            .ok_or_else(|| HuffError::unknown_symbol(symbol))?;
        out.extend_from(code);
    }
    Ok(out)
}

/// Incremental decoder over one decode table
#[derive(Debug)]
pub struct StreamDecoder<'t, S> {
    table: &'t DecodeTable<S>,
    pending: BitSequence,
}

impl<'t, S: Clone> StreamDecoder<'t, S> {
    /// Decoder with an empty accumulator
    pub fn new(table: &'t DecodeTable<S>) -> Self {
        Self {
            table,
            pending: BitSequence::with_capacity(table.max_code_length()),
        }
    }

    /// Feed one bit; returns the symbol whose code it completes, if any
    #[inline]
    pub fn push_bit(&mut self, bit: bool) -> Option<S> {
        self.pending.push(bit);
        let symbol = self.table.get(&self.pending).cloned();
        if symbol.is_some() {
            self.pending.clear();
        }
        symbol
    }

    /// Bits accumulated since the last emitted symbol
    pub fn pending_bits(&self) -> usize {
        self.pending.len()
    }

    /// End of input: fails with [`HuffError::TruncatedStream`] if a partial
    /// code is still pending
    pub fn finish(self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(HuffError::truncated_stream(self.pending.len()))
        }
    }
}

/// Decode a bit stream back into symbols
///
/// Bits that never complete a code (including any bits at all against an
/// empty table) are reported as [`HuffError::TruncatedStream`] once the input
/// ends.
pub fn decode<S, I>(bits: I, table: &DecodeTable<S>) -> Result<Vec<S>>
where
    S: Clone,
    I: IntoIterator<Item = bool>,
{
    let mut decoder = StreamDecoder::new(table);
    let mut out = Vec::new();
    for bit in bits {
        if let Some(symbol) = decoder.push_bit(bit) {
            out.push(symbol);
        }
    }
    decoder.finish()?;
    Ok(out)
}

/// Decode exactly `count` symbols
///
/// A single-symbol table assigns the empty code, so its encoded form carries
/// no bits and only the symbol count can restore the input. For such a table
/// this returns `count` copies of the symbol (and any bit present is a
/// [`HuffError::TruncatedStream`]). For every other table the stream is
/// decoded normally and must produce exactly `count` symbols, otherwise
/// [`HuffError::LengthMismatch`] is returned.
pub fn decode_exact<S, I>(bits: I, table: &DecodeTable<S>, count: usize) -> Result<Vec<S>>
where
    S: Clone,
    I: IntoIterator<Item = bool>,
{
    if let Some(symbol) = table.degenerate_symbol() {
        let stray = bits.into_iter().count();
        if stray > 0 {
            return Err(HuffError::truncated_stream(stray));
        }
        return Ok(vec![symbol.clone(); count]);
    }

    let out = decode(bits, table)?;
    if out.len() != count {
        return Err(HuffError::length_mismatch(count, out.len()));
    }
    Ok(out)
}

/// Frequency table, tree and both code tables for one input
///
/// # Examples
///
/// ```rust
/// use huffcode::{HuffmanCodec, SliceSymbolStream};
///
/// let text: Vec<char> = "aaabbc".chars().collect();
/// let mut stream = SliceSymbolStream::new(&text);
///
/// let codec = HuffmanCodec::from_stream(&mut stream)?;
/// let bits = codec.encode(&mut stream)?;
/// assert_eq!(bits.to_string(), "000111110");
/// assert_eq!(codec.decode(&bits)?, text);
/// # Ok::<(), huffcode::HuffError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S: Ord> {
    frequencies: FrequencyTable<S>,
    tree: HuffmanTree<S>,
    encode_table: EncodeTable<S>,
    decode_table: DecodeTable<S>,
}

impl<S: Ord + Clone + fmt::Debug> HuffmanCodec<S> {
    /// Count `stream`, build the code, and rewind the stream for encoding
    pub fn from_stream<St>(stream: &mut St) -> Result<Self>
    where
        St: SymbolStream<Symbol = S> + ?Sized,
    {
        let frequencies = count_frequencies(stream)?;
        stream.rewind()?;
        Self::from_frequencies(frequencies)
    }

    /// Build the code for symbols held in memory
    pub fn from_symbols<I: IntoIterator<Item = S>>(symbols: I) -> Result<Self> {
        Self::from_frequencies(FrequencyTable::from_symbols(symbols))
    }

    /// Build the code for a frequency table
    pub fn from_frequencies(frequencies: FrequencyTable<S>) -> Result<Self> {
        let tree = HuffmanTree::build(&frequencies)?;
        let encode_table = EncodeTable::from_tree(&tree);
        let decode_table = encode_table.invert();
        Ok(Self {
            frequencies,
            tree,
            encode_table,
            decode_table,
        })
    }

    /// Encode the remainder of `stream`
    pub fn encode<St>(&self, stream: &mut St) -> Result<BitSequence>
    where
        St: SymbolStream<Symbol = S> + ?Sized,
    {
        encode(stream, &self.encode_table)
    }

    /// Encode an in-memory sequence
    pub fn encode_symbols<'a, I>(&self, symbols: I) -> Result<BitSequence>
    where
        S: 'a,
        I: IntoIterator<Item = &'a S>,
    {
        encode_symbols(symbols, &self.encode_table)
    }

    /// Decode a bit sequence
    pub fn decode(&self, bits: &BitSequence) -> Result<Vec<S>> {
        decode(bits.iter(), &self.decode_table)
    }

    /// Decode exactly `count` symbols; see [`decode_exact`]
    pub fn decode_exact(&self, bits: &BitSequence, count: usize) -> Result<Vec<S>> {
        decode_exact(bits.iter(), &self.decode_table, count)
    }

    /// Size statistics for the input the code was built from
    pub fn stats(&self) -> Result<CodeStats> {
        self.encode_table.stats(&self.frequencies)
    }
}

impl<S: Ord> HuffmanCodec<S> {
    /// Symbol counts of the input
    pub fn frequencies(&self) -> &FrequencyTable<S> {
        &self.frequencies
    }

    /// The Huffman tree
    pub fn tree(&self) -> &HuffmanTree<S> {
        &self.tree
    }

    /// Symbol to code table
    pub fn encode_table(&self) -> &EncodeTable<S> {
        &self.encode_table
    }

    /// Code to symbol table
    pub fn decode_table(&self) -> &DecodeTable<S> {
        &self.decode_table
    }
}
