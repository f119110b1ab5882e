//! Encode and decode tables derived from a Huffman tree
//!
//! Both tables are plain values: they hold their own copies of symbols and
//! codes and keep no link to the tree they came from.

use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::bits::BitSequence;
use crate::entropy::frequency::FrequencyTable;
use crate::entropy::tree::HuffmanTree;
use crate::error::{HuffError, Result};

/// Symbol to code mapping (codes are root-to-leaf paths, root first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeTable<S: Ord> {
    codes: BTreeMap<S, BitSequence>,
}

impl<S: Ord + Clone> EncodeTable<S> {
    /// Derive the code of every leaf by walking parent links up to the root
    ///
    /// A tree made of a single leaf gives that symbol the empty code.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        let mut codes = BTreeMap::new();
        for (id, symbol) in tree.leaves() {
            let mut labels: Vec<bool> = tree.labels_to_root(id).collect();
            labels.reverse();
            codes.insert(symbol.clone(), labels.into_iter().collect());
        }

        let table = Self { codes };
        log::debug!(
            "Derived encode table: {} codes, max length {}",
            table.len(),
            table.max_code_length()
        );
        table
    }

    /// Build the inverse table
    pub fn invert(&self) -> DecodeTable<S> {
        DecodeTable::from_encode_table(self)
    }
}

impl<S: Ord> EncodeTable<S> {
    /// Code assigned to `symbol`
    pub fn get(&self, symbol: &S) -> Option<&BitSequence> {
        self.codes.get(symbol)
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when no symbol has a code
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(symbol, code)` pairs in ascending symbol order
    pub fn iter(&self) -> btree_map::Iter<'_, S, BitSequence> {
        self.codes.iter()
    }

    /// Length of the longest code
    pub fn max_code_length(&self) -> usize {
        self.codes.values().map(BitSequence::len).max().unwrap_or(0)
    }

    /// True if no code is a prefix of (or equal to) another
    pub fn is_prefix_free(&self) -> bool {
        is_prefix_free(self.codes.values())
    }

    /// A single symbol carrying the empty code
    pub fn is_degenerate(&self) -> bool {
        self.codes.len() == 1 && self.codes.values().all(BitSequence::is_empty)
    }

    /// Size statistics of encoding an input with the given frequencies
    ///
    /// Fails with [`HuffError::UnknownSymbol`] if a counted symbol has no code.
    pub fn stats(&self, frequencies: &FrequencyTable<S>) -> Result<CodeStats>
    where
        S: fmt::Debug,
    {
        let mut encoded_bits = 0u64;
        for (symbol, &count) in frequencies {
            let code = self.get(symbol).ok_or_else(|| HuffError::unknown_symbol(symbol))?;
            encoded_bits += code.len() as u64 * count;
        }

        let input_symbols = frequencies.total();
        let average_code_length = if input_symbols == 0 {
            0.0
        } else {
            encoded_bits as f64 / input_symbols as f64
        };

        Ok(CodeStats {
            distinct_symbols: self.len(),
            input_symbols,
            encoded_bits,
            average_code_length,
            max_code_length: self.max_code_length(),
        })
    }
}

impl<'a, S: Ord> IntoIterator for &'a EncodeTable<S> {
    type Item = (&'a S, &'a BitSequence);
    type IntoIter = btree_map::Iter<'a, S, BitSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Code to symbol mapping, the inverse of an [`EncodeTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable<S> {
    symbols: HashMap<BitSequence, S>,
    max_code_length: usize,
}

impl<S: Ord + Clone> DecodeTable<S> {
    /// Invert an encode table entry by entry
    pub fn from_encode_table(table: &EncodeTable<S>) -> Self {
        let symbols: HashMap<BitSequence, S> = table
            .iter()
            .map(|(symbol, code)| (code.clone(), symbol.clone()))
            .collect();
        Self {
            symbols,
            max_code_length: table.max_code_length(),
        }
    }

    /// Build a table from parsed `(code, symbol)` entries
    ///
    /// Rejects with [`HuffError::InvalidInput`] a code given twice, a symbol
    /// given twice, or a set of codes that is not prefix-free, since any of
    /// those would make decoding ambiguous.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (BitSequence, S)>,
        S: fmt::Debug,
    {
        let mut symbols = HashMap::new();
        let mut seen = BTreeSet::new();
        let mut max_code_length = 0;

        for (code, symbol) in entries {
            if !seen.insert(symbol.clone()) {
                return Err(HuffError::invalid_input(format!(
                    "symbol {:?} is assigned more than one code",
                    symbol
                )));
            }
            max_code_length = max_code_length.max(code.len());
            if let Some(previous) = symbols.insert(code.clone(), symbol) {
                return Err(HuffError::invalid_input(format!(
                    "code {} is assigned to more than one symbol (first {:?})",
                    code, previous
                )));
            }
        }

        if !is_prefix_free(symbols.keys()) {
            return Err(HuffError::invalid_input("decode table codes are not prefix-free"));
        }

        Ok(Self {
            symbols,
            max_code_length,
        })
    }

    /// Rebuild the forward table
    pub fn to_encode_table(&self) -> EncodeTable<S> {
        EncodeTable {
            codes: self
                .symbols
                .iter()
                .map(|(code, symbol)| (symbol.clone(), code.clone()))
                .collect(),
        }
    }

    /// `(symbol, code)` pairs in ascending symbol order
    pub fn sorted_entries(&self) -> Vec<(&S, &BitSequence)> {
        let mut entries: Vec<(&S, &BitSequence)> =
            self.symbols.iter().map(|(code, symbol)| (symbol, code)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<S> DecodeTable<S> {
    /// Symbol whose code is exactly `code`
    #[inline]
    pub fn get(&self, code: &BitSequence) -> Option<&S> {
        self.symbols.get(code)
    }

    /// Number of codes
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when the table holds no code
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Length of the longest code
    pub fn max_code_length(&self) -> usize {
        self.max_code_length
    }

    /// Unordered `(code, symbol)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&BitSequence, &S)> + '_ {
        self.symbols.iter()
    }

    /// The symbol of a single-symbol table with the empty code
    pub fn degenerate_symbol(&self) -> Option<&S> {
        if self.symbols.len() == 1 {
            self.symbols.get(&BitSequence::new())
        } else {
            None
        }
    }

    /// A single symbol carrying the empty code
    pub fn is_degenerate(&self) -> bool {
        self.degenerate_symbol().is_some()
    }

    /// True if no code is a prefix of another
    pub fn is_prefix_free(&self) -> bool {
        is_prefix_free(self.symbols.keys())
    }
}

/// Size statistics of a code applied to a known input
#[derive(Debug, Clone, PartialEq)]
pub struct CodeStats {
    /// Number of symbols with a code
    pub distinct_symbols: usize,
    /// Number of symbols in the input
    pub input_symbols: u64,
    /// Number of bits the encoded input occupies
    pub encoded_bits: u64,
    /// Encoded bits per input symbol
    pub average_code_length: f64,
    /// Longest code in the table
    pub max_code_length: usize,
}

impl CodeStats {
    /// Encoded size relative to a fixed-width encoding of `bits_per_symbol`
    pub fn compression_ratio(&self, bits_per_symbol: u32) -> f64 {
        if self.input_symbols == 0 || bits_per_symbol == 0 {
            return 0.0;
        }
        self.encoded_bits as f64 / (self.input_symbols as f64 * bits_per_symbol as f64)
    }
}

fn lexicographic(a: &BitSequence, b: &BitSequence) -> Ordering {
    a.iter().cmp(b.iter())
}

// In lexicographic order a code that prefixes any other code also prefixes
// its immediate successor, so checking neighbours is enough.
fn is_prefix_free<'a, I>(codes: I) -> bool
where
    I: Iterator<Item = &'a BitSequence>,
{
    let mut sorted: Vec<&BitSequence> = codes.collect();
    sorted.sort_by(|a, b| lexicographic(a, b));
    sorted.windows(2).all(|w| !w[1].starts_with(w[0]))
}
