//! Symbol frequency counting
//!
//! A [`FrequencyTable`] is produced once per run from a complete pass over the
//! input and never changes afterwards. Keys are kept in ascending symbol order
//! so that everything derived from the table is reproducible.

use std::collections::btree_map::{self, BTreeMap};

use crate::error::{HuffError, Result};
use crate::io::SymbolStream;

/// Occurrence count of every symbol seen in an input
///
/// Every symbol seen at least once has exactly one entry, and there is never
/// an entry with a zero count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Ord> {
    counts: BTreeMap<S, u64>,
    total: u64,
}

impl<S: Ord> FrequencyTable<S> {
    /// Count every symbol produced by an iterator
    pub fn from_symbols<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        let mut table = Self::empty();
        for symbol in symbols {
            table.increment(symbol);
        }
        table
    }

    /// Build a table from explicit `(symbol, count)` pairs
    ///
    /// Counts for a repeated symbol are summed and zero counts are dropped.
    /// Fails with [`HuffError::InvalidInput`] if the counts overflow `u64`.
    pub fn from_counts<I: IntoIterator<Item = (S, u64)>>(pairs: I) -> Result<Self> {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;
        for (symbol, count) in pairs {
            if count == 0 {
                continue;
            }
            let entry = counts.entry(symbol).or_insert(0u64);
            *entry = entry
                .checked_add(count)
                .ok_or_else(|| HuffError::invalid_input("symbol count overflows u64"))?;
            total = total
                .checked_add(count)
                .ok_or_else(|| HuffError::invalid_input("total symbol count overflows u64"))?;
        }
        Ok(Self { counts, total })
    }

    fn empty() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    // One count per consumed symbol, so neither counter can reach u64::MAX
    fn increment(&mut self, symbol: S) {
        *self.counts.entry(symbol).or_insert(0) += 1;
        self.total += 1;
    }

    /// Count of `symbol`, or `None` if it never occurred
    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    /// Whether `symbol` occurred at least once
    pub fn contains(&self, symbol: &S) -> bool {
        self.counts.contains_key(symbol)
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True for an empty input
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate `(symbol, count)` in ascending symbol order
    pub fn iter(&self) -> btree_map::Iter<'_, S, u64> {
        self.counts.iter()
    }

    /// Distinct symbols in ascending order
    pub fn symbols(&self) -> btree_map::Keys<'_, S, u64> {
        self.counts.keys()
    }
}

impl<'a, S: Ord> IntoIterator for &'a FrequencyTable<S> {
    type Item = (&'a S, &'a u64);
    type IntoIter = btree_map::Iter<'a, S, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Read `stream` to its end and count every symbol
///
/// The stream is left at end-of-stream; rewind it before a second pass.
/// An empty stream yields an empty table, which tree construction rejects.
pub fn count_frequencies<St>(stream: &mut St) -> Result<FrequencyTable<St::Symbol>>
where
    St: SymbolStream + ?Sized,
    St::Symbol: Ord,
{
    let mut table = FrequencyTable::empty();
    while let Some(symbol) = stream.next_symbol()? {
        table.increment(symbol);
    }
    log::debug!("Counted {} symbols, {} distinct", table.total(), table.len());
    Ok(table)
}
