use std::collections::HashMap;

use tracing::debug;

use crate::symbol::Symbol;
use crate::tokenizer::tokenize;

/// Occurrence count of every symbol seen across the inputs of a build run.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<Symbol, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable { counts: HashMap::new() }
    }

    /// Tokenizes `data` and counts every symbol in it.
    pub fn add_bytes(&mut self, data: &[u8]) {
        let before = self.counts.len();
        let mut seen = 0usize;
        for token in tokenize(data) {
            self.add_symbol(token);
            seen += 1;
        }
        debug!(symbols = seen, new_distinct = self.counts.len() - before, "counted buffer");
    }

    pub fn add_symbol(&mut self, token: &[u8]) {
        // avoid allocating a key for symbols already present
        if let Some(count) = self.counts.get_mut(token) {
            *count += 1;
        } else {
            self.counts.insert(Symbol::new(token), 1);
        }
    }

    pub fn get(&self, token: &[u8]) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, u64)> {
        self.counts.iter().map(|(symbol, &count)| (symbol, count))
    }

    /// Drains the table into (symbol, count) pairs ordered by count, then by
    /// symbol bytes, so tree construction is reproducible.
    pub fn into_sorted(self) -> Vec<(Symbol, u64)> {
        let mut entries: Vec<(Symbol, u64)> = self.counts.into_iter().collect();
        entries.sort_by(|(a, wa), (b, wb)| wa.cmp(wb).then_with(|| a.cmp(b)));
        entries
    }
}

impl<'a> FromIterator<&'a [u8]> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a [u8]>>(buffers: I) -> Self {
        let mut table = FrequencyTable::new();
        for data in buffers {
            table.add_bytes(data);
        }
        table
    }
}
