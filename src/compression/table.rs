//! Symbol tables shared by the frequency-driven coders.
//!
//! Both tables keep their symbols in insertion order. For a table built from
//! text that is the order in which each symbol first appears, which is what
//! the coders use to break frequency ties deterministically.

use crate::compression::Result;
use crate::error::Error;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Occurrence count for each distinct symbol of an input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<(char, usize)>,
    #[serde(skip)]
    index: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every character of `input`.
    pub fn from_text(input: &str) -> Self {
        let mut table = Self::new();
        for ch in input.chars() {
            table.add(ch);
        }
        table
    }

    /// Record one more occurrence of `symbol`.
    pub fn add(&mut self, symbol: char) {
        match self.index.get(&symbol) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, 1));
            }
        }
    }

    /// Set the count of `symbol`, returning the count it replaced.
    pub fn set(&mut self, symbol: char, count: usize) -> Option<usize> {
        match self.index.get(&symbol) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, count)),
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, count));
                None
            }
        }
    }

    pub fn get(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).map(|&slot| self.entries[slot].1)
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    ///
    /// Counts set by hand can sum past `usize::MAX`; that is an
    /// `Error::Format`.
    pub fn total(&self) -> Result<usize> {
        self.entries
            .iter()
            .try_fold(0usize, |sum, &(_, count)| sum.checked_add(count))
            .ok_or_else(|| Error::format("frequency counts overflow"))
    }

    /// Iterate `(symbol, count)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Symbols sorted by ascending count. Equal counts keep insertion order,
    /// digits included.
    pub fn ranked(&self) -> Vec<(char, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by_key(|&(_, count)| count);
        ranked
    }

    /// Symbols sorted lexicographically.
    pub fn sorted_by_symbol(&self) -> Vec<(char, usize)> {
        let mut sorted = self.entries.clone();
        sorted.sort_unstable_by_key(|&(symbol, _)| symbol);
        sorted
    }
}

/// Codeword (as a string of '0'/'1') assigned to each symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeTable {
    entries: Vec<(char, String)>,
    #[serde(skip)]
    index: HashMap<char, usize>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `code` to `symbol`, replacing any earlier codeword.
    pub fn insert(&mut self, symbol: char, code: String) {
        match self.index.get(&symbol) {
            Some(&slot) => self.entries[slot].1 = code,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, code));
            }
        }
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.index
            .get(&symbol)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.entries
            .iter()
            .map(|(symbol, code)| (*symbol, code.as_str()))
    }

    /// Map each codeword back to its symbol.
    pub fn reverse(&self) -> HashMap<&str, char> {
        self.iter().map(|(symbol, code)| (code, symbol)).collect()
    }

    /// Concatenate the codeword of every character of `input`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSymbol` for a character with no codeword.
    pub fn encode(&self, input: &str) -> Result<String> {
        let mut bits = String::new();
        for (position, symbol) in input.chars().enumerate() {
            let code = self
                .get(symbol)
                .ok_or(Error::UnknownSymbol { symbol, position })?;
            bits.push_str(code);
        }
        Ok(bits)
    }

    /// The shared codeword length, if every codeword has the same length.
    pub fn uniform_width(&self) -> Option<usize> {
        let mut widths = self.entries.iter().map(|(_, code)| code.len());
        let first = widths.next()?;
        widths.all(|w| w == first).then_some(first)
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (symbol, code)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{symbol}: {code}")?;
        }
        Ok(())
    }
}
