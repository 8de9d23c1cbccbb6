//! Alphabet-aware symbol sequences.

use std::fs::File;

use anyhow::Result;

use crate::store::{StoreConfig, ValueArray, ValueIter};

/// A text: `len` symbols drawn from an alphabet of `alphabet_size`
/// unsigned-integer symbols, stored in a [`ValueArray`].
///
/// Position `len` carries an implicit sentinel smaller than every real
/// symbol. It is never stored; the builders materialize it by rule.
pub struct Text {
    alphabet_size: u64,
    symbols: ValueArray,
}

impl Text {
    /// Create a zeroed text of `len` symbols over the given alphabet.
    pub fn new(config: &StoreConfig, alphabet_size: u64, len: u64) -> Result<Self> {
        let max_symbol = alphabet_size.saturating_sub(1).max(1);
        Ok(Self {
            alphabet_size,
            symbols: ValueArray::create(config, len, max_symbol)?,
        })
    }

    /// Build a byte text (alphabet 256) from a slice.
    pub fn from_bytes(config: &StoreConfig, bytes: &[u8]) -> Result<Self> {
        let mut text = Self::new(config, 256, bytes.len() as u64)?;
        for (i, &b) in bytes.iter().enumerate() {
            text.symbols.set(i as u64, b as u64)?;
        }
        Ok(text)
    }

    /// Map an existing file read-only as a byte text (alphabet 256).
    pub fn map_file(file: &File) -> Result<Self> {
        Ok(Self {
            alphabet_size: 256,
            symbols: ValueArray::open_read_only(file, 1)?,
        })
    }

    /// Number of symbols in the alphabet.
    pub fn alphabet_size(&self) -> u64 {
        self.alphabet_size
    }

    /// Length in symbols, excluding the implicit sentinel.
    pub fn len(&self) -> u64 {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`.
    pub fn symbol_at(&self, index: u64) -> Result<u64> {
        self.symbols.get(index)
    }

    pub fn set_symbol_at(&mut self, index: u64, symbol: u64) -> Result<()> {
        self.symbols.set(index, symbol)
    }

    /// Iterate symbols in `[start, end)`. Reverse iteration via `.rev()`.
    pub fn iter_range(&self, start: u64, end: u64) -> ValueIter<'_> {
        self.symbols.iter_range(start, end)
    }

    pub fn truncate(&mut self, len: u64) -> Result<()> {
        self.symbols.truncate(len)
    }

    /// Flush pending writes and make the text read-only.
    pub fn freeze(&mut self) -> Result<()> {
        self.symbols.freeze()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.symbols.flush()
    }
}

/// Widen a byte pattern to the symbol values used by byte texts.
pub fn byte_symbols(bytes: &[u8]) -> Vec<u64> {
    bytes.iter().map(|&b| b as u64).collect()
}
