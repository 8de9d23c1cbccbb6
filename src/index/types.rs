//! Core suffix-index types: the placeholder sentinel and the typed
//! wrappers over [`ValueArray`] for suffix positions and LCP heights.

use std::fs::File;

use anyhow::Result;

use crate::store::{StoreConfig, ValueArray, ValueIter};

/// All-ones sentinel marking an unfilled cell during construction.
///
/// Arrays touched by the builder are created eight bytes wide with this as
/// their maximum, so the placeholder can never collide with a real text
/// offset or height.
pub const PLACEHOLDER: u64 = u64::MAX;

/// A suffix array: offsets into a text, one per suffix, sorted so that
/// `suffix(SA[i-1]) < suffix(SA[i])`. Entry 0 always holds the empty
/// sentinel suffix at the end of the text, so the array is one longer than
/// the text.
pub struct SuffixArray {
    positions: ValueArray,
}

impl SuffixArray {
    /// Create an array of `num_values` unfilled slots.
    pub(crate) fn create(config: &StoreConfig, num_values: u64) -> Result<Self> {
        Ok(Self {
            positions: ValueArray::create(config, num_values, PLACEHOLDER)?,
        })
    }

    /// Create with an explicit byte width. Used by the tiny base cases
    /// where a placeholder never appears.
    pub(crate) fn with_width(
        config: &StoreConfig,
        num_values: u64,
        bytes_per_value: u8,
    ) -> Result<Self> {
        Ok(Self {
            positions: ValueArray::with_width(config, num_values, bytes_per_value)?,
        })
    }

    /// Map a previously built suffix array from a file of 8-byte entries.
    pub fn open_read_only(file: &File) -> Result<Self> {
        Ok(Self {
            positions: ValueArray::open_read_only(file, 8)?,
        })
    }

    /// Length of the array, one greater than the text length.
    pub fn len(&self) -> u64 {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Text offset of the suffix at `index`.
    pub fn position_at(&self, index: u64) -> Result<u64> {
        self.positions.get(index)
    }

    pub fn set_position_at(&mut self, index: u64, pos: u64) -> Result<()> {
        self.positions.set(index, pos)
    }

    /// Overwrite every slot with [`PLACEHOLDER`].
    pub fn clear(&mut self) -> Result<()> {
        self.positions.fill(PLACEHOLDER)
    }

    /// Iterate positions in `[start, end)`. Reverse iteration via `.rev()`.
    pub fn iter_range(&self, start: u64, end: u64) -> ValueIter<'_> {
        self.positions.iter_range(start, end)
    }

    pub fn iter(&self) -> ValueIter<'_> {
        self.positions.iter()
    }

    pub fn truncate(&mut self, len: u64) -> Result<()> {
        self.positions.truncate(len)
    }

    /// Flush pending writes and make the array read-only.
    pub fn freeze(&mut self) -> Result<()> {
        self.positions.freeze()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.positions.flush()
    }

    /// Collect all positions. Intended for tests and small arrays.
    pub fn to_vec(&self) -> Result<Vec<u64>> {
        self.positions.to_vec()
    }
}

/// Longest-common-prefix heights for a suffix array: entry `i >= 1` is
/// `lcp(suffix(SA[i-1]), suffix(SA[i]))`; entry 0 is undefined and holds
/// [`PLACEHOLDER`].
pub struct LcpArray {
    heights: ValueArray,
}

impl LcpArray {
    pub(crate) fn create(config: &StoreConfig, num_values: u64) -> Result<Self> {
        Ok(Self {
            heights: ValueArray::create(config, num_values, PLACEHOLDER)?,
        })
    }

    /// Length of the array, equal to the suffix array's.
    pub fn len(&self) -> u64 {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// `lcp(suffix(SA[index-1]), suffix(SA[index]))`; undefined for index 0.
    pub fn height_at(&self, index: u64) -> Result<u64> {
        self.heights.get(index)
    }

    pub fn set_height_at(&mut self, index: u64, height: u64) -> Result<()> {
        self.heights.set(index, height)
    }

    pub fn iter_range(&self, start: u64, end: u64) -> ValueIter<'_> {
        self.heights.iter_range(start, end)
    }

    /// Flush pending writes and make the array read-only.
    pub fn freeze(&mut self) -> Result<()> {
        self.heights.freeze()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.heights.flush()
    }

    /// Collect all heights, including the placeholder at index 0.
    pub fn to_vec(&self) -> Result<Vec<u64>> {
        self.heights.to_vec()
    }
}
