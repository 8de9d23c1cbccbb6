//! S/L suffix classification.
//!
//! Induced sorting hinges on knowing, for every text position, whether the
//! suffix starting there is smaller (S-type) or larger (L-type) than the
//! suffix to its right. The map carries one extra entry for the sentinel
//! position at the end of the text, which is S-type by rule while the last
//! real position is L-type.

use anyhow::Result;

use super::text::Text;
use crate::store::{BitVector, StoreConfig};

/// Classification of a single suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuffixKind {
    /// Lexicographically smaller than the suffix to its right.
    S,
    /// Lexicographically larger than the suffix to its right.
    L,
}

impl SuffixKind {
    fn bit(self) -> bool {
        matches!(self, SuffixKind::L)
    }

    fn from_bit(bit: bool) -> Self {
        if bit {
            SuffixKind::L
        } else {
            SuffixKind::S
        }
    }
}

/// One [`SuffixKind`] per text position, plus the sentinel.
pub struct TypeMap {
    bits: BitVector,
}

impl TypeMap {
    /// Classify every position of `text` with a single reverse scan.
    pub fn build(config: &StoreConfig, text: &Text) -> Result<Self> {
        let n = text.len();
        let mut bits = BitVector::create(config, n + 1)?;

        bits.set(n, SuffixKind::S.bit())?;
        if n == 0 {
            return Ok(Self { bits });
        }
        bits.set(n - 1, SuffixKind::L.bit())?;
        if n == 1 {
            return Ok(Self { bits });
        }

        let mut last_kind = SuffixKind::L;
        let mut last_symbol = text.symbol_at(n - 1)?;
        for i in (0..n - 1).rev() {
            let symbol = text.symbol_at(i)?;
            let kind = if symbol > last_symbol {
                SuffixKind::L
            } else if symbol < last_symbol {
                SuffixKind::S
            } else {
                last_kind
            };
            bits.set(i, kind.bit())?;
            last_kind = kind;
            last_symbol = symbol;
        }
        Ok(Self { bits })
    }

    /// Number of classified positions (text length plus sentinel).
    pub fn len(&self) -> u64 {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn kind_at(&self, index: u64) -> Result<SuffixKind> {
        Ok(SuffixKind::from_bit(self.bits.get(index)?))
    }

    pub fn set_kind_at(&mut self, index: u64, kind: SuffixKind) -> Result<()> {
        self.bits.set(index, kind.bit())
    }

    /// True iff `index` is a leftmost-S position: S-type with an L-type
    /// neighbor on its left. Index 0 never qualifies.
    pub fn is_lms(&self, index: u64) -> Result<bool> {
        if index < 1 {
            return Ok(false);
        }
        Ok(self.kind_at(index - 1)? == SuffixKind::L && self.kind_at(index)? == SuffixKind::S)
    }

    /// Compare the LMS substrings starting at `i` and `j` symbol by symbol.
    ///
    /// Equal means both runs end at an LMS boundary at the same offset with
    /// identical symbols along the way. LMS status is consulted before the
    /// symbols so the scan never reads past the end of the text: the
    /// sentinel position is itself LMS and settles the comparison first.
    pub fn lms_substrings_equal(&self, text: &Text, i: u64, j: u64) -> Result<bool> {
        let n = text.len();
        if i >= n || j >= n {
            return Ok(i == j);
        }
        let mut k = 0;
        loop {
            let lms_i = self.is_lms(i + k)?;
            let lms_j = self.is_lms(j + k)?;
            if k > 0 && lms_i && lms_j {
                return Ok(true);
            }
            if lms_i != lms_j {
                return Ok(false);
            }
            if text.symbol_at(i + k)? != text.symbol_at(j + k)? {
                return Ok(false);
            }
            k += 1;
        }
    }

    pub fn freeze(&mut self) -> Result<()> {
        self.bits.freeze()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.bits.flush()
    }
}
