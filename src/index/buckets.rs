//! Per-symbol bucket bookkeeping over the suffix array.
//!
//! Every suffix beginning with symbol `c` lands in a contiguous range of
//! the suffix array. Index 0 is reserved for the sentinel suffix, so bucket
//! ranges start at index 1.

use anyhow::{bail, Result};

use super::text::Text;
use super::types::SuffixArray;

/// Count occurrences of each symbol, indexed by symbol.
pub fn bucket_sizes(text: &Text) -> Result<Vec<u64>> {
    let mut counts = vec![0u64; text.alphabet_size() as usize];
    for symbol in text.iter_range(0, text.len()) {
        counts[symbol? as usize] += 1;
    }
    Ok(counts)
}

/// First suffix-array index of each bucket.
pub fn bucket_heads(sizes: &[u64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut offset = 1;
    for &count in sizes {
        out.push(offset);
        offset += count;
    }
    out
}

/// Last suffix-array index of each bucket.
pub fn bucket_tails(sizes: &[u64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut offset = 1;
    for &count in sizes {
        offset += count;
        out.push(offset - 1);
    }
    out
}

enum Direction {
    Forward,
    Backward,
}

/// Stateful per-symbol cursors handing out free suffix-array slots from the
/// front (heads) or back (tails) of each bucket.
///
/// A cursor set is consumed by the phase that uses it; every induction
/// phase builds its own fresh set. Placing into an exhausted bucket means a
/// bucket was sized wrong and fails the build.
pub struct BucketCursors {
    next: Vec<u64>,
    remaining: Vec<u64>,
    direction: Direction,
}

impl BucketCursors {
    /// Cursors advancing from each bucket head toward its tail.
    pub fn heads(sizes: &[u64]) -> Self {
        Self {
            next: bucket_heads(sizes),
            remaining: sizes.to_vec(),
            direction: Direction::Forward,
        }
    }

    /// Cursors advancing from each bucket tail toward its head.
    pub fn tails(sizes: &[u64]) -> Self {
        Self {
            next: bucket_tails(sizes),
            remaining: sizes.to_vec(),
            direction: Direction::Backward,
        }
    }

    /// Write `pos` into the next free slot of `symbol`'s bucket.
    pub fn place(&mut self, symbol: u64, pos: u64, sa: &mut SuffixArray) -> Result<()> {
        let s = symbol as usize;
        if self.remaining[s] == 0 {
            bail!("bucket {symbol} cursor exhausted");
        }
        sa.set_position_at(self.next[s], pos)?;
        self.remaining[s] -= 1;
        match self.direction {
            Direction::Forward => self.next[s] += 1,
            Direction::Backward => self.next[s] = self.next[s].wrapping_sub(1),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;

    fn cabbage_text() -> Text {
        // "cabbage" over the alphabet a..g, symbols 0..7.
        let config = StoreConfig::default();
        let mut text = Text::new(&config, 7, 7).unwrap();
        for (i, &b) in b"cabbage".iter().enumerate() {
            text.set_symbol_at(i as u64, (b - b'a') as u64).unwrap();
        }
        text
    }

    #[test]
    fn sizes_heads_tails() {
        let text = cabbage_text();
        let sizes = bucket_sizes(&text).unwrap();
        assert_eq!(sizes, vec![2, 2, 1, 0, 1, 0, 1]);
        assert_eq!(bucket_heads(&sizes), vec![1, 3, 5, 6, 6, 7, 7]);
        assert_eq!(bucket_tails(&sizes), vec![2, 4, 5, 5, 6, 6, 7]);
    }

    #[test]
    fn cursors_fill_and_exhaust() {
        let config = StoreConfig::default();
        let sizes = vec![2, 1];
        let mut sa = SuffixArray::create(&config, 4).unwrap();
        sa.clear().unwrap();

        let mut heads = BucketCursors::heads(&sizes);
        heads.place(0, 10, &mut sa).unwrap();
        heads.place(0, 11, &mut sa).unwrap();
        heads.place(1, 12, &mut sa).unwrap();
        assert!(heads.place(1, 13, &mut sa).is_err());
        assert_eq!(
            sa.to_vec().unwrap(),
            vec![crate::index::PLACEHOLDER, 10, 11, 12]
        );

        let mut tails = BucketCursors::tails(&sizes);
        tails.place(0, 20, &mut sa).unwrap();
        tails.place(0, 21, &mut sa).unwrap();
        assert!(tails.place(0, 22, &mut sa).is_err());
        assert_eq!(
            sa.to_vec().unwrap(),
            vec![crate::index::PLACEHOLDER, 21, 20, 12]
        );
    }
}
