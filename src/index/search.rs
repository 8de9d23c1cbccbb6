//! LCP-LR-accelerated pattern search.
//!
//! A plain binary search over a suffix array re-compares the pattern's
//! leading symbols at every probe. This search tracks the binary-search
//! node it sits at and reads the precomputed range LCP for that node
//! before each probe: the pattern is already known to share that many
//! symbols with every suffix in the interval, so the comparison starts
//! past them. Locating one occurrence costs O(|P| + log n) symbol
//! comparisons; the surrounding run of occurrences is then swept up
//! linearly.

use anyhow::Result;

use super::text::Text;
use super::types::SuffixArray;
use crate::store::ValueArray;

enum Outcome {
    /// Pattern sorts before the probed suffix.
    Left,
    /// Pattern sorts after the probed suffix.
    Right,
    /// The probed suffix starts with the pattern.
    Hit,
}

struct Searcher<'a> {
    text: &'a Text,
    sa: &'a SuffixArray,
    pattern: &'a [u64],
    /// Symbols known shared between the pattern and every suffix in
    /// `[lo, hi]`; comparisons start here.
    height: u64,
    lo: u64,
    hi: u64,
}

impl Searcher<'_> {
    /// Compare the pattern against the suffix at SA[`at`], skipping the
    /// first `height` symbols. Returns the outcome and the suffix's text
    /// offset.
    fn compare(&self, at: u64) -> Result<(Outcome, u64)> {
        let pos = self.sa.position_at(at)?;

        let mut i = self.height;
        let mut outcome = None;
        for symbol in self.text.iter_range(pos + self.height, self.text.len()) {
            if i >= self.pattern.len() as u64 {
                break;
            }
            let t = symbol?;
            let p = self.pattern[i as usize];
            if p < t {
                outcome = Some(Outcome::Left);
                break;
            }
            if p > t {
                outcome = Some(Outcome::Right);
                break;
            }
            i += 1;
        }

        let outcome = outcome.unwrap_or(if i < self.pattern.len() as u64 {
            // The suffix ran out first; anything longer sorts after it.
            Outcome::Right
        } else {
            Outcome::Hit
        });
        Ok((outcome, pos))
    }
}

/// Return every text offset where `pattern` occurs, ascending.
pub fn search(
    text: &Text,
    sa: &SuffixArray,
    lcp_lr: &ValueArray,
    pattern: &[u64],
) -> Result<Vec<u64>> {
    let mut state = Searcher {
        text,
        sa,
        pattern,
        height: 0,
        lo: 0,
        hi: sa.len() - 1,
    };
    let mut node = 0u64;
    let mut hit: Option<(u64, u64)> = None;

    // Wide intervals: midpoint probes guided by the node's range LCP. The
    // node index follows the same trajectory the LCP-LR fill used, so it
    // never lands on a truncated cell.
    while state.hi >= state.lo + 3 {
        let mid = state.lo + (state.hi - state.lo) / 2;
        state.height = lcp_lr.get(node)?;
        let (outcome, pos) = state.compare(mid)?;
        match outcome {
            Outcome::Left => {
                node = 2 * node + 1;
                state.hi = mid - 1;
            }
            Outcome::Right => {
                node = 2 * node + 2;
                state.lo = mid + 1;
            }
            Outcome::Hit => {
                hit = Some((mid, pos));
                break;
            }
        }
    }

    // Narrow intervals: probe linearly from the low end. The height from
    // the last visited node still applies to everything in range.
    while hit.is_none() && state.lo <= state.hi {
        let at = state.lo;
        let (outcome, pos) = state.compare(at)?;
        match outcome {
            Outcome::Left => break,
            Outcome::Right => state.lo = at + 1,
            Outcome::Hit => hit = Some((at, pos)),
        }
    }

    let Some((found_at, found_pos)) = hit else {
        return Ok(Vec::new());
    };

    // Skipping `height` symbols is sound only when the pattern occurs
    // somewhere in the interval; a probe on an absent pattern can misreport
    // a hit. Recheck from symbol zero, and sweep unskipped as well.
    state.height = 0;
    let (outcome, _) = state.compare(found_at)?;
    if !matches!(outcome, Outcome::Hit) {
        return Ok(Vec::new());
    }

    // One occurrence in hand; the rest of the run sits adjacent in the
    // suffix array. Sweep both directions until the match breaks.
    let mut results = vec![found_pos];
    let mut below = found_at;
    while below > state.lo {
        below -= 1;
        let (outcome, pos) = state.compare(below)?;
        if !matches!(outcome, Outcome::Hit) {
            break;
        }
        results.push(pos);
    }
    let mut above = found_at;
    while above < state.hi {
        above += 1;
        let (outcome, pos) = state.compare(above)?;
        if !matches!(outcome, Outcome::Hit) {
            break;
        }
        results.push(pos);
    }

    results.sort_unstable();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::builder::build_suffix_array;
    use crate::index::lcp::{build_lcp_array, build_lcp_lr_array};
    use crate::index::text::byte_symbols;
    use crate::store::StoreConfig;

    fn find(text: &[u8], pattern: &[u8]) -> Vec<u64> {
        let config = StoreConfig::default();
        let text = Text::from_bytes(&config, text).unwrap();
        let sa = build_suffix_array(&config, &text).unwrap();
        let lcp = build_lcp_array(&config, &text, &sa).unwrap();
        let lcp_lr = build_lcp_lr_array(&config, &lcp).unwrap();
        search(&text, &sa, &lcp_lr, &byte_symbols(pattern)).unwrap()
    }

    #[test]
    fn single_and_repeated_occurrences() {
        assert_eq!(find(b"banana", b"banana"), vec![0]);
        assert_eq!(find(b"banana", b"ana"), vec![1, 3]);
        assert_eq!(find(b"banana", b"na"), vec![2, 4]);
        assert_eq!(find(b"banana", b"a"), vec![1, 3, 5]);
    }

    #[test]
    fn missing_patterns() {
        assert_eq!(find(b"banana", b"x"), Vec::<u64>::new());
        assert_eq!(find(b"banana", b"nanan"), Vec::<u64>::new());
        assert_eq!(find(b"banana", b"bananas"), Vec::<u64>::new());
        assert_eq!(find(b"", b"a"), Vec::<u64>::new());
    }

    #[test]
    fn pattern_across_repeats() {
        assert_eq!(find(b"banana.banana", b"banana"), vec![0, 7]);
        assert_eq!(find(b"banana.banana", b"a.b"), vec![5]);
        assert_eq!(find(b"banana.banana", b"an"), vec![1, 3, 8, 10]);
    }

    #[test]
    fn constant_text_runs() {
        assert_eq!(find(b"aaaaaaaa", b"aaa"), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(find(b"aaaaaaaa", b"aaaaaaaa"), vec![0]);
        assert_eq!(find(b"aaaaaaaa", b"aaaaaaaab"), Vec::<u64>::new());
    }

    /// A pattern falling strictly between two suffixes mid-probe used to
    /// produce hits at offsets where the pattern does not occur.
    #[test]
    fn absent_pattern_between_suffixes_finds_nothing() {
        let symbols: &[u64] = &[
            7, 6, 4, 7, 3, 0, 5, 1, 2, 0, 1, 1, 4, 2, 2, 1, 0, 2, 1, 3, 0, 6, 2, 2, 5, 1, 3, 4,
            0, 4, 1, 5, 4, 6, 0, 7, 2, 0, 1, 5, 3, 5, 7, 0, 2, 3, 4, 2, 0, 3, 4, 7, 7, 2, 1, 3,
            1, 5,
        ];
        let config = StoreConfig::default();
        let mut text = Text::new(&config, 8, symbols.len() as u64).unwrap();
        for (i, &s) in symbols.iter().enumerate() {
            text.set_symbol_at(i as u64, s).unwrap();
        }
        let sa = build_suffix_array(&config, &text).unwrap();
        let lcp = build_lcp_array(&config, &text, &sa).unwrap();
        let lcp_lr = build_lcp_lr_array(&config, &lcp).unwrap();

        // [3, 7] occurs nowhere; [3, 0] occurs twice.
        assert_eq!(
            search(&text, &sa, &lcp_lr, &[3, 7]).unwrap(),
            Vec::<u64>::new()
        );
        assert_eq!(search(&text, &sa, &lcp_lr, &[3, 0]).unwrap(), vec![4, 19]);
    }

    #[test]
    fn matches_scan_on_mixed_text() {
        let text = b"the quick brown fox jumps over the lazy dog; the end";
        for pattern in [&b"the"[..], b"o", b"he l", b"zzz", b" "] {
            let expected: Vec<u64> = (0..text.len())
                .filter(|&i| text[i..].starts_with(pattern))
                .map(|i| i as u64)
                .collect();
            assert_eq!(find(text, pattern), expected, "pattern {pattern:?}");
        }
    }
}
