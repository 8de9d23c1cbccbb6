//! LCP and LCP-LR construction.
//!
//! The LCP array records, per suffix-array entry, how many leading symbols
//! it shares with the entry before it. For "banana" (SA `[6 5 3 1 0 4 2]`):
//!
//! ```text
//!   .  $
//!   0  a$
//!   1  ana$       one leading symbol shared with a$
//!   3  anana$     three shared with ana$
//!   0  banana$
//!   0  na$
//!   2  nana$      two shared with na$
//! ```
//!
//! The LCP-LR array extends this to the intervals a binary search actually
//! visits. Cell `k` holds the lcp of the two suffixes bounding the interval
//! reached by search node `k`, which is `min` over the LCP entries inside
//! it. A search arriving at node `k` already knows the pattern shares that
//! many symbols with every suffix in the interval and skips them.
//!
//! References: Kasai et al., "Linear-Time Longest-Common-Prefix
//! Computation in Suffix Arrays and Its Applications".

use anyhow::Result;

use super::text::Text;
use super::types::{LcpArray, SuffixArray, PLACEHOLDER};
use crate::store::{StoreConfig, ValueArray};

/// Build the LCP array for `text` and its suffix array with Kasai's
/// algorithm: one pass over text positions in natural order, reusing the
/// previous match length minus one.
pub fn build_lcp_array(
    config: &StoreConfig,
    text: &Text,
    sa: &SuffixArray,
) -> Result<LcpArray> {
    // The rank array inverts the suffix array: text offset to sorted index.
    // It only lives for the duration of this build.
    let mut rank = ValueArray::with_width(config, sa.len(), 8)?;
    for index in 0..sa.len() {
        rank.set(sa.position_at(index)?, index)?;
    }

    let mut lcp = LcpArray::create(config, sa.len())?;
    lcp.set_height_at(0, PLACEHOLDER)?;

    let n = text.len();
    let mut h = 0u64;
    for i in 0..rank.len() {
        let r = rank.get(i)?;
        // Rank 0 is the sentinel suffix and rank 1 follows it; its height
        // stays at the zero the array was created with.
        if r <= 1 {
            continue;
        }
        let j = sa.position_at(r - 1)?;
        let min_len = (n - i).min(n - j);

        let mut iter_i = text.iter_range(i + h, i + min_len);
        let mut iter_j = text.iter_range(j + h, j + min_len);
        loop {
            let (a, b) = match (iter_i.next(), iter_j.next()) {
                (Some(a), Some(b)) => (a?, b?),
                _ => break,
            };
            if a != b {
                break;
            }
            h += 1;
        }

        lcp.set_height_at(r, h)?;
        if h > 0 {
            h -= 1;
        }
    }
    Ok(lcp)
}

/// Build the LCP-LR array: a complete binary tree in array form, cell `k`
/// holding the range-LCP of the interval binary search reaches at node `k`.
/// Cells no midpoint trajectory reaches stay unfilled and are truncated off
/// the tail.
pub fn build_lcp_lr_array(config: &StoreConfig, lcp: &LcpArray) -> Result<ValueArray> {
    let m = lcp.len().next_power_of_two();
    let mut lcp_lr = ValueArray::create(config, 2 * m + 1, PLACEHOLDER)?;
    lcp_lr.fill(PLACEHOLDER)?;

    // A single-entry array (empty text) has no interval to split.
    if lcp.len() >= 2 {
        fill(&mut lcp_lr, lcp, 0, 0, lcp.len() - 1)?;
    }

    let mut actual = lcp_lr.len();
    for value in lcp_lr.iter().rev() {
        if value? != PLACEHOLDER {
            break;
        }
        actual -= 1;
    }
    lcp_lr.truncate(actual)?;
    Ok(lcp_lr)
}

/// Compute the range LCP for `(lo, hi]` at tree cell `index` and return it.
///
/// Wide intervals split at the search midpoint: the child ranges supply
/// their own minima and the two LCP entries around the midpoint cover the
/// gap. Intervals of up to three entries read the LCP array directly.
fn fill(
    lcp_lr: &mut ValueArray,
    lcp: &LcpArray,
    index: u64,
    lo: u64,
    hi: u64,
) -> Result<u64> {
    assert!(lo < hi, "cannot split suffix range [{lo}, {hi}]");

    let delta = hi - lo;
    let (h0, h1, h2, h3) = if delta > 3 {
        let mid = lo + delta / 2;
        let h0 = fill(lcp_lr, lcp, 2 * index + 1, lo, mid - 1)?;
        let h1 = lcp.height_at(mid)?;
        let h2 = lcp.height_at(mid + 1)?;
        let h3 = fill(lcp_lr, lcp, 2 * index + 2, mid + 1, hi)?;
        (h0, h1, h2, h3)
    } else if delta == 3 {
        (
            lcp.height_at(lo + 1)?,
            lcp.height_at(lo + 2)?,
            lcp.height_at(lo + 3)?,
            PLACEHOLDER,
        )
    } else if delta == 2 {
        (
            lcp.height_at(lo + 1)?,
            lcp.height_at(lo + 2)?,
            PLACEHOLDER,
            PLACEHOLDER,
        )
    } else {
        (lcp.height_at(lo + 1)?, PLACEHOLDER, PLACEHOLDER, PLACEHOLDER)
    };

    let h = h0.min(h1).min(h2).min(h3);
    lcp_lr.set(index, h)?;
    Ok(h)
}
