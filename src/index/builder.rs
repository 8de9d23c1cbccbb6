//! SA-IS suffix array construction.
//!
//! The algorithm sorts suffixes by induced sorting (Nong, Zhang and Chan).
//! One pass over the text places the LMS positions in approximately sorted
//! order, two induction sweeps derive the L-type and S-type order from
//! them, and a summary text of named LMS substrings decides the exact LMS
//! order, recursing when two substrings share a name. The exact order is
//! then induced once more to produce the final array:
//!
//! 1. guess: LMS positions dropped at their bucket tails in text order
//! 2. induce L (left to right), induce S (right to left)
//! 3. name LMS substrings in suffix-array order, build the summary text
//! 4. sort the summary (directly when all names are unique, else recurse)
//! 5. exact: LMS positions placed from the sorted summary, induce again
//!
//! Every intermediate lives in a [`ValueArray`] or [`BitVector`] created
//! from the caller's [`StoreConfig`], so a build spills to disk when
//! configured to. Intermediates are dropped on every exit path.
//!
//! [`BitVector`]: crate::store::BitVector

use anyhow::Result;

use super::buckets::{bucket_sizes, bucket_tails, BucketCursors};
use super::text::Text;
use super::type_map::{SuffixKind, TypeMap};
use super::types::{SuffixArray, PLACEHOLDER};
use crate::store::{StoreConfig, ValueArray};

/// Construct the suffix array for `text`.
pub fn build_suffix_array(config: &StoreConfig, text: &Text) -> Result<SuffixArray> {
    let n = text.len();
    if n == 0 {
        let mut sa = SuffixArray::with_width(config, 1, 1)?;
        sa.set_position_at(0, 0)?;
        return Ok(sa);
    }
    if n == 1 {
        let mut sa = SuffixArray::with_width(config, 2, 1)?;
        sa.set_position_at(0, 1)?;
        sa.set_position_at(1, 0)?;
        return Ok(sa);
    }

    let type_map = TypeMap::build(config, text)?;
    let sizes = bucket_sizes(text)?;

    let mut sa = guess_lms_sort(config, text, &type_map, &sizes)?;
    induce_sort_l(text, &type_map, &sizes, &mut sa)?;
    induce_sort_r(text, &type_map, &sizes, &mut sa)?;

    // The guessed array now sorts LMS substrings, though not yet LMS
    // suffixes that share a substring.
    let (summary_text, summary_offsets) = summarize(config, text, &type_map, &sa)?;
    drop(sa);
    let summary_sa = build_summary_suffix_array(config, &summary_text)?;

    let mut exact = exact_lms_sort(config, text, &sizes, &summary_sa, &summary_offsets)?;
    drop(summary_sa);
    drop(summary_offsets);
    drop(summary_text);

    induce_sort_l(text, &type_map, &sizes, &mut exact)?;
    induce_sort_r(text, &type_map, &sizes, &mut exact)?;
    Ok(exact)
}

/// Place every LMS position at the tail of its bucket, in text order. The
/// result approximates the sorted LMS order well enough for induction.
fn guess_lms_sort(
    config: &StoreConfig,
    text: &Text,
    type_map: &TypeMap,
    sizes: &[u64],
) -> Result<SuffixArray> {
    let n = text.len();
    let mut sa = SuffixArray::create(config, n + 1)?;
    sa.clear()?;
    sa.set_position_at(0, n)?;

    let mut tails = BucketCursors::tails(sizes);
    for i in 0..n {
        if type_map.is_lms(i)? {
            tails.place(text.symbol_at(i)?, i, &mut sa)?;
        }
    }
    Ok(sa)
}

/// Left-to-right sweep: every filled slot with an L-type left neighbor
/// places that neighbor at its bucket head.
fn induce_sort_l(
    text: &Text,
    type_map: &TypeMap,
    sizes: &[u64],
    sa: &mut SuffixArray,
) -> Result<()> {
    let mut heads = BucketCursors::heads(sizes);
    for i in 0..sa.len() {
        let p = sa.position_at(i)?;
        if p == 0 || p == PLACEHOLDER {
            continue;
        }
        let j = p - 1;
        if type_map.kind_at(j)? != SuffixKind::L {
            continue;
        }
        heads.place(text.symbol_at(j)?, j, sa)?;
    }
    Ok(())
}

/// Right-to-left sweep: every filled slot with an S-type left neighbor
/// places that neighbor at its bucket tail.
fn induce_sort_r(
    text: &Text,
    type_map: &TypeMap,
    sizes: &[u64],
    sa: &mut SuffixArray,
) -> Result<()> {
    let mut tails = BucketCursors::tails(sizes);
    for i in (0..sa.len()).rev() {
        let p = sa.position_at(i)?;
        if p == 0 || p == PLACEHOLDER {
            continue;
        }
        let j = p - 1;
        if type_map.kind_at(j)? != SuffixKind::S {
            continue;
        }
        tails.place(text.symbol_at(j)?, j, sa)?;
    }
    Ok(())
}

/// Name LMS substrings in suffix-array order and extract the summary: a
/// text of names in position order plus the positions they came from.
fn summarize(
    config: &StoreConfig,
    text: &Text,
    type_map: &TypeMap,
    sa: &SuffixArray,
) -> Result<(Text, ValueArray)> {
    let n = text.len();
    let mut lms_names = ValueArray::create(config, n + 1, PLACEHOLDER)?;
    lms_names.fill(PLACEHOLDER)?;

    // The sentinel suffix sits at index 0 and gets name 0; every later LMS
    // position keeps the previous name while its substring compares equal.
    let mut current_name = 0u64;
    let mut last_lms_offset = sa.position_at(0)?;
    lms_names.set(last_lms_offset, current_name)?;
    for index in 1..sa.len() {
        let pos = sa.position_at(index)?;
        if !type_map.is_lms(pos)? {
            continue;
        }
        if !type_map.lms_substrings_equal(text, last_lms_offset, pos)? {
            current_name += 1;
        }
        last_lms_offset = pos;
        lms_names.set(pos, current_name)?;
    }

    let mut summary_text = Text::new(config, current_name + 1, lms_names.len())?;
    let mut summary_offsets = ValueArray::with_width(config, lms_names.len(), 8)?;
    let mut count = 0u64;
    for index in 0..lms_names.len() {
        let name = lms_names.get(index)?;
        if name == PLACEHOLDER {
            continue;
        }
        summary_text.set_symbol_at(count, name)?;
        summary_offsets.set(count, index)?;
        count += 1;
    }
    summary_text.truncate(count)?;
    summary_offsets.truncate(count)?;
    Ok((summary_text, summary_offsets))
}

/// Sort the summary text's suffixes: directly when every name is unique,
/// otherwise by recursing into the full construction.
fn build_summary_suffix_array(config: &StoreConfig, summary: &Text) -> Result<SuffixArray> {
    debug_assert!(summary.alphabet_size() > 0);
    if summary.len() == summary.alphabet_size() {
        // Names are sorted and unique, so each one pins its own slot.
        let mut ssa = SuffixArray::create(config, summary.len() + 1)?;
        ssa.set_position_at(0, summary.len())?;
        for index in 0..summary.len() {
            let name = summary.symbol_at(index)?;
            ssa.set_position_at(name + 1, index)?;
        }
        return Ok(ssa);
    }
    build_suffix_array(config, summary)
}

/// Place the LMS positions exactly, walking the sorted summary backwards so
/// each bucket tail fills in descending order.
fn exact_lms_sort(
    config: &StoreConfig,
    text: &Text,
    sizes: &[u64],
    summary_sa: &SuffixArray,
    summary_offsets: &ValueArray,
) -> Result<SuffixArray> {
    let n = text.len();
    let mut sa = SuffixArray::create(config, n + 1)?;
    sa.clear()?;
    sa.set_position_at(0, n)?;

    // Plain integer cursors this time: the reverse scan decrements after
    // each placement. Entries 0 and 1 are the summary sentinel and the
    // text sentinel, already accounted for.
    let mut tails = bucket_tails(sizes);
    for entry in summary_sa.iter_range(2, summary_sa.len()).rev() {
        let string_index = summary_offsets.get(entry?)?;
        let sym = text.symbol_at(string_index)? as usize;
        sa.set_position_at(tails[sym], string_index)?;
        tails[sym] -= 1;
    }
    Ok(sa)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference construction: sort all suffixes, sentinel first.
    fn naive_suffix_array(bytes: &[u8]) -> Vec<u64> {
        let mut sa: Vec<u64> = (0..=bytes.len() as u64).collect();
        sa.sort_by_key(|&i| &bytes[i as usize..]);
        sa
    }

    fn build_from_bytes(bytes: &[u8]) -> Vec<u64> {
        let config = StoreConfig::default();
        let text = Text::from_bytes(&config, bytes).unwrap();
        build_suffix_array(&config, &text).unwrap().to_vec().unwrap()
    }

    #[test]
    fn base_cases() {
        assert_eq!(build_from_bytes(b""), vec![0]);
        assert_eq!(build_from_bytes(b"x"), vec![1, 0]);
    }

    #[test]
    fn known_arrays() {
        assert_eq!(build_from_bytes(b"abcdefg"), vec![7, 0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(build_from_bytes(b"gfedcba"), vec![7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(
            build_from_bytes(b"baabaabac"),
            vec![9, 1, 4, 2, 5, 7, 0, 3, 6, 8]
        );
        assert_eq!(build_from_bytes(b"banana"), vec![6, 5, 3, 1, 0, 4, 2]);
        assert_eq!(build_from_bytes(b"cabbage"), vec![7, 1, 4, 3, 2, 0, 6, 5]);
        assert_eq!(
            build_from_bytes(b"banana.banana"),
            vec![13, 6, 12, 5, 10, 3, 8, 1, 7, 0, 11, 4, 9, 2]
        );
        assert_eq!(
            build_from_bytes(b"abcdefgh"),
            vec![8, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        assert_eq!(
            build_from_bytes(b"aaaaaaaa"),
            vec![8, 7, 6, 5, 4, 3, 2, 1, 0]
        );
    }

    #[test]
    fn matches_naive_on_sentence() {
        let input: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
        assert_eq!(build_from_bytes(input), naive_suffix_array(input));
    }

    #[test]
    fn matches_naive_on_repetitive_input() {
        // Repetitive enough to force the recursive summary path.
        let input = b"rikki-tikki-tikki-tikki-tikka".repeat(4);
        assert_eq!(build_from_bytes(&input), naive_suffix_array(&input));
    }

    #[test]
    fn small_alphabet_recursion() {
        let config = StoreConfig::default();
        let mut text = Text::new(&config, 2, 24).unwrap();
        for i in 0..24 {
            // 0 and 1 in an aperiodic-ish pattern.
            text.set_symbol_at(i, ((i * i + i / 3) % 2) as u64).unwrap();
        }
        let sa = build_suffix_array(&config, &text).unwrap().to_vec().unwrap();

        let bytes: Vec<u8> = (0..24u64)
            .map(|i| ((i * i + i / 3) % 2) as u8)
            .collect();
        assert_eq!(sa, naive_suffix_array(&bytes));
    }
}
