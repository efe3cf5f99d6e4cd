//! Approximate token matching for typo-tolerant queries.

use ahash::AHashSet;
use rapidfuzz::distance::osa;
use std::collections::BTreeMap;

/// Largest length difference between two tokens that may still match.
const MAX_LENGTH_DELTA: usize = 2;

/// Fraction of the longer token's length allowed as edit distance.
const MAX_EDIT_RATIO: f64 = 0.3;

/// Query tokens must be longer than this for fuzzy expansion.
pub(crate) const MIN_FUZZY_LENGTH: usize = 3;

/// Edit distance between two strings, counted in characters.
///
/// Insertions, deletions and substitutions cost one edit, as does swapping
/// two adjacent characters ("niose" is one edit away from "noise").
pub fn edit_distance(a: &str, b: &str) -> usize {
    osa::distance(a.chars(), b.chars())
}

/// Approximate equality: lengths within two characters and an edit distance
/// of at most 30% of the longer token.
pub fn is_fuzzy_match(a: &str, b: &str) -> bool {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a.abs_diff(len_b) > MAX_LENGTH_DELTA {
        return false;
    }

    // Truncation matches floor() for these non-negative values.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let allowed = (MAX_EDIT_RATIO * len_a.max(len_b) as f64) as usize;
    edit_distance(a, b) <= allowed
}

/// Vocabulary of indexed words bucketed by character length.
///
/// Fuzzy lookup only compares against buckets within [`MAX_LENGTH_DELTA`] of
/// the query token, which the length pre-check would reject anyway.
#[derive(Debug, Clone, Default)]
pub(crate) struct Vocabulary {
    buckets: BTreeMap<usize, AHashSet<String>>,
}

impl Vocabulary {
    pub(crate) fn insert(&mut self, word: &str) {
        self.buckets
            .entry(word.chars().count())
            .or_default()
            .insert(word.to_string());
    }

    pub(crate) fn remove(&mut self, word: &str) {
        let length = word.chars().count();
        if let Some(bucket) = self.buckets.get_mut(&length) {
            bucket.remove(word);
            if bucket.is_empty() {
                self.buckets.remove(&length);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.len()).sum()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every vocabulary word approximately equal to `token`.
    pub(crate) fn fuzzy_matches<'a>(
        &'a self,
        token: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let length = token.chars().count();
        let range = length.saturating_sub(MAX_LENGTH_DELTA)..=length + MAX_LENGTH_DELTA;

        self.buckets
            .range(range)
            .flat_map(|(_, bucket)| bucket.iter())
            .map(String::as_str)
            .filter(move |word| is_fuzzy_match(token, word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("noise", "noise", 0)]
    #[case("niose", "noise", 1)] // adjacent swap
    #[case("blur", "blurr", 1)]
    #[case("kitten", "sitting", 3)]
    #[case("", "abc", 3)]
    fn test_edit_distance(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        check!(edit_distance(a, b) == expected);
    }

    #[rstest]
    #[case("niose", "noise", true)] // allowance floor(1.5) = 1
    #[case("noize", "noise", true)]
    #[case("nozie", "noise", false)] // two edits
    #[case("feedbak", "feedback", true)]
    #[case("trasnfrom", "transform", true)] // two swaps, allowance floor(2.7) = 2
    #[case("noise", "noiseless", false)] // length delta 4
    #[case("level", "levels", true)]
    #[case("abcd", "wxyz", false)]
    fn test_is_fuzzy_match(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        check!(is_fuzzy_match(a, b) == expected);
        check!(is_fuzzy_match(b, a) == expected);
    }

    #[test]
    fn test_vocabulary_matches_within_length_window() {
        let mut vocabulary = Vocabulary::default();
        for word in ["noise", "noize", "noiseless", "nois", "blur"] {
            vocabulary.insert(word);
        }

        let mut found: Vec<_> = vocabulary.fuzzy_matches("noise").collect();
        found.sort_unstable();
        check!(found == ["nois", "noise", "noize"]);
    }

    #[test]
    fn test_vocabulary_remove_drops_empty_buckets() {
        let mut vocabulary = Vocabulary::default();
        vocabulary.insert("ramp");
        vocabulary.insert("ramp");
        check!(vocabulary.len() == 1);

        vocabulary.remove("ramp");
        vocabulary.remove("absent");
        check!(vocabulary.is_empty());
    }
}
