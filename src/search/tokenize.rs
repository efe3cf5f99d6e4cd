//! Text tokenization and stemming utilities for search indexing.
//!
//! The same [`Tokenizer`] runs on ingestion and on queries, so a query token
//! and an indexed token compare equal exactly when they normalize the same way.

use regex::Regex;
use std::sync::LazyLock;

use super::index::IndexOptions;

/// Minimum token length kept after splitting.
const MIN_TOKEN_LENGTH: usize = 2;

/// Suffixes tried in order by [`stem`]; only the first match is stripped.
const SUFFIXES: &[&str] = &["ing", "ed", "er", "est", "ly", "s"];

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "he", "her", "his", "i",
    "in", "is", "it", "its", "me", "my", "nor", "of", "on", "or", "our", "she", "so", "that",
    "the", "their", "them", "these", "they", "this", "those", "to", "us", "was", "we", "were",
    "with", "you", "your",
];

/// Anything that is neither a word character nor whitespace becomes a separator.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static pattern is valid"));

/// Conservative suffix stripping.
///
/// A suffix is removed only when the token is longer than the suffix plus two
/// characters, so "uses" stems to "use" while "bus" is left alone.
pub fn stem(token: &str) -> &str {
    let length = token.chars().count();
    SUFFIXES
        .iter()
        .find(|suffix| token.ends_with(*suffix) && length > suffix.len() + 2)
        .map_or(token, |suffix| &token[..token.len() - suffix.len()])
}

/// Tokenization pipeline configured from the index options.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    stemming: bool,
    stop_words: bool,
    case_sensitive: bool,
}

impl Tokenizer {
    pub const fn new(options: &IndexOptions) -> Self {
        Self {
            stemming: options.stemming,
            stop_words: options.stop_words,
            case_sensitive: options.case_sensitive,
        }
    }

    /// Split text into normalized tokens, preserving order and duplicates.
    ///
    /// 1. lowercase unless case sensitive
    /// 2. replace non-word characters with spaces and split on whitespace
    /// 3. drop tokens shorter than two characters
    /// 4. drop stop words (when enabled)
    /// 5. strip one suffix (when stemming)
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        let cleaned = NON_WORD.replace_all(&text, " ");

        cleaned
            .split_whitespace()
            .filter(|token| token.chars().count() >= MIN_TOKEN_LENGTH)
            .filter(|token| !(self.stop_words && STOP_WORDS.contains(token)))
            .map(|token| {
                if self.stemming {
                    stem(token).to_string()
                } else {
                    token.to_string()
                }
            })
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&IndexOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn tokenizer(stemming: bool, stop_words: bool, case_sensitive: bool) -> Tokenizer {
        Tokenizer::new(&IndexOptions {
            stemming,
            stop_words,
            case_sensitive,
            ..IndexOptions::default()
        })
    }

    #[rstest]
    #[case("rendering", "render")]
    #[case("blurred", "blurr")]
    #[case("filter", "filt")]
    #[case("fastest", "fast")]
    #[case("quickly", "quick")]
    #[case("channels", "channel")]
    #[case("uses", "use")]
    #[case("bus", "bus")] // too short for "s"
    #[case("red", "red")] // too short for "ed"
    #[case("sing", "sing")] // "ing" needs more than five characters
    #[case("noise", "noise")]
    fn test_stem(#[case] input: &str, #[case] expected: &str) {
        check!(stem(input) == expected);
    }

    #[test]
    fn test_stem_strips_only_first_matching_suffix() {
        check!(stem("bakers") == "baker");
        check!(stem("needed") == "need");
    }

    #[rstest]
    #[case("Noise TOP", &["noise", "top"])]
    #[case("the audio and the input", &["audio", "input"])]
    #[case("op.par.resolutionw = 1280", &["op", "par", "resolutionw", "1280"])]
    #[case("a b cd", &["cd"])]
    #[case("render_node", &["render_node"])] // underscore is a word character
    fn test_tokenize_defaults(#[case] input: &str, #[case] expected: &[&str]) {
        let tokens = tokenizer(true, true, false).tokenize(input);
        check!(tokens == expected);
    }

    #[test]
    fn test_tokenize_without_stop_words_keeps_them() {
        let tokens = tokenizer(false, false, false).tokenize("the feedback loop");
        check!(tokens == ["the", "feedback", "loop"]);
    }

    #[test]
    fn test_tokenize_stemming_toggle() {
        check!(tokenizer(true, true, false).tokenize("Blurring filters") == ["blurr", "filter"]);
        check!(tokenizer(false, true, false).tokenize("Blurring filters") == ["blurring", "filters"]);
    }

    #[test]
    fn test_tokenize_case_sensitive() {
        let tokens = tokenizer(false, true, true).tokenize("Noise TOP");
        check!(tokens == ["Noise", "TOP"]);
    }

    #[test]
    fn test_tokenize_keeps_duplicates_in_order() {
        let tokens = Tokenizer::default().tokenize("noise, noise; more noise!");
        check!(tokens == ["noise", "noise", "more", "noise"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("!!! ??")]
    #[case("a I")]
    fn test_tokenize_empty(#[case] input: &str) {
        check!(Tokenizer::default().tokenize(input).is_empty());
    }

    #[rstest]
    #[case("Москва", &["москва"])]
    #[case("日本語", &["日本語"])]
    #[case("🦀 crab", &["crab"])] // emoji is not a word character
    #[case("Cafés", &["café"])]
    fn test_unicode_handling(#[case] input: &str, #[case] expected: &[&str]) {
        check!(Tokenizer::default().tokenize(input) == expected);
    }
}
