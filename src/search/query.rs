//! Query pipeline: tokenize, gather candidates, filter, score, rank.

use crate::entry::{EntrySummary, FieldMatch};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::fuzzy::{MIN_FUZZY_LENGTH, edit_distance, is_fuzzy_match};
use super::index::DocIndex;

/// Minimum prefix length accepted by [`DocIndex::suggestions`].
const MIN_SUGGESTION_PREFIX: usize = 2;

/// Filters and limits applied to one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SearchOptions {
    /// Keep only entries in this category.
    pub category: Option<String>,
    /// Keep only entries carrying at least one of these tags.
    pub tags: Vec<String>,
    /// Expand query tokens to approximately equal indexed words.
    pub fuzzy: bool,
    /// Maximum number of results; the index's `max_results` when unset.
    pub limit: Option<usize>,
    /// Minimum score a result must reach.
    pub threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            category: None,
            tags: Vec::new(),
            fuzzy: false,
            limit: None,
            threshold: 0.1,
        }
    }
}

impl SearchOptions {
    pub fn fuzzy() -> Self {
        Self {
            fuzzy: true,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub score: f64,
    pub matches: Vec<FieldMatch>,
    pub entry: EntrySummary,
}

impl DocIndex {
    /// Search the index.
    ///
    /// Every query token must match (exactly, or approximately when fuzzy) for
    /// an entry to be a candidate. Candidates are scored by [`Entry::search`]
    /// against the normalized query and returned highest score first.
    ///
    /// [`Entry::search`]: crate::entry::Entry::search
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        if query.is_empty() || query.chars().count() < self.options.min_query_length {
            return vec![];
        }

        let tokens = self.tokenizer.tokenize(query);
        if tokens.is_empty() {
            return vec![];
        }

        let mut candidates: Option<AHashSet<&str>> = None;
        for token in &tokens {
            let matches = self.term_candidates(token, options.fuzzy);
            let running = match candidates {
                None => matches,
                Some(running) => running.intersection(&matches).copied().collect(),
            };
            if running.is_empty() {
                return vec![];
            }
            candidates = Some(running);
        }
        let mut candidates = candidates.unwrap_or_default();

        if let Some(category) = &options.category {
            match self.category_index.get(category) {
                Some(ids) => candidates.retain(|id| ids.contains(*id)),
                None => return vec![],
            }
        }

        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|entry| {
                options.tags.is_empty() || entry.tags.iter().any(|tag| options.tags.contains(tag))
            })
            .filter_map(|entry| {
                let scored = entry.search(&self.scoring_query(&entry.id, &tokens, options.fuzzy));
                (scored.score > 0.0).then(|| SearchHit {
                    score: scored.score,
                    matches: scored.matches,
                    entry: scored.summary,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        hits.retain(|hit| hit.score >= options.threshold);
        hits.truncate(options.limit.unwrap_or(self.options.max_results));

        tracing::debug!(
            "Search '{}' ({} tokens, fuzzy: {}) returned {} results",
            query,
            tokens.len(),
            options.fuzzy,
            hits.len()
        );

        hits
    }

    /// Entry ids matching one query token.
    fn term_candidates(&self, token: &str, fuzzy: bool) -> AHashSet<&str> {
        let mut ids: AHashSet<&str> = self.word_lookup(token).collect();

        if fuzzy && token.chars().count() > MIN_FUZZY_LENGTH {
            for word in self.vocabulary.fuzzy_matches(token) {
                ids.extend(self.word_lookup(word));
            }
        }

        ids
    }

    /// The query text an entry is scored against.
    ///
    /// Without fuzzy matching this is the query tokens joined by spaces. With
    /// it, each token the entry lacks is replaced by the closest of the entry's
    /// own words, so a misspelled query still scores on the words that made
    /// the entry a candidate.
    fn scoring_query(&self, id: &str, tokens: &[String], fuzzy: bool) -> String {
        let words = match self.contributions.get(id) {
            Some(contribution) if fuzzy => &contribution.words,
            _ => return tokens.join(" "),
        };

        tokens
            .iter()
            .map(|token| {
                if words.contains(token) || token.chars().count() <= MIN_FUZZY_LENGTH {
                    return token.as_str();
                }
                words
                    .iter()
                    .filter(|word| is_fuzzy_match(token, word))
                    .min_by(|a, b| {
                        edit_distance(token, a)
                            .cmp(&edit_distance(token, b))
                            .then_with(|| a.cmp(b))
                    })
                    .map_or(token.as_str(), String::as_str)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indexed words and entry names starting with `partial`, case-insensitively.
    ///
    /// Results are sorted and deduplicated; prefixes shorter than two
    /// characters return nothing.
    pub fn suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
        if partial.chars().count() < MIN_SUGGESTION_PREFIX {
            return vec![];
        }

        let prefix = partial.to_lowercase();
        let mut found = BTreeSet::new();

        found.extend(
            self.word_index
                .keys()
                .filter(|word| word.starts_with(&prefix))
                .cloned(),
        );
        found.extend(
            self.entries
                .values()
                .filter(|entry| entry.name.to_lowercase().starts_with(&prefix))
                .map(|entry| entry.name.clone()),
        );

        found.into_iter().take(limit).collect()
    }
}
