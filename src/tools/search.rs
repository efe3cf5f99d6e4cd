//! Full-text search handler for finding documentation entries.

use crate::entry::{Category, MatchField};
use crate::search::{SearchHit, SearchOptions};
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search query, e.g. "noise", "audio input", "feedback loop"
    pub query: String,
    /// Restrict results to one category (TOP, CHOP, SOP, DAT, MAT, COMP, POP, PYTHON, TUTORIAL, WORKFLOW)
    #[serde(default)]
    pub category: Option<String>,
    /// Keep only entries carrying at least one of these tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tolerate typos in query words longer than three characters
    #[serde(default)]
    pub fuzzy: bool,
    /// Maximum number of results to return (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Minimum relevance score (default: 0.1)
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl SearchRequest {
    fn options(&self, default_limit: usize) -> SearchOptions {
        let mut options = SearchOptions {
            category: self.category.clone(),
            tags: self.tags.clone(),
            fuzzy: self.fuzzy,
            limit: Some(self.limit.unwrap_or(default_limit)),
            ..SearchOptions::default()
        };
        if let Some(threshold) = self.threshold {
            options.threshold = threshold;
        }
        options
    }
}

/// Execute a search against the shared index.
pub async fn handle_search(state: &DocState, request: SearchRequest) -> Result<String, String> {
    if request.query.trim().is_empty() {
        return Err("Search query must not be empty".to_string());
    }

    if let Some(category) = &request.category
        && category.parse::<Category>().is_err()
    {
        let known: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        return Err(format!(
            "Unknown category '{}'. Valid categories: {}",
            category,
            known.join(", ")
        ));
    }

    let options = request.options(state.limits().default_limit);
    let index = state.read().await;
    let results = index.search(&request.query, &options);

    if results.is_empty() {
        let mut msg = format!("No results found for '{}'.\n\n", request.query);

        msg.push_str("Search tips:\n");
        msg.push_str("• All query words must match, so try fewer words\n");
        if !request.fuzzy {
            msg.push_str("• Set fuzzy: true to tolerate typos\n");
        }
        if request.category.is_some() || !request.tags.is_empty() {
            msg.push_str("• Remove the category or tag filters\n");
        }

        let suggestions = request
            .query
            .split_whitespace()
            .last()
            .map(|word| index.suggestions(word, state.limits().suggestion_limit))
            .unwrap_or_default();
        if !suggestions.is_empty() {
            let _ = write!(msg, "\nDid you mean: {}\n", suggestions.join(", "));
        }

        return Ok(msg);
    }

    Ok(format_search_results(&results, &request.query))
}

/// Format search results into a readable string output.
fn format_search_results(results: &[SearchHit], query: &str) -> String {
    let mut output = format!(
        "Search results for '{}' ({} found):\n\n",
        query,
        results.len()
    );

    for (idx, hit) in results.iter().enumerate() {
        let entry = &hit.entry;
        let _ = write!(
            output,
            "{}. `{}` [{}",
            idx + 1,
            entry.display_name,
            entry.category
        );
        if let Some(subcategory) = &entry.subcategory {
            let _ = write!(output, " / {}", subcategory);
        }
        let _ = writeln!(output, "] - score: {:.1}", hit.score);

        if !entry.description.is_empty() {
            let _ = writeln!(output, "   {}", entry.description);
        }

        let fields = matched_fields(hit);
        if !fields.is_empty() {
            let _ = writeln!(output, "   matched: {}", fields.join(", "));
        }
        let _ = writeln!(output, "   id: {}", entry.id);

        output.push('\n');
    }

    output
}

/// Distinct matched field labels, in match order.
fn matched_fields(hit: &SearchHit) -> Vec<&'static str> {
    let mut fields = Vec::new();
    for found in &hit.matches {
        let label = match found.field {
            MatchField::Name => "name",
            MatchField::Description => "description",
            MatchField::Keyword => "keywords",
            MatchField::Parameter => "parameters",
        };
        if !fields.contains(&label) {
            fields.push(label);
        }
    }
    fields
}
