//! Autocomplete handler for partially typed queries.

use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestRequest {
    /// Partial query, at least two characters
    pub prefix: String,
    /// Maximum number of suggestions (default: 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// List indexed words and entry names starting with the prefix.
pub async fn handle_suggest(state: &DocState, request: SuggestRequest) -> Result<String, String> {
    if request.prefix.chars().count() < 2 {
        return Err("Prefix must be at least 2 characters".to_string());
    }

    let limit = request.limit.unwrap_or(state.limits().suggestion_limit);
    let suggestions = state.read().await.suggestions(&request.prefix, limit);

    if suggestions.is_empty() {
        return Ok(format!("No suggestions for '{}'.", request.prefix));
    }

    let mut output = format!("Suggestions for '{}':\n", request.prefix);
    for suggestion in suggestions {
        output.push_str("• ");
        output.push_str(&suggestion);
        output.push('\n');
    }
    Ok(output)
}
