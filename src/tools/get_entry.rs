//! Entry lookup handler: full documentation of one entry by id.

use crate::entry::Entry;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetEntryRequest {
    /// Entry id, as shown in search results (e.g. "noise_top")
    pub id: String,
}

pub async fn handle_get_entry(state: &DocState, request: GetEntryRequest) -> Result<String, String> {
    let index = state.read().await;
    let entry = index.get(&request.id).ok_or_else(|| {
        let similar = index.suggestions(&request.id, 5);
        if similar.is_empty() {
            format!("No entry with id '{}'.", request.id)
        } else {
            format!(
                "No entry with id '{}'. Similar: {}",
                request.id,
                similar.join(", ")
            )
        }
    })?;

    Ok(render_entry(entry))
}

/// Render every documented field of an entry.
fn render_entry(entry: &Entry) -> String {
    let mut output = format!("# {}\n\n", entry.display_name);

    let _ = write!(output, "Category: {}", entry.category);
    if let Some(subcategory) = &entry.subcategory {
        let _ = write!(output, " / {}", subcategory);
    }
    output.push('\n');
    let _ = writeln!(output, "Id: {}", entry.id);

    for (title, text) in [
        ("Description", &entry.description),
        ("Summary", &entry.summary),
        ("Details", &entry.details),
        ("Usage", &entry.usage),
    ] {
        if !text.is_empty() {
            let _ = writeln!(output, "\n## {}\n{}", title, text);
        }
    }

    if !entry.parameters.is_empty() {
        let _ = writeln!(output, "\n## Parameters");
        for parameter in &entry.parameters {
            let _ = write!(output, "• `{}`", parameter.name);
            if let Some(kind) = &parameter.kind {
                let _ = write!(output, " ({})", kind);
            }
            if !parameter.description.is_empty() {
                let _ = write!(output, ": {}", parameter.description);
            }
            output.push('\n');
        }
    }

    if !entry.keywords.is_empty() {
        let _ = writeln!(output, "\nKeywords: {}", entry.keywords.join(", "));
    }
    if !entry.tags.is_empty() {
        let _ = writeln!(output, "Tags: {}", entry.tags.join(", "));
    }

    if let Some(report) = entry.validation().filter(|report| !report.is_valid) {
        let _ = writeln!(output, "\nWarning: {}", report.errors.join("; "));
    }

    output
}
