//! Facet listing handler: entry counts per category, tag and subcategory.

use crate::state::DocState;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Render the facet counts of the shared index.
pub async fn handle_facets(state: &DocState) -> Result<String, String> {
    let (facets, stats) = {
        let index = state.read().await;
        (index.facets(), index.stats())
    };

    if stats.total_entries == 0 {
        return Ok("The documentation index is empty.".to_string());
    }

    let mut output = format!(
        "Documentation index: {} entries, {} unique words\n",
        stats.total_entries, stats.total_words
    );
    write_section(&mut output, "Categories", &facets.categories);
    write_section(&mut output, "Subcategories", &facets.subcategories);
    write_section(&mut output, "Tags", &facets.tags);
    Ok(output)
}

/// Append one facet section, largest counts first.
fn write_section(output: &mut String, title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }

    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|(name_a, count_a), (name_b, count_b)| {
        count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
    });

    let _ = writeln!(output, "\n{} ({}):", title, counts.len());
    for (name, count) in sorted {
        let _ = writeln!(output, "  • {}: {}", name, count);
    }
}
