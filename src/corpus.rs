//! Loading documentation corpora from disk into a search index.
//!
//! A corpus file is JSON in one of two shapes:
//! - an array of entry objects, as produced by a documentation scraper
//! - an object produced by [`DocIndex::export_data`]

use crate::entry::Entry;
use crate::error::Result;
use crate::search::{DocIndex, ExportData, IndexOptions};
use anyhow::{Context, bail};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

/// Read and index a corpus file.
pub fn load_corpus(path: &Path, options: IndexOptions) -> Result<DocIndex> {
    let start = Instant::now();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus at {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Corpus at {} is not valid JSON", path.display()))?;

    let index = build_index(value, options)
        .with_context(|| format!("Failed to index corpus at {}", path.display()))?;

    tracing::info!(
        "Loaded {} entries from {} in {:?}",
        index.len(),
        path.display(),
        start.elapsed()
    );
    Ok(index)
}

/// Index an already-parsed corpus.
pub fn build_index(value: Value, options: IndexOptions) -> Result<DocIndex> {
    let mut index = DocIndex::new(options);

    match value {
        Value::Array(records) => {
            for (position, record) in records.into_iter().enumerate() {
                ingest_record(&mut index, position, record);
            }
        }
        Value::Object(_) => {
            let data: ExportData =
                serde_json::from_value(value).context("Corpus object is not an index export")?;
            index.import_data(data);
        }
        other => bail!("Expected an array of entries or an index export, got {}", kind(&other)),
    }

    Ok(index)
}

/// Add one corpus record, logging instead of failing on bad records.
fn ingest_record(index: &mut DocIndex, position: usize, record: Value) {
    let entry = match Entry::from_value(record) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!("Skipping corpus record {}: {}", position, e);
            return;
        }
    };

    if let Some(report) = entry.validation().filter(|report| !report.is_valid) {
        tracing::warn!(
            "Corpus entry '{}' is invalid: {}",
            entry.id,
            report.errors.join("; ")
        );
    }

    if let Err(e) = index.add_entry(entry) {
        tracing::warn!("Skipping corpus record {}: {}", position, e);
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
