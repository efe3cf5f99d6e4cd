//! Inverted index over documentation entries.
//!
//! [`DocIndex`] owns every [`Entry`] it holds plus four derived lookup
//! structures: a global word index, a per-field word index, and category and
//! tag indices. Every id in a bucket refers to a live entry and empty buckets
//! are dropped as soon as they empty out.

use crate::entry::Entry;
use crate::error::IndexError;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::fuzzy::Vocabulary;
use super::tokenize::Tokenizer;

/// Set of entry ids sharing one key.
pub(crate) type IdSet = AHashSet<String>;

/// Map from a key (token, category, tag) to the entries carrying it.
type Postings = AHashMap<String, IdSet>;

/// Entry fields fed through the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    DisplayName,
    Description,
    Summary,
    Details,
    Usage,
    Keywords,
    Tags,
    Parameters,
}

/// Index configuration, fixed for the lifetime of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexOptions {
    pub stemming: bool,
    pub stop_words: bool,
    pub case_sensitive: bool,
    pub min_query_length: usize,
    pub max_results: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            stemming: true,
            stop_words: true,
            case_sensitive: false,
            min_query_length: 2,
            max_results: 100,
        }
    }
}

/// Partial [`IndexOptions`]; set fields replace the current value.
///
/// Used by configuration files and by [`DocIndex::import_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct IndexOptionsOverride {
    pub stemming: Option<bool>,
    #[serde(alias = "stop_words")]
    pub stop_words: Option<bool>,
    #[serde(alias = "case_sensitive")]
    pub case_sensitive: Option<bool>,
    #[serde(alias = "min_query_length")]
    pub min_query_length: Option<usize>,
    #[serde(alias = "max_results")]
    pub max_results: Option<usize>,
}

impl IndexOptionsOverride {
    pub fn apply(&self, options: &mut IndexOptions) {
        if let Some(stemming) = self.stemming {
            options.stemming = stemming;
        }
        if let Some(stop_words) = self.stop_words {
            options.stop_words = stop_words;
        }
        if let Some(case_sensitive) = self.case_sensitive {
            options.case_sensitive = case_sensitive;
        }
        if let Some(min_query_length) = self.min_query_length {
            options.min_query_length = min_query_length;
        }
        if let Some(max_results) = self.max_results {
            options.max_results = max_results;
        }
    }
}

impl From<IndexOptions> for IndexOptionsOverride {
    fn from(options: IndexOptions) -> Self {
        Self {
            stemming: Some(options.stemming),
            stop_words: Some(options.stop_words),
            case_sensitive: Some(options.case_sensitive),
            min_query_length: Some(options.min_query_length),
            max_results: Some(options.max_results),
        }
    }
}

/// Size of each derived structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_entries: usize,
    pub total_words: usize,
    pub categories: usize,
    pub tags: usize,
    pub fields: usize,
}

/// Entry counts grouped by category, tag and subcategory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub categories: BTreeMap<String, usize>,
    pub tags: BTreeMap<String, usize>,
    pub subcategories: BTreeMap<String, usize>,
}

/// Serialized form of a whole index.
///
/// Each element of `entries` is an `[id, entry]` pair. Records are decoded
/// individually on import so one malformed record does not spoil the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportData {
    pub entries: Vec<serde_json::Value>,
    pub stats: Option<IndexStats>,
    pub options: Option<IndexOptionsOverride>,
}

/// Everything one entry contributed to the word and field indices.
///
/// Kept so removal touches only the buckets the entry is in.
#[derive(Debug, Clone, Default)]
pub(crate) struct Contribution {
    pub(crate) words: AHashSet<String>,
    fields: AHashSet<(Field, String)>,
}

/// A searchable index of documentation entries.
#[derive(Debug, Clone)]
pub struct DocIndex {
    pub(super) options: IndexOptions,
    pub(super) tokenizer: Tokenizer,
    pub(super) entries: AHashMap<String, Entry>,
    pub(super) word_index: Postings,
    field_index: AHashMap<Field, Postings>,
    pub(super) category_index: Postings,
    tag_index: Postings,
    pub(super) contributions: AHashMap<String, Contribution>,
    pub(super) vocabulary: Vocabulary,
}

impl Default for DocIndex {
    fn default() -> Self {
        Self::new(IndexOptions::default())
    }
}

impl DocIndex {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            tokenizer: Tokenizer::new(&options),
            entries: AHashMap::new(),
            word_index: AHashMap::new(),
            field_index: AHashMap::new(),
            category_index: AHashMap::new(),
            tag_index: AHashMap::new(),
            contributions: AHashMap::new(),
            vocabulary: Vocabulary::default(),
        }
    }

    pub const fn options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Ids of every stored entry, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Add an entry, replacing any entry with the same id.
    ///
    /// The entry is revalidated on the way in. Invalid entries are stored
    /// as-is; only a missing id is refused.
    pub fn add_entry(&mut self, mut entry: Entry) -> Result<(), IndexError> {
        if entry.id.is_empty() {
            return Err(IndexError::MissingId { name: entry.name });
        }
        entry.validate();

        if self.entries.contains_key(&entry.id) {
            tracing::debug!("Replacing entry '{}'", entry.id);
            self.remove_entry(&entry.id);
        }

        let id = entry.id.clone();
        let mut contribution = Contribution::default();

        for (field, text) in indexed_text(&entry) {
            for token in self.tokenizer.tokenize(text) {
                if insert_id(&mut self.word_index, &token, &id) {
                    self.vocabulary.insert(&token);
                }
                insert_id(self.field_index.entry(field).or_default(), &token, &id);
                contribution.fields.insert((field, token.clone()));
                contribution.words.insert(token);
            }
        }

        if !entry.category.is_empty() {
            insert_id(&mut self.category_index, &entry.category, &id);
        }
        for tag in entry.tags.iter().filter(|tag| !tag.is_empty()) {
            insert_id(&mut self.tag_index, tag, &id);
        }

        tracing::debug!(
            "Indexed entry '{}' ({} words, category {})",
            id,
            contribution.words.len(),
            entry.category
        );

        self.contributions.insert(id.clone(), contribution);
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Remove an entry and every index reference to it. Absent ids are a no-op.
    pub fn remove_entry(&mut self, id: &str) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        let contribution = self.contributions.remove(id).unwrap_or_default();

        for word in &contribution.words {
            if remove_id(&mut self.word_index, word, id) {
                self.vocabulary.remove(word);
            }
        }

        for (field, token) in &contribution.fields {
            if let Some(tokens) = self.field_index.get_mut(field) {
                remove_id(tokens, token, id);
                if tokens.is_empty() {
                    self.field_index.remove(field);
                }
            }
        }

        remove_id(&mut self.category_index, &entry.category, id);
        for tag in &entry.tags {
            remove_id(&mut self.tag_index, tag, id);
        }

        tracing::debug!("Removed entry '{}'", id);
        Some(entry)
    }

    /// Drop every entry and derived structure.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.word_index.clear();
        self.field_index.clear();
        self.category_index.clear();
        self.tag_index.clear();
        self.contributions.clear();
        self.vocabulary.clear();
    }

    /// Ids of entries whose `field` contains the normalized `token`.
    pub fn field_lookup(&self, field: Field, token: &str) -> impl Iterator<Item = &str> {
        self.field_index
            .get(&field)
            .and_then(|tokens| tokens.get(token))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Ids of entries whose normalized text contains `token` in any field.
    pub fn word_lookup(&self, token: &str) -> impl Iterator<Item = &str> {
        self.word_index
            .get(token)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Entries in `category`, sorted by id.
    pub fn entries_in_category(&self, category: &str) -> Vec<&Entry> {
        self.collect_sorted(self.category_index.get(category))
    }

    /// Entries carrying `tag`, sorted by id.
    pub fn entries_with_tag(&self, tag: &str) -> Vec<&Entry> {
        self.collect_sorted(self.tag_index.get(tag))
    }

    fn collect_sorted(&self, ids: Option<&IdSet>) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = ids
            .into_iter()
            .flatten()
            .filter_map(|id| self.entries.get(id))
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_entries: self.entries.len(),
            total_words: self.word_index.len(),
            categories: self.category_index.len(),
            tags: self.tag_index.len(),
            fields: self.field_index.len(),
        }
    }

    /// Count entries per category, tag and subcategory.
    pub fn facets(&self) -> Facets {
        let count = |index: &Postings| {
            index
                .iter()
                .map(|(key, ids)| (key.clone(), ids.len()))
                .collect::<BTreeMap<_, _>>()
        };

        let mut subcategories = BTreeMap::new();
        for subcategory in self
            .entries
            .values()
            .filter_map(|entry| entry.subcategory.as_deref())
            .filter(|subcategory| !subcategory.is_empty())
        {
            *subcategories.entry(subcategory.to_string()).or_insert(0) += 1;
        }

        Facets {
            categories: count(&self.category_index),
            tags: count(&self.tag_index),
            subcategories,
        }
    }

    /// Serialize every entry (without raw source markup) with stats and options.
    pub fn export_data(&self) -> ExportData {
        let mut sorted: Vec<(&String, &Entry)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let entries = sorted
            .into_iter()
            .map(|(id, entry)| serde_json::json!([id, entry.to_value(false)]))
            .collect();

        ExportData {
            entries,
            stats: Some(self.stats()),
            options: Some(self.options.into()),
        }
    }

    /// Replace the contents of this index with an exported snapshot.
    ///
    /// Malformed records are skipped. Returns the number of entries imported.
    pub fn import_data(&mut self, data: ExportData) -> usize {
        let start = Instant::now();
        self.clear();

        if let Some(overrides) = data.options {
            overrides.apply(&mut self.options);
            self.tokenizer = Tokenizer::new(&self.options);
        }

        let total = data.entries.len();
        let mut imported = 0;

        for (position, record) in data.entries.into_iter().enumerate() {
            let value = match record {
                serde_json::Value::Array(mut pair) if pair.len() == 2 => pair.swap_remove(1),
                other => {
                    tracing::warn!(
                        "Skipping import record {}: expected [id, entry] pair, got {}",
                        position,
                        other
                    );
                    continue;
                }
            };

            let entry = match Entry::from_value(value) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping import record {}: {}", position, e);
                    continue;
                }
            };

            match self.add_entry(entry) {
                Ok(()) => imported += 1,
                Err(e) => tracing::warn!("Skipping import record {}: {}", position, e),
            }
        }

        tracing::info!(
            "Imported {} of {} entries ({} unique words) in {:?}",
            imported,
            total,
            self.word_index.len(),
            start.elapsed()
        );

        imported
    }
}

/// Every (field, text) pair that feeds the tokenizer for `entry`.
fn indexed_text(entry: &Entry) -> Vec<(Field, &str)> {
    let mut text = vec![
        (Field::Name, entry.name.as_str()),
        (Field::DisplayName, entry.display_name.as_str()),
        (Field::Description, entry.description.as_str()),
        (Field::Summary, entry.summary.as_str()),
        (Field::Details, entry.details.as_str()),
        (Field::Usage, entry.usage.as_str()),
    ];
    text.extend(entry.keywords.iter().map(|k| (Field::Keywords, k.as_str())));
    text.extend(entry.tags.iter().map(|t| (Field::Tags, t.as_str())));
    for parameter in &entry.parameters {
        text.push((Field::Parameters, parameter.name.as_str()));
        text.push((Field::Parameters, parameter.description.as_str()));
    }
    text
}

/// Insert `id` under `key`. Returns true when the bucket was created.
fn insert_id(index: &mut Postings, key: &str, id: &str) -> bool {
    match index.get_mut(key) {
        Some(ids) => {
            ids.insert(id.to_string());
            false
        }
        None => {
            index.insert(key.to_string(), IdSet::from_iter([id.to_string()]));
            true
        }
    }
}

/// Remove `id` from the bucket under `key`. Returns true when the bucket was deleted.
fn remove_id(index: &mut Postings, key: &str, id: &str) -> bool {
    let Some(ids) = index.get_mut(key) else {
        return false;
    };
    ids.remove(id);
    if ids.is_empty() {
        index.remove(key);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Parameter;
    use assert2::check;
    use serde_json::json;

    fn blur() -> Entry {
        Entry::new("blur_top", "Blur TOP", "TOP")
            .with_description("Blurs the input image")
            .with_subcategory("Filters")
            .with_tags(["filter", "image"])
            .with_parameters(vec![Parameter::new("size", "Blur radius in pixels")])
    }

    fn lfo() -> Entry {
        Entry::new("lfo_chop", "LFO CHOP", "CHOP")
            .with_description("Low frequency oscillator")
            .with_subcategory("Generators")
            .with_tags(["generator"])
    }

    fn assert_no_reference(index: &DocIndex, id: &str) {
        let in_postings = |postings: &Postings| postings.values().any(|ids| ids.contains(id));
        check!(!in_postings(&index.word_index));
        check!(!index.field_index.values().any(in_postings));
        check!(!in_postings(&index.category_index));
        check!(!in_postings(&index.tag_index));
        check!(!index.contributions.contains_key(id));
    }

    fn assert_no_empty_buckets(index: &DocIndex) {
        let has_empty = |postings: &Postings| postings.values().any(|ids| ids.is_empty());
        check!(!has_empty(&index.word_index));
        check!(!index.field_index.values().any(|tokens| tokens.is_empty() || has_empty(tokens)));
        check!(!has_empty(&index.category_index));
        check!(!has_empty(&index.tag_index));
    }

    #[test]
    fn test_add_entry_populates_indices() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();

        check!(index.len() == 1);
        check!(index.word_lookup("blur").collect::<Vec<_>>() == ["blur_top"]);
        check!(index.field_lookup(Field::Parameters, "radiu").count() == 1);
        check!(index.field_lookup(Field::Description, "size").count() == 0);
        check!(index.category_index.get("TOP").is_some_and(|ids| ids.contains("blur_top")));
        check!(index.tag_index.get("image").is_some_and(|ids| ids.contains("blur_top")));
        check!(index.vocabulary.len() == index.word_index.len());
    }

    #[test]
    fn test_add_entry_requires_id() {
        let mut index = DocIndex::default();
        let result = index.add_entry(Entry::new("", "Nameless", "TOP"));
        check!(result == Err(IndexError::MissingId { name: "Nameless".to_string() }));
        check!(index.is_empty());
    }

    #[test]
    fn test_add_entry_accepts_invalid_entries() {
        let mut index = DocIndex::default();
        let entry = Entry::new("custom", "Custom Thing", "VOP");
        check!(!entry.is_valid());
        check!(index.add_entry(entry).is_ok());
        check!(index.contains("custom"));
    }

    #[test]
    fn test_add_entry_revalidates() {
        let mut index = DocIndex::default();

        let mut renamed = lfo();
        renamed.category = "VOP".to_string();
        index.add_entry(renamed).unwrap();
        let stored = index.get("lfo_chop").unwrap();
        check!(stored.validation().is_some_and(|report| !report.is_valid));

        let mut assembled = Entry::default();
        assembled.id = "wave_chop".to_string();
        assembled.name = "Wave CHOP".to_string();
        assembled.category = "CHOP".to_string();
        index.add_entry(assembled).unwrap();
        let stored = index.get("wave_chop").unwrap();
        check!(stored.validation().is_some_and(|report| report.is_valid));
    }

    #[test]
    fn test_re_add_replaces_old_tokens() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();

        let replacement = Entry::new("blur_top", "Blur TOP", "TOP")
            .with_description("Softens an image")
            .with_tags(["image"]);
        index.add_entry(replacement).unwrap();

        check!(index.len() == 1);
        check!(index.word_lookup("radiu").count() == 0);
        check!(index.word_lookup("soften").count() == 1);
        check!(!index.tag_index.contains_key("filter"));
        check!(!index.vocabulary.fuzzy_matches("radiu").any(|w| w == "radiu"));
        assert_no_empty_buckets(&index);
    }

    #[test]
    fn test_remove_entry_cleans_every_index() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();
        index.add_entry(lfo()).unwrap();

        let removed = index.remove_entry("blur_top");
        check!(removed.map(|e| e.id) == Some("blur_top".to_string()));

        assert_no_reference(&index, "blur_top");
        assert_no_empty_buckets(&index);
        check!(!index.category_index.contains_key("TOP"));
        check!(index.category_index.contains_key("CHOP"));
        check!(index.vocabulary.len() == index.word_index.len());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut index = DocIndex::default();
        index.add_entry(lfo()).unwrap();
        check!(index.remove_entry("missing").is_none());
        check!(index.len() == 1);
    }

    #[test]
    fn test_shared_tokens_survive_partial_removal() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();
        index
            .add_entry(Entry::new("edge_top", "Edge TOP", "TOP").with_tags(["image"]))
            .unwrap();

        index.remove_entry("blur_top");
        check!(index.word_lookup("top").collect::<Vec<_>>() == ["edge_top"]);
        check!(index.tag_index.get("image").map(|ids| ids.len()) == Some(1));
    }

    #[test]
    fn test_clear() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();
        index.clear();
        check!(index.is_empty());
        check!(index.stats() == IndexStats::default());
        check!(index.vocabulary.is_empty());
    }

    #[test]
    fn test_facets_count_every_dimension() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();
        index.add_entry(lfo()).unwrap();
        index
            .add_entry(Entry::new("level_top", "Level TOP", "TOP").with_tags(["image"]))
            .unwrap();

        let facets = index.facets();
        let categories = BTreeMap::from([("CHOP".to_string(), 1_usize), ("TOP".to_string(), 2)]);
        check!(facets.categories == categories);
        check!(facets.tags["image"] == 2);
        check!(facets.tags["generator"] == 1);
        let subcategories =
            BTreeMap::from([("Filters".to_string(), 1_usize), ("Generators".to_string(), 1)]);
        check!(facets.subcategories == subcategories);
    }

    #[test]
    fn test_entries_in_category_sorted() {
        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();
        index.add_entry(Entry::new("add_top", "Add TOP", "TOP")).unwrap();

        let ids: Vec<_> = index.entries_in_category("TOP").iter().map(|e| e.id.as_str()).collect();
        check!(ids == ["add_top", "blur_top"]);
        check!(index.entries_in_category("SOP").is_empty());
        check!(index.entries_with_tag("filter").len() == 1);
    }

    #[test]
    fn test_export_drops_raw_html() {
        let mut index = DocIndex::default();
        let mut entry = lfo();
        entry.raw_html = Some("<p>LFO</p>".to_string());
        index.add_entry(entry).unwrap();

        let data = index.export_data();
        check!(data.entries.len() == 1);
        check!(data.entries[0][0] == "lfo_chop");
        check!(data.entries[0][1].get("rawHtml").is_none());
        check!(data.stats.map(|s| s.total_entries) == Some(1));
    }

    #[test]
    fn test_import_skips_malformed_records() {
        let data: ExportData = serde_json::from_value(json!({
            "entries": [
                ["lfo_chop", {"id": "lfo_chop", "name": "LFO CHOP", "category": "CHOP"}],
                ["broken", {"id": 7}],
                "not a pair",
                ["nameless", {"name": "No Id", "category": "TOP"}],
                ["wave_chop", {"id": "wave_chop", "name": "Wave CHOP", "category": "CHOP"}]
            ],
            "options": {"stemming": false}
        }))
        .unwrap();

        let mut index = DocIndex::default();
        index.add_entry(blur()).unwrap();

        check!(index.import_data(data) == 2);
        check!(!index.contains("blur_top"));
        check!(index.contains("wave_chop"));
        check!(!index.options().stemming);
        check!(index.options().stop_words);
    }

    #[test]
    fn test_options_override_accepts_snake_case() {
        let overrides: IndexOptionsOverride =
            serde_json::from_value(json!({"max_results": 5, "caseSensitive": true})).unwrap();
        let mut options = IndexOptions::default();
        overrides.apply(&mut options);
        check!(options.max_results == 5);
        check!(options.case_sensitive);
        check!(options.min_query_length == 2);
    }
}
