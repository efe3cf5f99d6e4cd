//! Documentation entries: one documented operator, class or concept.
//!
//! An [`Entry`] carries its own scoring function over its fields; the index
//! only gathers candidates and delegates relevance to [`Entry::search`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relevance contributed by a name match.
const NAME_WEIGHT: f64 = 10.0;
/// Relevance contributed by a description match.
const DESCRIPTION_WEIGHT: f64 = 5.0;
/// Relevance contributed by each matching keyword.
const KEYWORD_WEIGHT: f64 = 3.0;
/// Relevance contributed by each matching parameter name.
const PARAMETER_WEIGHT: f64 = 2.0;

/// Allowed range for [`Entry::search_weight`].
const SEARCH_WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Key of the bulk source markup dropped from serialized entries by default.
const RAW_DATA_KEY: &str = "rawHtml";

/// The closed set of documentation categories.
///
/// The first seven are operator families; the rest cover the scripting API
/// and long-form material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Top,
    Chop,
    Sop,
    Dat,
    Mat,
    Comp,
    Pop,
    Python,
    Tutorial,
    Workflow,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Top,
        Self::Chop,
        Self::Sop,
        Self::Dat,
        Self::Mat,
        Self::Comp,
        Self::Pop,
        Self::Python,
        Self::Tutorial,
        Self::Workflow,
    ];

    /// Canonical spelling used in entries and facets.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Chop => "CHOP",
            Self::Sop => "SOP",
            Self::Dat => "DAT",
            Self::Mat => "MAT",
            Self::Comp => "COMP",
            Self::Pop => "POP",
            Self::Python => "PYTHON",
            Self::Tutorial => "TUTORIAL",
            Self::Workflow => "WORKFLOW",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Category names are exact: `"TOP"` parses, `"top"` does not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One documented parameter of an operator or API member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Outcome of [`Entry::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// The entry field a query matched, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    Name,
    Description,
    Keyword,
    Parameter,
}

/// A field value that contributed to an entry's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: MatchField,
    pub value: String,
}

/// Reduced projection of an entry used in result payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub keyword_count: usize,
    pub parameter_count: usize,
}

/// Relevance of one entry against one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryMatch {
    pub score: f64,
    pub matches: Vec<FieldMatch>,
    pub summary: EntrySummary,
}

/// A documented concept: an operator, an API class, a tutorial page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub description: String,
    pub summary: String,
    pub details: String,
    pub usage: String,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    #[serde(with = "weight")]
    pub search_weight: f64,
    /// Original page markup, kept only when explicitly requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
    #[serde(skip)]
    validation: Option<ValidationReport>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            display_name: String::new(),
            category: String::new(),
            subcategory: None,
            description: String::new(),
            summary: String::new(),
            details: String::new(),
            usage: String::new(),
            keywords: Vec::new(),
            tags: Vec::new(),
            parameters: Vec::new(),
            search_weight: 1.0,
            raw_html: None,
            validation: None,
        }
    }
}

impl Entry {
    /// Create an entry with its identity and category; content fields start empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut entry = Self {
            id: id.into(),
            display_name: name.clone(),
            name,
            category: category.into(),
            ..Self::default()
        };
        entry.validate();
        entry
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
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

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_search_weight(mut self, weight: f64) -> Self {
        self.search_weight = weight;
        self.validate();
        self
    }

    /// The parsed category, if it belongs to the closed set.
    pub fn category_kind(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    /// Recompute validity and cache the result on the entry.
    pub fn validate(&mut self) -> &ValidationReport {
        let report = self.check();
        self.validation.insert(report)
    }

    fn check(&self) -> ValidationReport {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push("Entry ID is required".to_string());
        }
        if self.name.is_empty() {
            errors.push("Entry name is required".to_string());
        }
        if self.category.is_empty() {
            errors.push("Entry category is required".to_string());
        } else if self.category_kind().is_none() {
            errors.push(format!("Invalid category: {}", self.category));
        }
        if !SEARCH_WEIGHT_RANGE.contains(&self.search_weight) {
            errors.push(format!(
                "Search weight must be between 0 and 10, got {}",
                self.search_weight
            ));
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Result of the last [`Entry::validate`] call, if any.
    pub fn validation(&self) -> Option<&ValidationReport> {
        self.validation.as_ref()
    }

    /// Cached validity, or a fresh check when the entry was never validated.
    pub fn is_valid(&self) -> bool {
        self.validation
            .as_ref()
            .map_or_else(|| self.check().is_valid, |report| report.is_valid)
    }

    /// Score this entry against a raw query.
    ///
    /// Matching is case-insensitive substring containment per field: name (10),
    /// description (5), each keyword (3), each parameter name (2). The sum is
    /// scaled by `search_weight`.
    pub fn search(&self, query: &str) -> EntryMatch {
        let query = query.to_lowercase();
        let mut score = 0.0;
        let mut matches = Vec::new();

        if query.is_empty() {
            return EntryMatch {
                score,
                matches,
                summary: self.summary(),
            };
        }

        if self.name.to_lowercase().contains(&query) {
            score += NAME_WEIGHT;
            matches.push(FieldMatch {
                field: MatchField::Name,
                value: self.name.clone(),
            });
        }

        if self.description.to_lowercase().contains(&query) {
            score += DESCRIPTION_WEIGHT;
            matches.push(FieldMatch {
                field: MatchField::Description,
                value: self.description.clone(),
            });
        }

        for keyword in &self.keywords {
            if keyword.to_lowercase().contains(&query) {
                score += KEYWORD_WEIGHT;
                matches.push(FieldMatch {
                    field: MatchField::Keyword,
                    value: keyword.clone(),
                });
            }
        }

        for parameter in &self.parameters {
            if parameter.name.to_lowercase().contains(&query) {
                score += PARAMETER_WEIGHT;
                matches.push(FieldMatch {
                    field: MatchField::Parameter,
                    value: parameter.name.clone(),
                });
            }
        }

        EntryMatch {
            score: score * self.search_weight,
            matches,
            summary: self.summary(),
        }
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            keyword_count: self.keywords.len(),
            parameter_count: self.parameters.len(),
        }
    }

    /// Serialize to JSON, dropping the raw source markup unless `include_raw_data`.
    pub fn to_value(&self, include_raw_data: bool) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if !include_raw_data && let Some(object) = value.as_object_mut() {
            object.remove(RAW_DATA_KEY);
        }
        value
    }

    /// Deserialize an entry, defaulting `displayName` to `name` and validating it.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        let mut entry: Self = serde_json::from_value(value)?;
        if entry.display_name.is_empty() {
            entry.display_name.clone_from(&entry.name);
        }
        entry.validate();
        Ok(entry)
    }
}

/// JSON has no encoding for infinities or NaN, so non-finite weights are
/// written as strings ("inf", "-inf", "NaN") and read back from them.
/// Any other non-number (including `null`) reads as NaN, which fails validation.
mod weight {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub(super) fn serialize<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if weight.is_finite() {
            serializer.serialize_f64(*weight)
        } else {
            serializer.serialize_str(&weight.to_string())
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
            Value::String(text) => text.parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        })
    }
}
