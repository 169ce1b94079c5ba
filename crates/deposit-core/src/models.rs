//! Data models for the deposit form.
//!
//! Shapes here are what the form hands to the renderer: suggestion lists,
//! the record slice the form edits, and the validation error events the
//! backend emits.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

// =============================================================================
// LOOKUPS
// =============================================================================

/// Query parameters sent with a lookup request.
pub type QueryParams = Map<String, JsonValue>;

/// Call-time options for a lookup: the endpoint and any extra parameters
/// the form definition attaches to the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupOptions {
    pub url: String,
    #[serde(default, rename = "extraParams")]
    pub extra_params: QueryParams,
}

impl LookupOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra_params: QueryParams::new(),
        }
    }

    /// Add an extra query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }
}

/// Anything a suggestion can be matched against by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A single autocomplete candidate.
///
/// `text` is what the widget displays; `value` is the payload written into
/// the record when the user picks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion<V> {
    pub text: String,
    pub value: V,
}

impl<V: Named> Suggestion<V> {
    /// Name of the underlying payload.
    pub fn name(&self) -> &str {
        self.value.name()
    }
}

/// License suggestion. Display text and value are both the license id.
pub type LicenseSuggestion = Suggestion<String>;

pub type KeywordSuggestion = Suggestion<Keyword>;

pub type AuthorSuggestion = Suggestion<Author>;

impl Suggestion<String> {
    pub fn license(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            text: id.clone(),
            value: id,
        }
    }
}

// =============================================================================
// KEYWORDS
// =============================================================================

/// A controlled or free-text keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    /// Identifier in the controlled vocabulary. Free-text keywords have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

impl Keyword {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_id: None,
        }
    }

    pub fn with_key(name: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_id: Some(key_id.into()),
        }
    }
}

impl Named for Keyword {
    fn name(&self) -> &str {
        &self.name
    }
}

impl From<Keyword> for Suggestion<Keyword> {
    fn from(keyword: Keyword) -> Self {
        Self {
            text: keyword.name.clone(),
            value: keyword,
        }
    }
}

// =============================================================================
// AUTHORS
// =============================================================================

/// Identifier of an author in an external system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorId {
    pub value: String,
    /// External system name: "cern", "cds" or "inspire".
    pub source: String,
}

/// Contributor entry as stored on the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// `"Lastname, Firstname"`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Set on directory entries, even when empty. Typed-in authors have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<AuthorId>>,
}

impl Named for Author {
    fn name(&self) -> &str {
        &self.name
    }
}

impl From<Author> for Suggestion<Author> {
    fn from(author: Author) -> Self {
        Self {
            text: strip_commas(&author.name),
            value: author,
        }
    }
}

/// Remove every comma from `s`.
pub fn strip_commas(s: &str) -> String {
    s.replace(',', "")
}

// =============================================================================
// CATEGORIES AND TYPES
// =============================================================================

/// A deposit category and the types allowed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub value: String,
    pub types: Vec<String>,
}

/// A deposit type, annotated with the category that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    pub value: String,
    pub category: String,
}

impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for TypeEntry {
    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Dotted path of a form field, e.g. `title.title` or `contributors`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build a path from a form key, e.g. `["title", "title"]` → `title.title`.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        Self(
            segments
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join("."),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A server-side validation failure for one field of a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: FieldPath,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<FieldPath>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Signal delivered to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSignal {
    /// Show `message` as the field's backend validation error.
    Error { field: FieldPath, message: String },
    /// Remove the field's backend validation error.
    Clear { field: FieldPath },
}

// =============================================================================
// RECORD
// =============================================================================

/// Copyright statement attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copyright {
    pub holder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The part of a deposit the metadata form reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Deposit identifier; validation events are scoped by it.
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<Copyright>,
    /// Published deposits render read-only.
    #[serde(default)]
    pub published: bool,
}

impl DepositRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}
