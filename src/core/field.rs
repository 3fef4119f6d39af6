//! Field value types and validation

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value read from a listing row
///
/// Predicates and sort keys address row attributes by column name and
/// compare the resulting `FieldValue`s, so the in-memory backend can
/// evaluate the same filters the database backends compile to queries.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Tags(Vec<String>),
    Null,
}

impl FieldValue {
    /// Get the value as text if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a tag set if possible
    pub fn as_tags(&self) -> Option<&[String]> {
        match self {
            FieldValue::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Compare two non-null values of compatible types
    ///
    /// Text compares case-insensitively first, then by raw bytes so the
    /// order stays total. Values of unrelated types compare equal.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Tags(a), FieldValue::Tags(b)) => a.cmp(b),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }
}

/// Conversion from a row attribute into a [`FieldValue`]
pub trait IntoFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl IntoFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl IntoFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(*self)
    }
}

impl IntoFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl IntoFieldValue for Uuid {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

impl IntoFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Timestamp(*self)
    }
}

impl IntoFieldValue for NaiveDate {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Date(*self)
    }
}

impl IntoFieldValue for Vec<String> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Tags(self.clone())
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map_or(FieldValue::Null, IntoFieldValue::to_field_value)
    }
}

/// Formats for identifiers accepted on detail routes
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Uuid,
    Slug,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a raw path value against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Uuid => Uuid::parse_str(value).is_ok(),
            FieldFormat::Slug => Self::is_valid_slug(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    /// Validate and normalize a key; `None` when it does not match
    ///
    /// UUIDs are rewritten to their lowercase hyphenated form so they compare
    /// equal to stored ids.
    pub fn canonicalize(&self, value: &str) -> Option<String> {
        match self {
            FieldFormat::Uuid => Uuid::parse_str(value).ok().map(|id| id.to_string()),
            _ => self.validate(value).then(|| value.to_string()),
        }
    }

    fn is_valid_slug(slug: &str) -> bool {
        static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = SLUG_REGEX.get_or_init(|| {
            Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid")
        });
        slug.len() <= 200 && regex.is_match(slug)
    }
}
