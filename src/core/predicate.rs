//! Composable filter predicates
//!
//! A [`Filter`] is a conjunction of [`Predicate`]s. Predicates are plain data:
//! the in-memory store evaluates them directly with [`Predicate::matches`],
//! while the database backends compile them into their own query syntax.
//! Column names are `&'static str` so only entity definitions can name them;
//! user input only ever reaches predicate values.

use crate::core::entity::Listing;
use crate::core::field::FieldValue;

/// A single narrowing condition on a listing
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column equals the value exactly
    Equals { field: &'static str, value: String },

    /// Case-insensitive substring match on at least one of the columns
    ContainsAny {
        fields: Vec<&'static str>,
        needle: String,
    },

    /// Stored tag set shares at least one tag with the requested set
    Overlaps {
        field: &'static str,
        tags: Vec<String>,
    },

    /// Numeric column is greater than or equal to the bound
    AtLeast { field: &'static str, bound: f64 },
}

impl Predicate {
    pub fn equals(field: &'static str, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn contains_any(fields: &[&'static str], needle: impl Into<String>) -> Self {
        Predicate::ContainsAny {
            fields: fields.to_vec(),
            needle: needle.into(),
        }
    }

    pub fn overlaps(field: &'static str, tags: Vec<String>) -> Self {
        Predicate::Overlaps { field, tags }
    }

    pub fn at_least(field: &'static str, bound: f64) -> Self {
        Predicate::AtLeast { field, bound }
    }

    /// Columns this predicate reads
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            Predicate::Equals { field, .. }
            | Predicate::Overlaps { field, .. }
            | Predicate::AtLeast { field, .. } => vec![*field],
            Predicate::ContainsAny { fields, .. } => fields.clone(),
        }
    }

    /// Evaluate against a row. A null attribute never matches.
    pub fn matches<T: Listing>(&self, row: &T) -> bool {
        match self {
            Predicate::Equals { field, value } => {
                row.field(field).as_text().is_some_and(|v| v == value.as_str())
            }
            Predicate::ContainsAny { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| {
                    row.field(field)
                        .as_text()
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
            }
            Predicate::Overlaps { field, tags } => match row.field(field) {
                FieldValue::Tags(stored) => stored.iter().any(|t| tags.contains(t)),
                _ => false,
            },
            Predicate::AtLeast { field, bound } => row
                .field(field)
                .as_number()
                .is_some_and(|n| n >= *bound),
        }
    }
}

/// Conjunction of predicates; the empty filter matches every row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add a predicate when present; `None` imposes no constraint
    pub fn and_maybe(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(p) => self.and(p),
            None => self,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn matches<T: Listing>(&self, row: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

/// Escape `LIKE`/`ILIKE` metacharacters so the value matches literally
///
/// Escapes `\`, `%` and `_` with a backslash, which is PostgreSQL's default
/// escape character.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
