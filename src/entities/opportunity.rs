//! Speaking opportunities posted by organizations

use crate::config::PaginationConfig;
use crate::core::entity::ListingQuery;
use crate::core::field::{FieldFormat, FieldValue, IntoFieldValue};
use crate::core::params;
use crate::core::predicate::{Filter, Predicate};
use crate::core::query::{Page, SortKey};
use crate::impl_listing;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const SEARCH_FIELDS: &[&str] = &["title", "description", "organization_name"];

/// How an event is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFormat {
    #[serde(rename = "In-Person")]
    InPerson,
    Virtual,
    Hybrid,
}

impl EventFormat {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventFormat::InPerson => "In-Person",
            EventFormat::Virtual => "Virtual",
            EventFormat::Hybrid => "Hybrid",
        }
    }

    /// Parse a client-supplied format, ignoring case and separators
    ///
    /// `In-Person`, `in_person`, `inperson` and `In Person` are all accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "inperson" => Some(EventFormat::InPerson),
            "virtual" => Some(EventFormat::Virtual),
            "hybrid" => Some(EventFormat::Hybrid),
            _ => None,
        }
    }
}

impl fmt::Display for EventFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IntoFieldValue for EventFormat {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub event_format: EventFormat,
    #[serde(default)]
    pub compensation: Option<f64>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl_listing!(
    Opportunity,
    plural: "opportunities",
    singular: "opportunity",
    display: "Opportunity",
    key: id as FieldFormat::Uuid,
    order: [SortKey::desc("created_at"), SortKey::asc("id")],
    fields: [
        id,
        title,
        description,
        organization_name,
        topics,
        location,
        event_format,
        compensation,
        event_date,
        created_at,
    ],
);

/// Raw query string of `GET /api/opportunities`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityQuery {
    pub search: Option<String>,
    pub topics: Option<String>,
    pub location: Option<String>,
    pub event_format: Option<String>,
    pub min_compensation: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated opportunity filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityFilter {
    pub search: Option<String>,
    pub topics: Option<Vec<String>>,
    pub location: Option<String>,
    pub event_format: Option<EventFormat>,
    pub min_compensation: Option<f64>,
}

impl OpportunityFilter {
    pub fn from_query(query: &OpportunityQuery) -> Self {
        Self {
            search: params::text_term(query.search.as_deref()),
            topics: params::tag_list(query.topics.as_deref()),
            location: params::text_term(query.location.as_deref()),
            event_format: query.event_format.as_deref().and_then(EventFormat::parse),
            min_compensation: params::threshold(query.min_compensation.as_deref()),
        }
    }

    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .and_maybe(
                self.search
                    .as_ref()
                    .map(|s| Predicate::contains_any(SEARCH_FIELDS, s.as_str())),
            )
            .and_maybe(
                self.topics
                    .as_ref()
                    .map(|tags| Predicate::overlaps("topics", tags.clone())),
            )
            .and_maybe(
                self.location
                    .as_ref()
                    .map(|l| Predicate::contains_any(&["location"], l.as_str())),
            )
            .and_maybe(
                self.event_format
                    .map(|f| Predicate::equals("event_format", f.as_str())),
            )
            .and_maybe(
                self.min_compensation
                    .map(|c| Predicate::at_least("compensation", c)),
            )
    }
}

impl ListingQuery for OpportunityQuery {
    type Entity = Opportunity;

    fn parse(&self, pagination: &PaginationConfig) -> (Filter, Page) {
        let filter = OpportunityFilter::from_query(self).to_filter();
        let page = Page::from_params(self.limit.as_deref(), self.offset.as_deref(), pagination);
        (filter, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Listing;

    #[test]
    fn test_event_format_parse() {
        assert_eq!(EventFormat::parse("Virtual"), Some(EventFormat::Virtual));
        assert_eq!(EventFormat::parse("HYBRID"), Some(EventFormat::Hybrid));
        assert_eq!(EventFormat::parse("In-Person"), Some(EventFormat::InPerson));
        assert_eq!(EventFormat::parse("in_person"), Some(EventFormat::InPerson));
        assert_eq!(EventFormat::parse("in person"), Some(EventFormat::InPerson));
        assert_eq!(EventFormat::parse("webinar"), None);
        assert_eq!(EventFormat::parse(""), None);
    }

    #[test]
    fn test_event_format_serde() {
        let json = serde_json::to_string(&EventFormat::InPerson).unwrap();
        assert_eq!(json, "\"In-Person\"");
        let parsed: EventFormat = serde_json::from_str("\"Hybrid\"").unwrap();
        assert_eq!(parsed, EventFormat::Hybrid);
    }

    #[test]
    fn test_unknown_format_is_absent() {
        let query = OpportunityQuery {
            event_format: Some("telepathic".to_string()),
            min_compensation: Some("lots".to_string()),
            ..Default::default()
        };
        assert!(OpportunityFilter::from_query(&query).to_filter().is_empty());
    }

    #[test]
    fn test_format_and_compensation() {
        let query = OpportunityQuery {
            event_format: Some("virtual".to_string()),
            min_compensation: Some("1000".to_string()),
            ..Default::default()
        };
        let (filter, page) = query.parse(&PaginationConfig::default());
        assert_eq!(
            filter.predicates(),
            &[
                Predicate::equals("event_format", "Virtual"),
                Predicate::at_least("compensation", 1000.0),
            ]
        );
        assert_eq!(page, Page::new(12, 0));
    }

    #[test]
    fn test_predicates_reference_known_columns() {
        let query = OpportunityQuery {
            search: Some("x".to_string()),
            topics: Some("x".to_string()),
            location: Some("x".to_string()),
            event_format: Some("hybrid".to_string()),
            min_compensation: Some("1".to_string()),
            ..Default::default()
        };
        let (filter, _) = query.parse(&PaginationConfig::default());
        assert_eq!(filter.len(), 5);
        for field in filter.predicates().iter().flat_map(|p| p.fields()) {
            assert!(Opportunity::COLUMNS.contains(&field), "unknown column {field}");
        }
    }
}
