//! Organizations that host events and book speakers

use crate::config::PaginationConfig;
use crate::core::entity::ListingQuery;
use crate::core::field::FieldFormat;
use crate::core::params;
use crate::core::predicate::{Filter, Predicate};
use crate::core::query::{Page, SortKey};
use crate::impl_listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Columns searched by the free-text `search` parameter
pub const SEARCH_FIELDS: &[&str] = &["name", "description", "industry"];

/// Columns matched by the `location` parameter
pub const LOCATION_FIELDS: &[&str] = &["location", "city", "state", "country"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl_listing!(
    Organization,
    plural: "organizations",
    singular: "organization",
    display: "Organization",
    key: id as FieldFormat::Uuid,
    order: [SortKey::asc("name"), SortKey::asc("id")],
    fields: [
        id,
        name,
        description,
        organization_type,
        industry,
        location,
        city,
        state,
        country,
        created_at,
    ],
);

/// Raw query string of `GET /api/organizations`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationQuery {
    pub search: Option<String>,
    pub organization_type: Option<String>,
    pub location: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated organization filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationFilter {
    pub search: Option<String>,
    pub organization_type: Option<String>,
    pub location: Option<String>,
}

impl OrganizationFilter {
    pub fn from_query(query: &OrganizationQuery) -> Self {
        Self {
            search: params::text_term(query.search.as_deref()),
            organization_type: params::text_term(query.organization_type.as_deref()),
            location: params::text_term(query.location.as_deref()),
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
                self.organization_type
                    .as_ref()
                    .map(|t| Predicate::equals("organization_type", t.as_str())),
            )
            .and_maybe(
                self.location
                    .as_ref()
                    .map(|l| Predicate::contains_any(LOCATION_FIELDS, l.as_str())),
            )
    }
}

impl ListingQuery for OrganizationQuery {
    type Entity = Organization;

    fn parse(&self, pagination: &PaginationConfig) -> (Filter, Page) {
        let filter = OrganizationFilter::from_query(self).to_filter();
        let page = Page::from_params(self.limit.as_deref(), self.offset.as_deref(), pagination);
        (filter, page)
    }
}
