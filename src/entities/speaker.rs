//! Speakers listed in the directory

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

pub const SEARCH_FIELDS: &[&str] = &["name", "title", "bio"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl_listing!(
    Speaker,
    plural: "speakers",
    singular: "speaker",
    display: "Speaker",
    key: slug as FieldFormat::Slug,
    order: [SortKey::desc("rating"), SortKey::asc("name"), SortKey::asc("id")],
    fields: [
        id,
        slug,
        name,
        title,
        bio,
        specialties,
        location,
        rating,
        review_count,
        created_at,
    ],
);

/// Raw query string of `GET /api/speakers`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerQuery {
    pub search: Option<String>,
    pub specialties: Option<String>,
    pub location: Option<String>,
    pub min_rating: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated speaker filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerFilter {
    pub search: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub location: Option<String>,
    pub min_rating: Option<f64>,
}

impl SpeakerFilter {
    pub fn from_query(query: &SpeakerQuery) -> Self {
        Self {
            search: params::text_term(query.search.as_deref()),
            specialties: params::tag_list(query.specialties.as_deref()),
            location: params::text_term(query.location.as_deref()),
            min_rating: params::threshold(query.min_rating.as_deref()),
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
                self.specialties
                    .as_ref()
                    .map(|tags| Predicate::overlaps("specialties", tags.clone())),
            )
            .and_maybe(
                self.location
                    .as_ref()
                    .map(|l| Predicate::contains_any(&["location"], l.as_str())),
            )
            .and_maybe(self.min_rating.map(|r| Predicate::at_least("rating", r)))
    }
}

impl ListingQuery for SpeakerQuery {
    type Entity = Speaker;

    fn parse(&self, pagination: &PaginationConfig) -> (Filter, Page) {
        let filter = SpeakerFilter::from_query(self).to_filter();
        let page = Page::from_params(self.limit.as_deref(), self.offset.as_deref(), pagination);
        (filter, page)
    }
}
