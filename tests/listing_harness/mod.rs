//! Shared fixtures and conformance tests for listing stores
//!
//! Provides a small directory (organizations, speakers, opportunities) and
//! the `listing_store_tests!` macro, which checks a store implementation
//! against the in-memory reference semantics.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod listing_harness;
//! use listing_harness::*;
//! ```

#![allow(dead_code, unused_macros)]

use axum_test::TestServer;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use covetalks::config::AppConfig;
use covetalks::core::service::ListingService;
use covetalks::entities::{
    EventFormat, Opportunity, OpportunityQuery, Organization, OrganizationQuery, Speaker,
    SpeakerQuery,
};
use covetalks::server::ServerBuilder;
use covetalks::storage::InMemoryStore;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Deterministic id so ordering ties and detail lookups are reproducible
pub fn fixed_id(n: u128) -> Uuid {
    Uuid::from_u128(0x6a1f_0000_0000_4000_8000_0000_0000_0000 | n)
}

pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Organizations: three mention "education"
// ---------------------------------------------------------------------------

fn organization(
    n: u128,
    name: &str,
    description: Option<&str>,
    organization_type: &str,
    industry: &str,
    city: &str,
    state: &str,
) -> Organization {
    Organization {
        id: fixed_id(n),
        name: name.to_string(),
        description: description.map(str::to_string),
        organization_type: text(organization_type),
        industry: text(industry),
        location: None,
        city: text(city),
        state: text(state),
        country: text("USA"),
        website: None,
        logo_url: None,
        created_at: day(2024, 1, n as u32),
    }
}

pub fn organizations() -> Vec<Organization> {
    vec![
        organization(
            1,
            "Teach Forward",
            Some("Nonprofit advancing education equity"),
            "Nonprofit",
            "Social Services",
            "Denver",
            "Colorado",
        ),
        organization(
            2,
            "Acme Robotics",
            None,
            "Company",
            "Manufacturing",
            "Austin",
            "Texas",
        ),
        organization(
            3,
            "Lakeside Community College",
            Some("Continuing Education for adults"),
            "College",
            "Higher Ed",
            "Cleveland",
            "Ohio",
        ),
        organization(
            4,
            "Harbor Health",
            Some("Regional hospital network"),
            "Hospital",
            "Healthcare",
            "Boston",
            "Massachusetts",
        ),
        organization(
            5,
            "Bright Futures Academy",
            None,
            "School",
            "Education",
            "Columbus",
            "Ohio",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Speakers
// ---------------------------------------------------------------------------

fn speaker(
    n: u128,
    slug: &str,
    name: &str,
    bio: &str,
    specialties: &[&str],
    location: &str,
    rating: Option<f64>,
) -> Speaker {
    Speaker {
        id: fixed_id(100 + n),
        slug: slug.to_string(),
        name: name.to_string(),
        title: None,
        bio: text(bio),
        specialties: tags(specialties),
        location: text(location),
        rating,
        review_count: n as i64,
        profile_image_url: None,
        created_at: day(2024, 2, n as u32),
    }
}

pub fn speakers() -> Vec<Speaker> {
    vec![
        speaker(
            1,
            "ada-lovelace",
            "Ada Lovelace",
            "Leadership lessons from early computing",
            &["leadership", "technology"],
            "London, UK",
            Some(4.9),
        ),
        speaker(
            2,
            "grace-hopper",
            "Grace Hopper",
            "Debugging careers and organizations",
            &["technology", "innovation"],
            "Arlington, VA",
            Some(4.8),
        ),
        speaker(
            3,
            "bree-brown",
            "Bree Brown",
            "Courage at work",
            &["leadership", "wellness"],
            "Houston, TX",
            Some(4.7),
        ),
        speaker(
            4,
            "carl-sagan",
            "Carl Sagan",
            "Science communication",
            &["science"],
            "Ithaca, NY",
            None,
        ),
        speaker(
            5,
            "dale-carnegie",
            "Dale Carnegie",
            "Public speaking with 100% confidence",
            &["public speaking", "leadership"],
            "New York, NY",
            Some(4.2),
        ),
        speaker(
            6,
            "alan-turing",
            "Alan Turing",
            "Machine intelligence for everyone",
            &["ai", "technology"],
            "Manchester, UK",
            Some(4.5),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Opportunities
// ---------------------------------------------------------------------------

fn opportunity(
    n: u128,
    title: &str,
    organization_name: &str,
    topics: &[&str],
    event_format: EventFormat,
    compensation: Option<f64>,
    created_at: DateTime<Utc>,
) -> Opportunity {
    Opportunity {
        id: fixed_id(200 + n),
        title: title.to_string(),
        description: None,
        organization_name: text(organization_name),
        topics: tags(topics),
        location: text("Austin, TX"),
        event_format,
        compensation,
        event_date: NaiveDate::from_ymd_opt(2024, 6, n as u32),
        created_at,
    }
}

pub fn opportunities() -> Vec<Opportunity> {
    vec![
        opportunity(
            1,
            "Keynote: Future of Work",
            "Acme Robotics",
            &["leadership", "technology"],
            EventFormat::InPerson,
            Some(5000.0),
            day(2024, 3, 1),
        ),
        opportunity(
            2,
            "Virtual Panel on AI Ethics",
            "Harbor Health",
            &["ai", "ethics"],
            EventFormat::Virtual,
            Some(500.0),
            day(2024, 3, 5),
        ),
        opportunity(
            3,
            "Hybrid Workshop: Storytelling",
            "Teach Forward",
            &["communication"],
            EventFormat::Hybrid,
            Some(1500.0),
            day(2024, 2, 20),
        ),
        opportunity(
            4,
            "Volunteer Career Day",
            "Bright Futures Academy",
            &["education"],
            EventFormat::InPerson,
            None,
            day(2024, 3, 10),
        ),
    ]
}

// ---------------------------------------------------------------------------
// HTTP server over the fixtures
// ---------------------------------------------------------------------------

/// Router with all three entities served from in-memory stores
pub fn directory_app() -> axum::Router {
    ServerBuilder::new(AppConfig::default())
        .register::<OrganizationQuery>(ListingService::from_store(InMemoryStore::with_rows(
            organizations(),
        )))
        .register::<SpeakerQuery>(ListingService::from_store(InMemoryStore::with_rows(
            speakers(),
        )))
        .register::<OpportunityQuery>(ListingService::from_store(InMemoryStore::with_rows(
            opportunities(),
        )))
        .build()
}

pub fn test_server() -> TestServer {
    TestServer::try_new(directory_app()).expect("Failed to create test server")
}

// ---------------------------------------------------------------------------
// Store conformance
// ---------------------------------------------------------------------------

/// Generate store conformance tests
///
/// `$organizations`, `$speakers` and `$opportunities` are async factories
/// taking the rows to seed and returning a fresh store holding exactly those
/// rows.
macro_rules! listing_store_tests {
    (
        organizations: $organizations:expr,
        speakers: $speakers:expr,
        opportunities: $opportunities:expr $(,)?
    ) => {
        mod listing_store_conformance {
            use super::*;
            use covetalks::core::entity::Listing;
            use covetalks::core::predicate::{Filter, Predicate};
            use covetalks::core::query::Page;
            use covetalks::core::store::ListingStore;
            use covetalks::entities::{Opportunity, Organization, Speaker};

            async fn organization_store() -> impl ListingStore<Organization> {
                ($organizations)(crate::listing_harness::organizations()).await
            }

            async fn speaker_store() -> impl ListingStore<Speaker> {
                ($speakers)(crate::listing_harness::speakers()).await
            }

            async fn opportunity_store() -> impl ListingStore<Opportunity> {
                ($opportunities)(crate::listing_harness::opportunities()).await
            }

            fn slugs(rows: &[Speaker]) -> Vec<&str> {
                rows.iter().map(|s| s.slug.as_str()).collect()
            }

            fn org_names(rows: &[Organization]) -> Vec<&str> {
                rows.iter().map(|o| o.name.as_str()).collect()
            }

            #[tokio::test]
            async fn test_organizations_ordered_by_name() {
                let store = organization_store().await;
                let rows = store
                    .fetch(&Filter::new(), Organization::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                assert_eq!(
                    org_names(&rows),
                    vec![
                        "Acme Robotics",
                        "Bright Futures Academy",
                        "Harbor Health",
                        "Lakeside Community College",
                        "Teach Forward",
                    ]
                );
            }

            #[tokio::test]
            async fn test_organization_search_first_page() {
                let store = organization_store().await;
                let filter = Filter::new().and(Predicate::contains_any(
                    covetalks::entities::organization::SEARCH_FIELDS,
                    "education",
                ));

                assert_eq!(store.count(&filter).await.unwrap(), 3);
                let rows = store
                    .fetch(&filter, Organization::default_order(), Page::new(2, 0))
                    .await
                    .unwrap();
                assert_eq!(
                    org_names(&rows),
                    vec!["Bright Futures Academy", "Lakeside Community College"]
                );
            }

            #[tokio::test]
            async fn test_organization_location_spans_columns() {
                let store = organization_store().await;
                let location = |term: &str| {
                    Filter::new().and(Predicate::contains_any(
                        covetalks::entities::organization::LOCATION_FIELDS,
                        term,
                    ))
                };

                assert_eq!(store.count(&location("ohio")).await.unwrap(), 2);
                assert_eq!(store.count(&location("usa")).await.unwrap(), 5);

                // "Colorado" matches on state, "Columbus" on city
                let rows = store
                    .fetch(&location("col"), Organization::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                assert_eq!(org_names(&rows), vec!["Bright Futures Academy", "Teach Forward"]);
            }

            #[tokio::test]
            async fn test_organization_type_and_search_combine() {
                let store = organization_store().await;
                let filter = Filter::new()
                    .and(Predicate::contains_any(
                        covetalks::entities::organization::SEARCH_FIELDS,
                        "education",
                    ))
                    .and(Predicate::equals("organization_type", "College"));
                let rows = store
                    .fetch(&filter, Organization::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                assert_eq!(org_names(&rows), vec!["Lakeside Community College"]);
            }

            #[tokio::test]
            async fn test_find_organization_by_id() {
                let store = organization_store().await;
                let id = crate::listing_harness::fixed_id(4).to_string();
                let found = store.find_by("id", &id).await.unwrap();
                assert_eq!(found.map(|o| o.name), Some("Harbor Health".to_string()));
            }

            #[tokio::test]
            async fn test_count_without_filter() {
                let store = speaker_store().await;
                assert_eq!(store.count(&Filter::new()).await.unwrap(), 6);
            }

            #[tokio::test]
            async fn test_default_order_puts_unrated_last() {
                let store = speaker_store().await;
                let rows = store
                    .fetch(&Filter::new(), Speaker::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                assert_eq!(
                    slugs(&rows),
                    vec![
                        "ada-lovelace",
                        "grace-hopper",
                        "bree-brown",
                        "alan-turing",
                        "dale-carnegie",
                        "carl-sagan",
                    ]
                );
            }

            #[tokio::test]
            async fn test_substring_search_is_case_insensitive_across_fields() {
                let store = speaker_store().await;
                let filter =
                    Filter::new().and(Predicate::contains_any(&["name", "title", "bio"], "LEADER"));
                let rows = store
                    .fetch(&filter, Speaker::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                assert_eq!(slugs(&rows), vec!["ada-lovelace"]);
            }

            #[tokio::test]
            async fn test_like_metacharacters_match_literally() {
                let store = speaker_store().await;
                let percent = Filter::new().and(Predicate::contains_any(&["bio"], "100%"));
                assert_eq!(store.count(&percent).await.unwrap(), 1);

                let wildcard = Filter::new().and(Predicate::contains_any(&["bio"], "%"));
                assert_eq!(store.count(&wildcard).await.unwrap(), 1);

                let underscore = Filter::new().and(Predicate::contains_any(&["bio"], "_"));
                assert_eq!(store.count(&underscore).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_asterisk_matches_literally() {
                let store = speaker_store().await;
                let search = |term: &str| {
                    Filter::new().and(Predicate::contains_any(&["name", "title", "bio"], term))
                };

                assert_eq!(store.count(&search("100")).await.unwrap(), 1);
                assert_eq!(store.count(&search("100*")).await.unwrap(), 0);
                assert_eq!(store.count(&search("*")).await.unwrap(), 0);
                assert_eq!(store.count(&search("a*a")).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_overlap_and_threshold_are_conjunctive() {
                let store = speaker_store().await;
                let filter = Filter::new()
                    .and(Predicate::overlaps(
                        "specialties",
                        vec!["leadership".into(), "ai".into()],
                    ))
                    .and(Predicate::at_least("rating", 4.5));

                assert_eq!(store.count(&filter).await.unwrap(), 3);
                let rows = store
                    .fetch(&filter, Speaker::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                assert_eq!(slugs(&rows), vec!["ada-lovelace", "bree-brown", "alan-turing"]);
            }

            #[tokio::test]
            async fn test_threshold_excludes_null() {
                let store = speaker_store().await;
                let filter = Filter::new().and(Predicate::at_least("rating", 0.0));
                assert_eq!(store.count(&filter).await.unwrap(), 5);
            }

            #[tokio::test]
            async fn test_pages_partition_the_ordered_result() {
                let store = speaker_store().await;
                let order = Speaker::default_order();
                let all = store
                    .fetch(&Filter::new(), order, Page::new(10, 0))
                    .await
                    .unwrap();
                let first = store
                    .fetch(&Filter::new(), order, Page::new(4, 0))
                    .await
                    .unwrap();
                let second = store
                    .fetch(&Filter::new(), order, Page::new(4, 4))
                    .await
                    .unwrap();

                assert_eq!(first.len(), 4);
                assert_eq!(second.len(), 2);
                let joined: Vec<Speaker> = first.into_iter().chain(second).collect();
                assert_eq!(joined, all);
            }

            #[tokio::test]
            async fn test_find_by_key() {
                let store = speaker_store().await;
                let found = store.find_by("slug", "grace-hopper").await.unwrap();
                assert_eq!(found.map(|s| s.name), Some("Grace Hopper".to_string()));
                assert!(store.find_by("slug", "nobody").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_equals_and_threshold_on_opportunities() {
                let store = opportunity_store().await;
                let virtual_paid = Filter::new()
                    .and(Predicate::equals("event_format", "Virtual"))
                    .and(Predicate::at_least("compensation", 1000.0));
                assert_eq!(store.count(&virtual_paid).await.unwrap(), 0);

                let in_person = Filter::new().and(Predicate::equals("event_format", "In-Person"));
                assert_eq!(store.count(&in_person).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_opportunities_newest_first() {
                let store = opportunity_store().await;
                let rows = store
                    .fetch(&Filter::new(), Opportunity::default_order(), Page::new(10, 0))
                    .await
                    .unwrap();
                let titles: Vec<&str> = rows.iter().map(|o| o.title.as_str()).collect();
                assert_eq!(
                    titles,
                    vec![
                        "Volunteer Career Day",
                        "Virtual Panel on AI Ethics",
                        "Keynote: Future of Work",
                        "Hybrid Workshop: Storytelling",
                    ]
                );
            }

            #[tokio::test]
            async fn test_find_opportunity_by_id() {
                let store = opportunity_store().await;
                let id = crate::listing_harness::fixed_id(203).to_string();
                let found = store.find_by("id", &id).await.unwrap();
                assert_eq!(
                    found.map(|o| o.title),
                    Some("Hybrid Workshop: Storytelling".to_string())
                );
            }
        }
    };
}
