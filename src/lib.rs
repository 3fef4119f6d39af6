//! # CoveTalks Directory
//!
//! Filtered, paginated listing API for the CoveTalks directory of
//! organizations, speakers and speaking opportunities.
//!
//! ## Features
//!
//! - **Composable filters**: free-text search, exact matches, tag overlap and
//!   numeric thresholds, combined conjunctively
//! - **Stable pagination**: a fixed per-entity ordering and a total that does
//!   not depend on the requested page
//! - **Pluggable stores**: in-memory, hosted PostgREST, or direct PostgreSQL
//!   (`postgres` feature)
//! - **Lenient parameters**: malformed query values drop the filter instead of
//!   failing the request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use covetalks::prelude::*;
//!
//! let app = ServerBuilder::new(AppConfig::default())
//!     .register::<SpeakerQuery>(ListingService::from_store(InMemoryStore::new()))
//!     .build();
//!
//! // GET /api/speakers?specialties=leadership&minRating=4.5&limit=12
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Listing, ListingQuery},
        error::{ApiError, StoreError},
        field::{FieldFormat, FieldValue},
        predicate::{Filter, Predicate},
        query::{ListPage, Page, SortKey},
        service::ListingService,
        store::ListingStore,
    };

    // === Macros ===
    pub use crate::impl_listing;

    // === Entities ===
    pub use crate::entities::{
        EventFormat, Opportunity, OpportunityQuery, Organization, OrganizationQuery, Speaker,
        SpeakerQuery,
    };

    // === Storage ===
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;
    pub use crate::storage::{InMemoryStore, PostgrestStore};

    // === Config ===
    pub use crate::config::{AppConfig, PaginationConfig, StoreBackend};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
