//! Core module containing the listing abstractions shared by every entity

pub mod entity;
pub mod error;
pub mod field;
pub mod params;
pub mod predicate;
pub mod query;
pub mod service;
pub mod store;

pub use entity::{Listing, ListingQuery};
pub use error::{ApiError, ConfigError, ErrorResponse, StoreError};
pub use field::{FieldFormat, FieldValue, IntoFieldValue};
pub use predicate::{Filter, Predicate};
pub use query::{ListPage, Page, SortDirection, SortKey};
pub use service::ListingService;
pub use store::ListingStore;
