//! The listing abstraction shared by every directory entity

use crate::config::PaginationConfig;
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::predicate::Filter;
use crate::core::query::{Page, SortKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A flat, read-only row exposed through a listing endpoint.
///
/// Rows are owned by the external store; this crate only projects them.
/// Implementations are normally generated with [`impl_listing!`](crate::impl_listing).
pub trait Listing: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Plural name, used as the route segment and the response key
    const PLURAL: &'static str;

    /// Singular name, used in log fields
    const SINGULAR: &'static str;

    /// Human-readable name used in client-facing messages
    const DISPLAY_NAME: &'static str;

    /// Column used by the detail route lookup (`id`, `slug`, ...)
    const KEY_FIELD: &'static str;

    /// Every column the row exposes to predicates and ordering
    const COLUMNS: &'static [&'static str];

    /// Accepted format of the detail route key
    fn key_format() -> FieldFormat;

    /// Fixed ordering applied before pagination
    fn default_order() -> &'static [SortKey];

    /// Read a column by name; unknown or empty columns are `Null`
    fn field(&self, name: &str) -> FieldValue;
}

/// Query-string parameters of a listing endpoint
///
/// Parsing never fails: unusable values drop the corresponding filter and
/// pagination falls back to its defaults.
pub trait ListingQuery: DeserializeOwned + Default + Send + 'static {
    type Entity: Listing;

    /// Split into the conjunctive filter and the page bounds
    fn parse(&self, pagination: &PaginationConfig) -> (Filter, Page);

    /// Build from decoded query-string pairs
    ///
    /// The first occurrence of a repeated key wins.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut values = serde_json::Map::new();
        for (key, value) in pairs {
            values.entry(key).or_insert(Value::String(value));
        }
        match serde_json::from_value(Value::Object(values)) {
            Ok(query) => query,
            Err(e) => {
                let resource = <Self::Entity as Listing>::PLURAL;
                tracing::warn!(
                    resource,
                    error = %e,
                    "ignoring undecodable query string"
                );
                Self::default()
            }
        }
    }
}
