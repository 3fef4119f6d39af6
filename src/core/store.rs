//! Store trait for filtered, ordered, paginated reads

use crate::core::entity::Listing;
use crate::core::error::StoreError;
use crate::core::predicate::Filter;
use crate::core::query::{Page, SortKey};
use async_trait::async_trait;

/// Read access to one table of listing rows
///
/// Implementations translate a [`Filter`] into their own query language.
/// Both `count` and `fetch` must apply the same filter so that the total
/// reported to clients describes the set the page was cut from.
#[async_trait]
pub trait ListingStore<T: Listing>: Send + Sync {
    /// Short backend name used in logs and errors
    fn backend(&self) -> &'static str;

    /// Count all rows matching the filter
    async fn count(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// Fetch one page of matching rows in the given order
    async fn fetch(
        &self,
        filter: &Filter,
        order: &[SortKey],
        page: Page,
    ) -> Result<Vec<T>, StoreError>;

    /// Fetch the first row whose `field` equals `value`
    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<T>, StoreError>;
}
