//! The listing query builder shared by every directory endpoint

use crate::core::entity::Listing;
use crate::core::error::StoreError;
use crate::core::predicate::Filter;
use crate::core::query::{ListPage, Page};
use crate::core::store::ListingStore;
use std::sync::Arc;

/// Runs listing queries for one entity type against a store
///
/// Stateless apart from the store handle: every call re-executes the count
/// query and then the data query. Failures are returned as-is, with no retry
/// and no partial result.
pub struct ListingService<T: Listing> {
    store: Arc<dyn ListingStore<T>>,
}

impl<T: Listing> Clone for ListingService<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T: Listing> ListingService<T> {
    pub fn new(store: Arc<dyn ListingStore<T>>) -> Self {
        Self { store }
    }

    /// Build a service from a concrete store
    pub fn from_store(store: impl ListingStore<T> + 'static) -> Self {
        Self::new(Arc::new(store))
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// List one page of rows matching `filter`, in the entity's fixed order
    ///
    /// `total` counts every matching row. When the page cannot contain any
    /// row (`limit` 0, or `offset` at or past `total`) the data query is
    /// skipped and the page is empty.
    pub async fn list(&self, filter: &Filter, page: Page) -> Result<ListPage<T>, StoreError> {
        let total = self.store.count(filter).await?;

        let items = if page.limit == 0 || page.offset >= total {
            Vec::new()
        } else {
            self.store.fetch(filter, T::default_order(), page).await?
        };

        tracing::debug!(
            entity = T::SINGULAR,
            backend = self.store.backend(),
            predicates = filter.len(),
            limit = page.limit,
            offset = page.offset,
            total,
            returned = items.len(),
            "listing query"
        );

        Ok(ListPage::new(items, total, page))
    }

    /// Look up one row by the entity's key column
    ///
    /// Keys that do not match the entity's key format are treated as missing
    /// without querying the store.
    pub async fn get(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(key) = T::key_format().canonicalize(key) else {
            tracing::debug!(entity = T::SINGULAR, key, "rejected malformed key");
            return Ok(None);
        };
        self.store.find_by(T::KEY_FIELD, &key).await
    }
}
