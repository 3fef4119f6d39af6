//! In-memory implementation of ListingStore for testing and development

use crate::core::entity::Listing;
use crate::core::error::{ConfigError, StoreError};
use crate::core::predicate::Filter;
use crate::core::query::{Page, SortKey, paginate, sort_rows};
use crate::core::store::ListingStore;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// In-memory listing store
///
/// Evaluates predicates directly against the rows. Uses RwLock for
/// thread-safe access.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T: Listing> InMemoryStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Create a store holding `rows`
    pub fn with_rows(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Load rows from a JSON array file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rows: Vec<T> = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            what: format!("seed file '{}'", path.display()),
            message: e.to_string(),
        })?;
        tracing::info!(
            entity = T::SINGULAR,
            rows = rows.len(),
            path = %path.display(),
            "loaded seed rows"
        );
        Ok(Self::with_rows(rows))
    }

    /// Append a row
    pub fn insert(&self, row: T) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        rows.push(row);
        Ok(())
    }

    fn matching(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(rows.iter().filter(|row| filter.matches(*row)).cloned().collect())
    }
}

impl<T: Listing> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Listing> ListingStore<T> for InMemoryStore<T> {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(rows.iter().filter(|row| filter.matches(*row)).count() as u64)
    }

    async fn fetch(
        &self,
        filter: &Filter,
        order: &[SortKey],
        page: Page,
    ) -> Result<Vec<T>, StoreError> {
        let mut rows = self.matching(filter)?;
        sort_rows(&mut rows, order);
        Ok(paginate(rows, page))
    }

    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<T>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(rows
            .iter()
            .find(|row| row.field(field).as_text() == Some(value))
            .cloned())
    }
}
