//! Pagination, ordering and result pages

use crate::config::PaginationConfig;
use crate::core::entity::Listing;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;

/// Offset-based page bounds
///
/// Both bounds are applied after filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Build page bounds from raw query-string values
    ///
    /// Missing or unparsable values fall back to the configured defaults
    /// (`limit` 12, `offset` 0). `limit` is capped at `max_limit`.
    ///
    /// # Example
    /// ```
    /// use covetalks::config::PaginationConfig;
    /// use covetalks::core::query::Page;
    ///
    /// let page = Page::from_params(Some("abc"), Some("24"), &PaginationConfig::default());
    /// assert_eq!(page, Page::new(12, 24));
    /// ```
    pub fn from_params(
        limit: Option<&str>,
        offset: Option<&str>,
        config: &PaginationConfig,
    ) -> Self {
        let limit = parse_count(limit)
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        let offset = parse_count(offset).unwrap_or(0);
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::from_params(None, None, &PaginationConfig::default())
    }
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// Sort direction for a [`SortKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One column of a fixed per-entity ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub direction: SortDirection,
    /// Rows with a null value sort after all others
    pub nulls_last: bool,
}

impl SortKey {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
            nulls_last: true,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
            nulls_last: true,
        }
    }

    /// Compare two rows on this key
    pub fn compare<T: Listing>(&self, a: &T, b: &T) -> Ordering {
        let (a, b) = (a.field(self.field), b.field(self.field));
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) if self.nulls_last => Ordering::Greater,
            (false, true) if self.nulls_last => Ordering::Less,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => match self.direction {
                SortDirection::Asc => a.compare(&b),
                SortDirection::Desc => b.compare(&a),
            },
        }
    }
}

/// Sort rows by a sequence of keys, earlier keys taking precedence
pub fn sort_rows<T: Listing>(rows: &mut [T], order: &[SortKey]) {
    rows.sort_by(|a, b| {
        order
            .iter()
            .map(|key| key.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// Slice a sorted vector to the requested page
///
/// An offset past the end yields an empty page.
pub fn paginate<T>(rows: Vec<T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(offset).take(limit).collect()
}

/// A page of listing rows plus the size of the whole filtered set
///
/// Serializes as `{ "<plural>": [...], "total": n, "limit": n, "offset": n }`.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Number of rows matching the filter, ignoring pagination
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

impl<T: Listing> Serialize for ListPage<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(T::PLURAL, &self.items)?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("offset", &self.offset)?;
        map.end()
    }
}
