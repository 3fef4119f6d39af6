//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore<T>`, which compiles filters into parameterized SQL
//! with `sqlx::QueryBuilder` and reads rows back as `to_jsonb(t)` so every
//! listing type decodes through its serde representation.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! covetalks-directory = { version = "0.1", features = ["postgres"] }
//! ```

use crate::config::TableNames;
use crate::core::entity::Listing;
use crate::core::error::StoreError;
use crate::core::predicate::{Filter, Predicate, escape_like};
use crate::core::query::{Page, SortKey};
use crate::core::store::ListingStore;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const BACKEND: &str = "postgres";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Create the listing tables and their indexes (idempotent).
///
/// Useful for local development and tests; production tables are owned by
/// the hosted database.
pub async fn ensure_schema(pool: &PgPool, tables: &TableNames) -> Result<(), StoreError> {
    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                organization_type TEXT,
                industry TEXT,
                location TEXT,
                city TEXT,
                state TEXT,
                country TEXT,
                website TEXT,
                logo_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            tables.organizations
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                title TEXT,
                bio TEXT,
                specialties TEXT[] NOT NULL DEFAULT '{{}}',
                location TEXT,
                rating DOUBLE PRECISION,
                review_count BIGINT NOT NULL DEFAULT 0,
                profile_image_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            tables.speakers
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                organization_name TEXT,
                topics TEXT[] NOT NULL DEFAULT '{{}}',
                location TEXT,
                event_format TEXT NOT NULL,
                compensation DOUBLE PRECISION,
                event_date DATE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            tables.opportunities
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_specialties ON {0} USING GIN (specialties)",
            tables.speakers
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_topics ON {0} USING GIN (topics)",
            tables.opportunities
        ),
    ];

    for statement in &statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(query_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PostgresStore<T>
// ---------------------------------------------------------------------------

/// Listing store backed by one PostgreSQL table.
#[derive(Debug)]
pub struct PostgresStore<T> {
    pool: PgPool,
    table: String,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Clone for PostgresStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> PostgresStore<T> {
    /// Create a store reading `table` through the given pool.
    ///
    /// `table` must be a plain identifier; configuration validates this.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            _marker: std::marker::PhantomData,
        }
    }
}

fn query_error(e: sqlx::Error) -> StoreError {
    StoreError::Query {
        backend: BACKEND,
        message: e.to_string(),
    }
}

/// Append `WHERE TRUE AND ...` for every predicate
///
/// Columns come from entity definitions, never from the request; every
/// request value is bound.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    qb.push(" WHERE TRUE");
    for predicate in filter.predicates() {
        match predicate {
            Predicate::Equals { field, value } => {
                qb.push(format!(" AND t.{}::text = ", field))
                    .push_bind(value.clone());
            }
            Predicate::ContainsAny { fields, needle } => {
                let pattern = format!("%{}%", escape_like(needle));
                qb.push(" AND (");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(format!("t.{} ILIKE ", field))
                        .push_bind(pattern.clone())
                        .push(" ESCAPE '\\'");
                }
                qb.push(")");
            }
            Predicate::Overlaps { field, tags } => {
                qb.push(format!(" AND t.{} && ", field))
                    .push_bind(tags.clone());
            }
            Predicate::AtLeast { field, bound } => {
                qb.push(format!(" AND t.{} >= ", field)).push_bind(*bound);
            }
        }
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, order: &[SortKey]) {
    for (i, key) in order.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(format!(
            "t.{} {} {}",
            key.field,
            key.direction.as_str().to_uppercase(),
            if key.nulls_last {
                "NULLS LAST"
            } else {
                "NULLS FIRST"
            }
        ));
    }
}

fn decode<T: Listing>(value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Decode {
        backend: BACKEND,
        message: e.to_string(),
    })
}

#[async_trait]
impl<T: Listing> ListingStore<T> for PostgresStore<T> {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {} t", self.table));
        push_filter(&mut qb, filter);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(total.max(0) as u64)
    }

    async fn fetch(
        &self,
        filter: &Filter,
        order: &[SortKey],
        page: Page,
    ) -> Result<Vec<T>, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT to_jsonb(t) FROM {} t", self.table));
        push_filter(&mut qb, filter);
        push_order(&mut qb, order);
        qb.push(" LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset as i64);

        let rows: Vec<serde_json::Value> = qb
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<T>, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT to_jsonb(t) FROM {} t", self.table));
        qb.push(format!(" WHERE t.{}::text = ", field))
            .push_bind(value.to_string())
            .push(" LIMIT 1");

        let row: Option<serde_json::Value> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.map(decode).transpose()
    }
}
