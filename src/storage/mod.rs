//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod postgrest;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
pub use postgrest::PostgrestStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::core::entity::Listing;
use crate::core::service::ListingService;
use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::time::Duration;

/// A connected backend, shared by the services of every entity
pub enum StoreConnection {
    Memory {
        seed_dir: Option<PathBuf>,
    },
    Postgrest {
        client: reqwest::Client,
        url: String,
        api_key: Option<String>,
        schema: Option<String>,
    },
    #[cfg(feature = "postgres")]
    Postgres(sqlx::PgPool),
}

impl StoreConnection {
    /// Open the backend selected in the configuration
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            StoreBackend::Memory => Ok(Self::Memory {
                seed_dir: config.seed_dir.clone(),
            }),
            StoreBackend::Postgrest => {
                let url = config
                    .url
                    .clone()
                    .ok_or_else(|| anyhow!("store.url is required for the postgrest backend"))?;
                let api_key = config.api_key();
                if api_key.is_none() {
                    tracing::warn!("no API key configured, requests will be anonymous");
                }
                Ok(Self::Postgrest {
                    client: postgrest::build_client(Duration::from_secs(config.timeout_secs))?,
                    url,
                    api_key,
                    schema: config.schema.clone(),
                })
            }
            #[cfg(feature = "postgres")]
            StoreBackend::Postgres => {
                let url = config
                    .database_url()
                    .ok_or_else(|| anyhow!("no database URL configured"))?;
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .acquire_timeout(Duration::from_secs(config.timeout_secs))
                    .connect(&url)
                    .await?;
                Ok(Self::Postgres(pool))
            }
            #[cfg(not(feature = "postgres"))]
            StoreBackend::Postgres => Err(anyhow!(
                "the postgres backend requires building with the `postgres` feature"
            )),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Postgrest { .. } => "postgrest",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }

    /// Build the listing service for one entity stored in `table`
    ///
    /// The memory backend loads `<seed_dir>/<plural>.json` when present.
    pub fn service<T: Listing>(&self, table: &str) -> Result<ListingService<T>> {
        match self {
            Self::Memory { seed_dir } => {
                let seed = seed_dir
                    .as_ref()
                    .map(|dir| dir.join(format!("{}.json", T::PLURAL)))
                    .filter(|path| path.is_file());
                let store = match seed {
                    Some(path) => InMemoryStore::<T>::from_json_file(path)?,
                    None => {
                        tracing::info!(entity = T::SINGULAR, "no seed file, starting empty");
                        InMemoryStore::new()
                    }
                };
                Ok(ListingService::from_store(store))
            }
            Self::Postgrest {
                client,
                url,
                api_key,
                schema,
            } => Ok(ListingService::from_store(
                PostgrestStore::<T>::new(client.clone(), url, table)
                    .with_api_key(api_key.clone())
                    .with_schema(schema.clone()),
            )),
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => Ok(ListingService::from_store(PostgresStore::<T>::new(
                pool.clone(),
                table,
            ))),
        }
    }
}
