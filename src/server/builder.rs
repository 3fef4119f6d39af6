//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{EntityRegistry, ListingDescriptor};
use super::handlers::ListingState;
use super::router::build_router;
use crate::config::{AppConfig, PaginationConfig};
use crate::core::entity::ListingQuery;
use crate::core::service::ListingService;
use crate::entities::{OpportunityQuery, OrganizationQuery, SpeakerQuery};
use crate::storage::StoreConnection;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the directory HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(AppConfig::default())
///     .register::<SpeakerQuery>(ListingService::from_store(InMemoryStore::new()))
///     .build();
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    pagination: Arc<PaginationConfig>,
    registry: EntityRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a builder with no entities registered
    pub fn new(config: AppConfig) -> Self {
        let pagination = Arc::new(config.pagination.clone());
        Self {
            config,
            pagination,
            registry: EntityRegistry::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Connect the configured store and register organizations, speakers
    /// and opportunities against it
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let connection = StoreConnection::connect(&config.store).await?;
        tracing::info!(backend = connection.backend(), "store connected");

        let tables = config.tables.clone();
        Ok(Self::new(config)
            .register::<OrganizationQuery>(connection.service(&tables.organizations)?)
            .register::<SpeakerQuery>(connection.service(&tables.speakers)?)
            .register::<OpportunityQuery>(connection.service(&tables.opportunities)?))
    }

    /// Register the listing and detail routes of one entity
    pub fn register<Q: ListingQuery>(mut self, service: ListingService<Q::Entity>) -> Self {
        let state = ListingState {
            service,
            pagination: self.pagination.clone(),
        };
        self.registry
            .register(Box::new(ListingDescriptor::<Q>::new(state)));
        self
    }

    /// Add routes that are not listings
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.registry.entity_types()
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.custom_routes
            .into_iter()
            .fold(build_router(&self.registry, &self.config.server), |app, custom| {
                app.merge(custom)
            })
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to `server.bind`
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
