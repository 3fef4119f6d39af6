//! HTTP handlers for listing and detail routes
//!
//! Handlers are generic over the listing query type, so every entity shares
//! the same parse, count, fetch and error mapping path.

use crate::config::PaginationConfig;
use crate::core::entity::{Listing, ListingQuery};
use crate::core::error::ApiError;
use crate::core::query::ListPage;
use crate::core::service::ListingService;
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

/// State shared by the routes of one entity
pub struct ListingState<T: Listing> {
    pub service: ListingService<T>,
    pub pagination: Arc<PaginationConfig>,
}

impl<T: Listing> Clone for ListingState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            pagination: self.pagination.clone(),
        }
    }
}

/// `GET /api/{plural}`: one filtered, ordered page plus the total
pub async fn list_listings<Q: ListingQuery>(
    State(state): State<ListingState<Q::Entity>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListPage<Q::Entity>>, ApiError> {
    let resource = <Q::Entity as Listing>::PLURAL;
    let (filter, page) = Q::from_pairs(pairs).parse(&state.pagination);

    match state.service.list(&filter, page).await {
        Ok(list) => Ok(Json(list)),
        Err(source) => {
            tracing::error!(
                resource,
                backend = source.backend(),
                error = %source,
                "listing query failed"
            );
            Err(ApiError::Store { resource, source })
        }
    }
}

/// `GET /api/{plural}/{key}`: a single row by its key column
pub async fn get_listing<T: Listing>(
    State(state): State<ListingState<T>>,
    Path(key): Path<String>,
) -> Result<Json<T>, ApiError> {
    match state.service.get(&key).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(ApiError::NotFound {
            entity: T::DISPLAY_NAME,
        }),
        Err(source) => {
            tracing::error!(
                resource = T::PLURAL,
                backend = source.backend(),
                error = %source,
                key = %key,
                "detail lookup failed"
            );
            Err(ApiError::Store {
                resource: T::PLURAL,
                source,
            })
        }
    }
}
