//! Entity registry for managing listing descriptors and generating their routes

use super::handlers::{ListingState, get_listing, list_listings};
use crate::core::entity::{Listing, ListingQuery};
use axum::Router;
use axum::routing::get;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Trait that describes how to build routes for an entity
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "speaker")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "speakers")
    fn plural(&self) -> &str;

    /// Build the read routes for this entity:
    /// - GET /api/{plural}
    /// - GET /api/{plural}/{key}
    fn build_routes(&self) -> Router;
}

/// Descriptor for an entity served through a listing query type `Q`
pub struct ListingDescriptor<Q: ListingQuery> {
    state: ListingState<Q::Entity>,
    _query: PhantomData<fn() -> Q>,
}

impl<Q: ListingQuery> ListingDescriptor<Q> {
    pub fn new(state: ListingState<Q::Entity>) -> Self {
        Self {
            state,
            _query: PhantomData,
        }
    }
}

impl<Q: ListingQuery> EntityDescriptor for ListingDescriptor<Q> {
    fn entity_type(&self) -> &str {
        <Q::Entity as Listing>::SINGULAR
    }

    fn plural(&self) -> &str {
        <Q::Entity as Listing>::PLURAL
    }

    fn build_routes(&self) -> Router {
        let collection = format!("/api/{}", self.plural());
        let detail = format!("{}/{{{}}}", collection, <Q::Entity as Listing>::KEY_FIELD);

        Router::new()
            .route(&collection, get(list_listings::<Q>))
            .route(&detail, get(get_listing::<Q::Entity>))
            .with_state(self.state.clone())
    }
}

/// Registry for all listing entities in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register an entity descriptor, replacing any previous one of the same type
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Get all registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
