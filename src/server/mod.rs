//! Server module for building the directory HTTP API
//!
//! The `ServerBuilder` registers, for each listing entity:
//! - `GET /api/{plural}`: filtered, paginated listing with a total
//! - `GET /api/{plural}/{key}`: detail lookup by id or slug
//!
//! plus `/health` and `/healthz`.

pub mod builder;
pub mod entity_registry;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry, ListingDescriptor};
pub use handlers::ListingState;
