//! HTTP API handlers for ctrack-board

pub mod activity;
pub mod health;
pub mod resources;
pub mod structure;
pub mod user;

pub use activity::list_activity;
pub use health::health_routes;
pub use resources::set_status;
pub use structure::{create_node, delete_node, get_structure, rename_node, reorder_node};
pub use user::{user_middleware, CurrentUser, USER_HEADER};

use crate::error::StructureError;

/// Map an axum extractor rejection (bad JSON, path or query) to a 400
pub(crate) fn rejected(rejection: impl std::fmt::Display) -> StructureError {
    StructureError::InvalidInput(rejection.to_string())
}
