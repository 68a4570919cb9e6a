//! Busline HTTP presentation layer
//!
//! JSON API over the line topology and distance services.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{RequestId, ValidatedJson, ValidationError};
pub use response::ApiResponse;
pub use routes::create_router;
pub use state::AppState;
