//! Application layer - Use cases and orchestration
//!
//! Contains the topology mutation and distance query use cases along with the
//! port definitions they depend on. Infrastructure adapters implement the
//! ports; presentation layers call the services.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
