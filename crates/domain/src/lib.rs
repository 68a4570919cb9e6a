//! Domain layer for Busline
//!
//! Contains the line topology model (lines, stations, and the ordered links
//! between them), the pure distance computations over a line's sequence, and
//! domain errors. This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod route;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use route::{
    CumulativeDistance, RouteProfile, StationPairDistance, cumulative_distances, traversal_order,
};
pub use value_objects::*;
