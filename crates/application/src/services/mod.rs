//! Application services - Use case implementations

mod catalog_service;
mod distance_service;
mod line_locks;
mod topology_service;

pub use catalog_service::{LineCatalogService, NewLine, NewStation};
pub use distance_service::{CumulativeStop, DistanceService, PairDistance, StationRef};
pub use line_locks::LineLocks;
pub use topology_service::{AssignStation, LineStop, ReconciliationReport, TopologyService};
