//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod database_health_port;
mod line_port;
mod line_station_port;
mod station_port;

#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use line_port::MockLinePort;
pub use line_port::LinePort;
#[cfg(test)]
pub use line_station_port::MockLineStationPort;
pub use line_station_port::LineStationPort;
#[cfg(test)]
pub use station_port::MockStationPort;
pub use station_port::StationPort;
