//! Domain entities - Objects with identity and lifecycle

mod line;
mod line_station;
mod station;

pub use line::{Line, LineAggregates, LineStatus};
pub use line_station::{LineStationLink, LinkPlacement, validate_distance};
pub use station::Station;
