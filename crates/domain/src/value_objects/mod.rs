//! Value Objects - Immutable, identity-less domain primitives

mod line_id;
mod line_station_id;
mod sequence_position;
mod station_id;

pub use line_id::LineId;
pub use line_station_id::LineStationId;
pub use sequence_position::SequencePosition;
pub use station_id::StationId;
