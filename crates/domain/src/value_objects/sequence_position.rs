//! Sequence position of a station within a line

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// The place of a station in a line's traversal order
///
/// Always positive. Positions of one line need not be contiguous or
/// unique; only their relative order is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SequencePosition(u32);

impl SequencePosition {
    /// The first position of any line
    pub const FIRST: Self = Self(1);

    /// Create a validated sequence position
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for zero.
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::validation(
                "sequence_position must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    /// Create a position from a signed value as read from storage
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for values outside `1..=u32::MAX`.
    pub fn from_i64(value: i64) -> Result<Self, DomainError> {
        u32::try_from(value)
            .map_err(|_| {
                DomainError::validation(format!("sequence_position out of range: {value}"))
            })
            .and_then(Self::new)
    }

    /// Get the raw position value
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Number of positions strictly between two positions
    #[must_use]
    pub const fn positions_between(self, other: Self) -> u32 {
        let (lo, hi) = if self.0 <= other.0 {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };
        (hi - lo).saturating_sub(1)
    }
}

impl TryFrom<u32> for SequencePosition {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SequencePosition> for u32 {
    fn from(position: SequencePosition) -> Self {
        position.0
    }
}

impl From<SequencePosition> for i64 {
    fn from(position: SequencePosition) -> Self {
        Self::from(position.0)
    }
}

impl fmt::Display for SequencePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(SequencePosition::new(0).is_err());
    }

    #[test]
    fn positive_is_accepted() {
        assert_eq!(SequencePosition::new(3).unwrap().value(), 3);
    }

    #[test]
    fn from_i64_rejects_negative_and_overflow() {
        assert!(SequencePosition::from_i64(-1).is_err());
        assert!(SequencePosition::from_i64(i64::from(u32::MAX) + 1).is_err());
        assert_eq!(SequencePosition::from_i64(7).unwrap().value(), 7);
    }

    #[test]
    fn positions_between_is_symmetric() {
        let a = SequencePosition::new(1).unwrap();
        let c = SequencePosition::new(3).unwrap();
        assert_eq!(a.positions_between(c), 1);
        assert_eq!(c.positions_between(a), 1);
    }

    #[test]
    fn positions_between_adjacent_and_equal_is_zero() {
        let a = SequencePosition::new(4).unwrap();
        let b = SequencePosition::new(5).unwrap();
        assert_eq!(a.positions_between(b), 0);
        assert_eq!(a.positions_between(a), 0);
    }

    #[test]
    fn deserialize_rejects_zero() {
        assert!(serde_json::from_str::<SequencePosition>("0").is_err());
        let pos: SequencePosition = serde_json::from_str("2").unwrap();
        assert_eq!(pos.value(), 2);
    }
}
