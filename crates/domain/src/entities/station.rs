//! Station entity - A physical stop shared by any number of lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::StationId};

/// A physical bus stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier
    pub id: StationId,
    /// Display name
    pub name: String,
    /// Short public code
    pub code: String,
    /// Street address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// When the station was created
    pub created_at: DateTime<Utc>,
    /// When the station was last updated
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// Create a new station
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if name or code is blank.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let code = code.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if code.is_empty() {
            return Err(DomainError::validation("code is required"));
        }

        let now = Utc::now();
        Ok(Self {
            id: StationId::new(),
            name,
            code,
            address: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the street address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
