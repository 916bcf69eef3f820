//! Error types for the fleet registry core.

use std::{error::Error, fmt};

use crate::domain::ShipId;

/// Error type for fleet registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    /// The caller supplied a missing, malformed, or out-of-range value.
    InvalidInput(String),
    /// No ship is stored under the given identifier.
    NotFound(ShipId),
    /// A failure reported by the storage layer, passed through as text.
    Storage(String),
}

impl FleetError {
    /// Build an [`FleetError::InvalidInput`] from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Build a [`FleetError::Storage`] from any displayable storage failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for FleetError {}

/// Convenience result type for the fleet registry core.
pub type Result<T> = std::result::Result<T, FleetError>;
