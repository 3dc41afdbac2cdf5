//! Planner error types

use crate::ghost::GhostError;
use rap_model::{AllocationId, WeekWindow};
use rap_store::StoreError;
use thiserror::Error;

/// Errors surfaced by planner operations
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Store call failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Ghost row was driven through an invalid sequence
    #[error("ghost row error: {0}")]
    Ghost(#[from] GhostError),

    /// Operation addressed an allocation the grid does not hold
    #[error("unknown allocation row: {0}")]
    UnknownRow(AllocationId),

    /// Cell operation arrived with no cell focused
    #[error("no cell is focused")]
    NoFocusedCell,

    /// Week window resolves to no calendar dates
    #[error("week {0} has no calendar dates")]
    InvalidWindow(WeekWindow),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl PlannerError {
    /// Whether retrying the same operation could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}

/// Errors raised while loading planner configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("unreadable config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid-field error
    #[inline]
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_follows_store_classification() {
        let err = PlannerError::Store(StoreError::Unavailable("timeout".to_string()));
        assert!(err.is_transient());

        let err = PlannerError::NoFocusedCell;
        assert!(!err.is_transient());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::invalid("typeahead_limit", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid typeahead_limit: must be at least 1"
        );
    }
}
