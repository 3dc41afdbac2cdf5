//! Store error taxonomy
//!
//! Every collaborator call can fail; the planner catches these, logs them,
//! and surfaces a non-blocking notice instead of rolling back optimistic
//! state.

/// Errors from the collaborator seams
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("allocation", "project", ...)
        entity: &'static str,
        /// Display form of the missing id
        id: String,
    },

    /// Backend temporarily unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the operation
    #[error("rejected: {0}")]
    Rejected(String),

    /// Change-notification feed closed
    #[error("change feed closed")]
    ChannelClosed,
}

impl StoreError {
    /// Shorthand for a missing record
    #[inline]
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether retrying later could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::ChannelClosed)
    }
}
