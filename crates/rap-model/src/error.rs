//! Model-level errors

/// Errors from parsing vocabulary values
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown project status name
    #[error("unknown project status: {0}")]
    UnknownStatus(String),

    /// Unknown workday name
    #[error("unknown workday: {0}")]
    UnknownWorkday(String),

    /// Unknown membership role name
    #[error("unknown member role: {0}")]
    UnknownRole(String),
}
