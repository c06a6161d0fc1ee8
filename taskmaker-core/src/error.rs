//! Error types for draft normalization.

use thiserror::Error;

/// Errors that can occur while turning a draft into timestamps.
///
/// Both variants abort the build before any payload exists; the caller
/// reports them and never contacts the remote service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid start date {0:?}: expected MM-DD-YYYY")]
    InvalidDate(String),

    #[error("invalid time {0:?}: expected HH:MM AM/PM")]
    InvalidTime(String),

    #[error("unknown item kind {0:?}: expected \"task\" or \"event\"")]
    InvalidKind(String),
}

/// Result type alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
