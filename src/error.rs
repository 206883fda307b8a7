//! Error types for pawtrack
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad date, bad argument)
//! - 4: Operation failed (storage unreadable, state not saved, broken invariant)
//!
//! Unknown task ids are not errors: mutating a task
//! or log item that does not exist is a no-op.

use thiserror::Error;

/// Exit codes for the pawtrack CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for pawtrack operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid date '{0}': use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Operation failures (exit code 4)
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The in-memory change was applied but could not be persisted.
    #[error("Change kept in memory but not saved: {0}")]
    Unsaved(#[source] Box<Error>),
}

impl Error {
    /// Wrap a persistence failure that followed a successful mutation.
    pub fn unsaved(source: Error) -> Self {
        Error::Unsaved(Box::new(source))
    }

    /// Warning-class errors leave the in-memory state valid and usable.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::Unsaved(_))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidDate(_) | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::Invariant(_) | Error::Io(_) | Error::Json(_) | Error::Unsaved(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }
}

/// Result type alias for pawtrack operations
pub type Result<T> = std::result::Result<T, Error>;
