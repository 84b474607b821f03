//! AWS provider error types
//!
//! The taxonomy keeps validation, transient-remote, and permanent-remote
//! failures apart so callers can decide retry vs abort instead of getting
//! one flattened string.

use fsxflow_core::poll::PollError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("file system not found: {0}")]
    NotFound(String),

    #[error("throttled by the provider: {0}")]
    Throttled(String),

    #[error("provider API error: {0}")]
    Api(String),

    #[error("parameter store value missing or empty: {0}")]
    Parameter(String),

    #[error("provider response missing {0}")]
    MissingAttribute(&'static str),

    #[error("polling timed out: no terminal state after {waited_secs}s")]
    PollTimeout { waited_secs: u64 },

    #[error("polling aborted: {failures} consecutive status probes failed, last error: {last}")]
    ProbeFailed { failures: u32, last: Box<AwsError> },

    #[error(transparent)]
    Core(#[from] fsxflow_core::FsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PollError<AwsError>> for AwsError {
    fn from(err: PollError<AwsError>) -> Self {
        match err {
            PollError::Timeout { waited_secs } => AwsError::PollTimeout { waited_secs },
            PollError::ProbeFailed { failures, last } => AwsError::ProbeFailed {
                failures,
                last: Box::new(last),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
