//! Core error types

use thiserror::Error;

/// Errors produced by the provider-independent core.
#[derive(Error, Debug)]
pub enum FsxError {
    #[error("cannot create a file system larger than {max_tb} TB (requested {requested_tb} TB)")]
    InvalidSize { requested_tb: u64, max_tb: u64 },
}

pub type Result<T> = std::result::Result<T, FsxError>;
