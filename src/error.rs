//! Error types for the indexing storage engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every error kind the core surfaces to callers, per the error handling design.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The database path could not be opened or created.
    #[error("database path unusable: {0}")]
    PathUnusable(String),

    /// The on-disk version stamp is incompatible with this build.
    #[error("version mismatch: on-disk {on_disk_major}.{on_disk_minor}, expected major {expected_major}")]
    VersionMismatch {
        on_disk_major: u32,
        on_disk_minor: u32,
        expected_major: u32,
    },

    /// A decoder detected truncation or non-monotonic data.
    #[error("corruption: {0}")]
    Corruption(String),

    /// A second writer attempted to open a write transaction.
    #[error("database is busy: a write transaction is already open")]
    Busy,

    /// A precondition was violated by the caller (fatal programmer error).
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// An operation named in a `replace_document` mask is not supported.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Corruption(err.to_string())
    }
}
