//! Low-level storage helpers shared by the KV backend.

pub mod checksum;

pub use checksum::{checksum, ChecksumError};
