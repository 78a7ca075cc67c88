//! Transaction layer (§4.4, §4.5): staged writes and snapshot-scoped reads
//! over the sub-DBs.

pub mod read;
pub mod write;

pub use read::ReadTransaction;
pub use write::{ReplaceMask, WriteTransaction};
