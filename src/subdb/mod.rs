//! Typed sub-DB wrappers over the raw [`crate::kv`] contract (§4.3).
//!
//! Each wrapper owns one sub-map name and knows how to encode/decode its own
//! keys and values via [`crate::codec`]. They carry no state of their own —
//! every method takes the `Snapshot`/`WriteHandle` it operates on, so the
//! same wrapper works unchanged from a `ReadTransaction` or a
//! `WriteTransaction`.

pub mod document_data;
pub mod document_id;
pub mod document_terms;
pub mod document_time;
pub mod document_url;
pub mod mtime;
pub mod posting;

pub use document_data::DocumentDataDb;
pub use document_id::DocumentIdDb;
pub use document_terms::{DocumentTermsDb, TermKind};
pub use document_time::DocumentTimeDb;
pub use document_url::DocumentUrlDb;
pub use mtime::MTimeDb;
pub use posting::{PositionDb, PostingDb};

/// Sub-map holding the version stamp and other singleton metadata.
pub const META: &str = "meta";
/// Key under [`META`] holding the encoded [`crate::codec::VersionStamp`].
pub const META_VERSION_KEY: &[u8] = b"version";
