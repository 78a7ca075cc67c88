//! A transactional on-disk inverted index for local file-content search.
//!
//! This crate is the storage core of a desktop search engine: a durable,
//! single-writer/many-reader key/value backend (`kv`), typed sub-DB wrappers
//! over it (`subdb`), a binary record codec (`codec`), and the transaction
//! and query-iterator layers built on top (`txn`, `iter`). Everything
//! upstream of a filled-in `Document` — crawling the filesystem, extracting
//! terms, scheduling re-indexing, parsing a query string — lives outside
//! this crate; see `Document` and `iter::PostingIterator` for the seams.

pub mod codec;
pub mod config;
pub mod database;
pub mod document;
pub mod iter;
pub mod kv;
pub mod storage;
pub mod subdb;
pub mod txn;

mod error;

pub use config::{Config, OpenMode};
pub use database::Database;
pub use document::{Document, TermMap, TermPositions};
pub use error::{Error, Result};
pub use iter::{AndPostingIterator, BoxedIterator, OrPostingIterator, PhraseIterator, PostingIterator, VectorPostingIterator};
pub use subdb::TermKind;
pub use txn::{ReadTransaction, ReplaceMask, WriteTransaction};
