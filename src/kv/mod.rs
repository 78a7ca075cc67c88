//! The transactional sorted key/value backend contract (§4.2).
//!
//! A [`KvStore`] exposes a fixed set of named sub-maps, each ordered by
//! unsigned lexicographic key bytes. Reads are snapshot-isolated; writes are
//! serialised behind a single exclusive handle and are all-or-nothing across
//! every sub-map touched since `begin_write`.
//!
//! This module only defines the contract. [`btree_store::BTreeKv`] is the one
//! concrete implementation this crate ships — an in-process store backed by
//! a `BTreeMap` per sub-map with an append-only durability log, standing in
//! for "an embedded B-tree/LMDB-like store" without pulling in a full
//! multi-level LSM engine (see `DESIGN.md`).

pub mod btree_store;

use crate::error::Result;

/// A read-only, point-in-time view of every sub-map as of `begin_read`.
pub trait Snapshot {
    fn get(&self, sub: &str, key: &[u8]) -> Option<Vec<u8>>;

    /// All `(key, value)` pairs in `sub` whose key starts with `prefix`, in
    /// ascending key order. An empty `prefix` scans the whole sub-map.
    fn range(&self, sub: &str, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;

    fn contains(&self, sub: &str, key: &[u8]) -> bool {
        self.get(sub, key).is_some()
    }
}

/// The single exclusive handle through which a writer stages mutations.
/// `get`/`range` (inherited from [`Snapshot`]) observe the writer's own
/// uncommitted puts/dels layered over the last committed state
/// (read-your-own-writes), so operations that read a value before
/// overwriting or deleting it behave correctly within one transaction.
pub trait WriteHandle: Snapshot {
    fn put(&mut self, sub: &str, key: &[u8], value: Vec<u8>);
    fn del(&mut self, sub: &str, key: &[u8]);

    /// Applies every staged mutation atomically and durably. Consumes the
    /// handle; dropping it without calling `commit` discards all staged
    /// mutations instead.
    fn commit(self) -> Result<()>;
}

pub trait KvStore {
    type Snapshot: Snapshot;
    type WriteHandle: WriteHandle;

    fn begin_read(&self) -> Self::Snapshot;

    /// Returns `Error::Busy` if another write handle is already open.
    fn begin_write(&self) -> Result<Self::WriteHandle>;
}
