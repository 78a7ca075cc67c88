//! `DocumentIdDB` (§4.3, "phase-one queue / failed set"): ids awaiting
//! content extraction, and ids whose extraction has permanently failed. The
//! two sets are disjoint — [`DocumentIdDb::mark_failed`] enforces that by
//! removing from the phase-one set as it adds to the failed set.
//!
//! Each set is a collection of individual presence keys (id → empty value)
//! rather than a single encoded list: simpler to maintain incrementally, and
//! `range` already gives ascending iteration for `fetch_phase_one_ids`.

use crate::codec;
use crate::kv::{Snapshot, WriteHandle};

const PHASE_ONE: &str = "phase_one";
const FAILED: &str = "failed";

pub struct DocumentIdDb;

impl DocumentIdDb {
    /// Queues `id` for content extraction.
    pub fn add_phase_one(handle: &mut impl WriteHandle, id: u64) {
        handle.put(PHASE_ONE, &codec::id_key(id), Vec::new());
    }

    /// Dequeues `id`, whether or not it was present.
    pub fn remove_phase_one(handle: &mut impl WriteHandle, id: u64) {
        handle.del(PHASE_ONE, &codec::id_key(id));
    }

    pub fn contains_phase_one(snap: &impl Snapshot, id: u64) -> bool {
        snap.contains(PHASE_ONE, &codec::id_key(id))
    }

    pub fn phase_one_size(snap: &impl Snapshot) -> usize {
        snap.range(PHASE_ONE, &[]).len()
    }

    /// Up to `limit` queued ids, ascending.
    pub fn fetch_phase_one_ids(snap: &impl Snapshot, limit: usize) -> Vec<u64> {
        snap.range(PHASE_ONE, &[])
            .into_iter()
            .take(limit)
            .filter_map(|(k, _)| codec::decode_id_key(&k).ok())
            .collect()
    }

    /// Marks `id` as permanently failed: removed from the phase-one queue,
    /// added to the failed set. The two sets never overlap.
    pub fn mark_failed(handle: &mut impl WriteHandle, id: u64) {
        Self::remove_phase_one(handle, id);
        handle.put(FAILED, &codec::id_key(id), Vec::new());
    }

    pub fn has_failed(snap: &impl Snapshot, id: u64) -> bool {
        snap.contains(FAILED, &codec::id_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::btree_store::BTreeKv;
    use crate::kv::KvStore;

    #[test]
    fn phase_one_queue_tracks_ids_in_order() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        DocumentIdDb::add_phase_one(&mut w, 3);
        DocumentIdDb::add_phase_one(&mut w, 1);
        DocumentIdDb::add_phase_one(&mut w, 2);
        assert_eq!(DocumentIdDb::phase_one_size(&w), 3);
        assert_eq!(DocumentIdDb::fetch_phase_one_ids(&w, 2), vec![1, 2]);
    }

    #[test]
    fn mark_failed_is_disjoint_from_phase_one() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        DocumentIdDb::add_phase_one(&mut w, 7);
        DocumentIdDb::mark_failed(&mut w, 7);
        assert!(!DocumentIdDb::contains_phase_one(&w, 7));
        assert!(DocumentIdDb::has_failed(&w, 7));
    }

    #[test]
    fn remove_phase_one_is_a_no_op_when_absent() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        DocumentIdDb::remove_phase_one(&mut w, 99);
        assert!(!DocumentIdDb::contains_phase_one(&w, 99));
    }
}
