//! `MTimeDB` (§4.3.5): mtime → posting list of ids sharing that mtime.
//! A multimap collapsed into the same sorted-unique-ids list form used by
//! `PostingDB`, keyed by an order-preserving encoding of the mtime itself.

use crate::codec;
use crate::error::Result;
use crate::kv::{Snapshot, WriteHandle};

const SUB: &str = "mtime";

pub struct MTimeDb;

impl MTimeDb {
    pub fn get(snap: &impl Snapshot, mtime: i64) -> Result<Vec<u64>> {
        match snap.get(SUB, &codec::sortable_i64_key(mtime)) {
            Some(bytes) => codec::decode_posting_list(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrites the id list for `mtime`, or removes the entry if `ids` is empty.
    pub fn put(handle: &mut impl WriteHandle, mtime: i64, ids: &[u64]) {
        let key = codec::sortable_i64_key(mtime);
        if ids.is_empty() {
            handle.del(SUB, &key);
        } else {
            handle.put(SUB, &key, codec::encode_posting_list(ids));
        }
    }

    /// Adds `id` to `mtime`'s list, keeping it sorted and unique.
    pub fn add_id(handle: &mut impl WriteHandle, mtime: i64, id: u64) -> Result<()> {
        let mut ids = Self::get(&*handle, mtime)?;
        if let Err(at) = ids.binary_search(&id) {
            ids.insert(at, id);
        }
        Self::put(handle, mtime, &ids);
        Ok(())
    }

    /// Removes `id` from `mtime`'s list, deleting the entry if it becomes empty.
    pub fn remove_id(handle: &mut impl WriteHandle, mtime: i64, id: u64) -> Result<()> {
        let mut ids = Self::get(&*handle, mtime)?;
        if let Ok(at) = ids.binary_search(&id) {
            ids.remove(at);
        }
        Self::put(handle, mtime, &ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::btree_store::BTreeKv;
    use crate::kv::KvStore;

    #[test]
    fn add_and_remove_maintain_sorted_unique_lists() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        MTimeDb::add_id(&mut w, 100, 5).unwrap();
        MTimeDb::add_id(&mut w, 100, 1).unwrap();
        MTimeDb::add_id(&mut w, 100, 5).unwrap();
        assert_eq!(MTimeDb::get(&w, 100).unwrap(), vec![1, 5]);

        MTimeDb::remove_id(&mut w, 100, 1).unwrap();
        assert_eq!(MTimeDb::get(&w, 100).unwrap(), vec![5]);

        MTimeDb::remove_id(&mut w, 100, 5).unwrap();
        assert_eq!(MTimeDb::get(&w, 100).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn distinct_mtimes_stay_independent() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        MTimeDb::add_id(&mut w, -50, 1).unwrap();
        MTimeDb::add_id(&mut w, 50, 2).unwrap();
        assert_eq!(MTimeDb::get(&w, -50).unwrap(), vec![1]);
        assert_eq!(MTimeDb::get(&w, 50).unwrap(), vec![2]);
    }
}
