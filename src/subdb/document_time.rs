//! `DocumentTimeDB` (§4.3.4): id → `TimeInfo`. Exists iff the document is
//! indexed.

use crate::codec::{self, TimeInfo};
use crate::error::Result;
use crate::kv::{Snapshot, WriteHandle};

const SUB: &str = "doc_time";

pub struct DocumentTimeDb;

impl DocumentTimeDb {
    pub fn get(snap: &impl Snapshot, id: u64) -> Result<Option<TimeInfo>> {
        match snap.get(SUB, &codec::id_key(id)) {
            Some(bytes) => Ok(Some(codec::decode_time_info(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(handle: &mut impl WriteHandle, id: u64, info: TimeInfo) {
        handle.put(SUB, &codec::id_key(id), codec::encode_time_info(&info));
    }

    pub fn remove(handle: &mut impl WriteHandle, id: u64) {
        handle.del(SUB, &codec::id_key(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::btree_store::BTreeKv;
    use crate::kv::KvStore;

    #[test]
    fn time_info_round_trips() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        let info = TimeInfo { mtime: 10, ctime: 5 };
        DocumentTimeDb::put(&mut w, 1, info);
        assert_eq!(DocumentTimeDb::get(&w, 1).unwrap(), Some(info));
        w.commit().unwrap();
        assert_eq!(DocumentTimeDb::get(&kv.begin_read(), 1).unwrap(), Some(info));
    }

    #[test]
    fn remove_clears_the_entry() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        DocumentTimeDb::put(&mut w, 1, TimeInfo { mtime: 1, ctime: 1 });
        DocumentTimeDb::remove(&mut w, 1);
        assert_eq!(DocumentTimeDb::get(&w, 1).unwrap(), None);
    }
}
