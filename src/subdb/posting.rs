//! `PostingDB` and `PositionDB` (§4.3): term → document ids, and
//! term → per-document positions.

use crate::codec::{self, PositionRecord};
use crate::error::Result;
use crate::kv::{Snapshot, WriteHandle};

const POSTING: &str = "posting";
const POSITION: &str = "position";

/// term → sorted, unique document ids that contain it.
pub struct PostingDb;

impl PostingDb {
    /// Ids for `term`, ascending, empty if the term is absent.
    pub fn get(snap: &impl Snapshot, term: &[u8]) -> Result<Vec<u64>> {
        match snap.get(POSTING, term) {
            Some(bytes) => codec::decode_posting_list(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrites `term`'s posting list, or removes the entry if `ids` is empty.
    pub fn put(handle: &mut impl WriteHandle, term: &[u8], ids: &[u64]) {
        if ids.is_empty() {
            handle.del(POSTING, term);
        } else {
            handle.put(POSTING, term, codec::encode_posting_list(ids));
        }
    }

    pub fn contains_term(snap: &impl Snapshot, term: &[u8]) -> bool {
        snap.contains(POSTING, term)
    }
}

/// term → per-document sorted, unique positions.
pub struct PositionDb;

impl PositionDb {
    pub fn get(snap: &impl Snapshot, term: &[u8]) -> Result<Vec<PositionRecord>> {
        match snap.get(POSITION, term) {
            Some(bytes) => codec::decode_position_list(&bytes),
            None => Ok(Vec::new()),
        }
    }

    pub fn put(handle: &mut impl WriteHandle, term: &[u8], records: &[PositionRecord]) {
        if records.is_empty() {
            handle.del(POSITION, term);
        } else {
            handle.put(POSITION, term, codec::encode_position_list(records));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::btree_store::BTreeKv;
    use crate::kv::KvStore;

    #[test]
    fn posting_round_trips_through_a_transaction() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        PostingDb::put(&mut w, b"fox", &[1, 3, 7]);
        assert_eq!(PostingDb::get(&w, b"fox").unwrap(), vec![1, 3, 7]);
        w.commit().unwrap();

        let snap = kv.begin_read();
        assert_eq!(PostingDb::get(&snap, b"fox").unwrap(), vec![1, 3, 7]);
        assert_eq!(PostingDb::get(&snap, b"missing").unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn posting_put_empty_deletes_entry() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        PostingDb::put(&mut w, b"fox", &[1]);
        PostingDb::put(&mut w, b"fox", &[]);
        assert!(!PostingDb::contains_term(&w, b"fox"));
        w.commit().unwrap();
        assert!(!PostingDb::contains_term(&kv.begin_read(), b"fox"));
    }

    #[test]
    fn position_round_trips() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        let records = vec![
            PositionRecord { id: 1, positions: vec![0, 5] },
            PositionRecord { id: 2, positions: vec![3] },
        ];
        PositionDb::put(&mut w, b"fox", &records);
        assert_eq!(PositionDb::get(&w, b"fox").unwrap(), records);
        w.commit().unwrap();
        assert_eq!(PositionDb::get(&kv.begin_read(), b"fox").unwrap(), records);
    }
}
