//! `DocumentDataDB` (§4.3.6): id → opaque extractor payload.

use crate::codec;
use crate::error::Result;
use crate::kv::{Snapshot, WriteHandle};

const SUB: &str = "doc_data";

pub struct DocumentDataDb;

impl DocumentDataDb {
    pub fn get(snap: &impl Snapshot, id: u64) -> Result<Option<Vec<u8>>> {
        Ok(snap.get(SUB, &codec::id_key(id)))
    }

    /// Stores `data` for `id`, or removes the entry if `data` is empty.
    pub fn put(handle: &mut impl WriteHandle, id: u64, data: &[u8]) {
        let key = codec::id_key(id);
        if data.is_empty() {
            handle.del(SUB, &key);
        } else {
            handle.put(SUB, &key, data.to_vec());
        }
    }

    pub fn remove(handle: &mut impl WriteHandle, id: u64) {
        handle.del(SUB, &codec::id_key(id));
    }
}
