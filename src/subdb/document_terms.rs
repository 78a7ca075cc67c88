//! `DocumentTermsDB` (§4.3): one sub-map per term kind, each mapping a
//! document id to the sorted, unique set of terms it contributed there.

use crate::codec;
use crate::error::Result;
use crate::kv::{Snapshot, WriteHandle};

/// The three term kinds a document contributes to, each backed by its own
/// sub-map so a query against one kind never scans the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Content,
    Xattr,
    Filename,
}

impl TermKind {
    fn sub_map(self) -> &'static str {
        match self {
            TermKind::Content => "doc_terms_content",
            TermKind::Xattr => "doc_terms_xattr",
            TermKind::Filename => "doc_terms_filename",
        }
    }
}

pub struct DocumentTermsDb;

impl DocumentTermsDb {
    pub fn get(snap: &impl Snapshot, kind: TermKind, id: u64) -> Result<Vec<Vec<u8>>> {
        match snap.get(kind.sub_map(), &codec::id_key(id)) {
            Some(bytes) => codec::decode_id_set(&bytes),
            None => Ok(Vec::new()),
        }
    }

    pub fn put(handle: &mut impl WriteHandle, kind: TermKind, id: u64, terms: &[Vec<u8>]) {
        let key = codec::id_key(id);
        if terms.is_empty() {
            handle.del(kind.sub_map(), &key);
        } else {
            handle.put(kind.sub_map(), &key, codec::encode_id_set(terms));
        }
    }

    pub fn remove(handle: &mut impl WriteHandle, kind: TermKind, id: u64) {
        handle.del(kind.sub_map(), &codec::id_key(id));
    }
}
