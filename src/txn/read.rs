//! `ReadTransaction` (§4.5): snapshot-scoped lookups plus factory methods
//! for leaf posting iterators.

use crate::codec::TimeInfo;
use crate::error::Result;
use crate::iter::{PhraseIterator, VectorPostingIterator};
use crate::kv::Snapshot;
use crate::subdb::{DocumentIdDb, DocumentTimeDb, DocumentUrlDb, PostingDb};

/// A point-in-time view over the index, as of the moment it was opened.
pub struct ReadTransaction<S: Snapshot> {
    snapshot: S,
}

impl<S: Snapshot> ReadTransaction<S> {
    pub fn new(snapshot: S) -> Self {
        Self { snapshot }
    }

    pub fn has_document(&self, id: u64) -> bool {
        DocumentUrlDb::contains(&self.snapshot, id)
    }

    /// Resolves `url` to a document id, walking path components from the
    /// root. `url` uses `/` as the component separator, matching
    /// [`DocumentUrlDb::url_for`]'s reconstruction.
    pub fn document_id(&self, url: &[u8]) -> Result<Option<u64>> {
        let mut parent = 0u64;
        let mut id = None;
        for component in url.split(|&b| b == b'/') {
            if component.is_empty() {
                continue;
            }
            match DocumentUrlDb::child_id(&self.snapshot, parent, component)? {
                Some(child) => {
                    id = Some(child);
                    parent = child;
                }
                None => return Ok(None),
            }
        }
        Ok(id)
    }

    pub fn document_url(&self, id: u64) -> Result<Option<Vec<u8>>> {
        DocumentUrlDb::url_for(&self.snapshot, id)
    }

    pub fn document_time_info(&self, id: u64) -> Result<Option<TimeInfo>> {
        DocumentTimeDb::get(&self.snapshot, id)
    }

    pub fn phase_one_size(&self) -> usize {
        DocumentIdDb::phase_one_size(&self.snapshot)
    }

    pub fn fetch_phase_one_ids(&self, limit: usize) -> Vec<u64> {
        DocumentIdDb::fetch_phase_one_ids(&self.snapshot, limit)
    }

    pub fn has_failed(&self, id: u64) -> bool {
        DocumentIdDb::has_failed(&self.snapshot, id)
    }

    /// Builds a leaf posting iterator over `term`. Callers compose these
    /// with `iter::{And,Or}PostingIterator` to evaluate a query.
    pub fn postings(&self, term: &[u8]) -> Result<VectorPostingIterator> {
        Ok(VectorPostingIterator::new(PostingDb::get(&self.snapshot, term)?))
    }

    /// Builds a phrase iterator over `terms` at `offsets` (§4.6), reading
    /// each term's posting and position lists from this snapshot.
    pub fn phrase(&self, terms: &[Vec<u8>], offsets: &[u32]) -> Result<PhraseIterator> {
        PhraseIterator::new(&self.snapshot, terms, offsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TimeInfo as TI;
    use crate::document::Document;
    use crate::iter::PostingIterator;
    use crate::kv::btree_store::BTreeKv;
    use crate::kv::KvStore;
    use crate::txn::write::WriteTransaction;

    #[test]
    fn fresh_database_has_no_documents() {
        let kv = BTreeKv::in_memory();
        let read = ReadTransaction::new(kv.begin_read());
        assert!(!read.has_document(1));
    }

    #[test]
    fn add_then_read_back_time_info_and_presence() {
        let kv = BTreeKv::in_memory();
        let mut d = Document::new(1);
        d.set_parent_id(0)
            .set_url("report.pdf")
            .add_term("power")
            .add_filename_term("link")
            .set_mtime(1)
            .set_ctime(2);

        let mut txn = WriteTransaction::new(kv.begin_write().unwrap());
        txn.add_document(&d).unwrap();
        txn.commit().unwrap();

        let read = ReadTransaction::new(kv.begin_read());
        assert!(read.has_document(1));
        assert_eq!(read.document_time_info(1).unwrap(), Some(TI { mtime: 1, ctime: 2 }));
        assert_eq!(read.document_url(1).unwrap(), Some(b"report.pdf".to_vec()));
        assert_eq!(read.document_id(b"report.pdf").unwrap(), Some(1));

        let mut it = read.postings(b"power").unwrap();
        assert_eq!(it.next(), 1);
        assert_eq!(it.next(), 0);
    }

    #[test]
    fn nested_path_round_trips_through_add_document_and_lookup() {
        let kv = BTreeKv::in_memory();
        let mut home = Document::new(1);
        home.set_parent_id(0).set_url("/home").set_mtime(1).set_ctime(1);
        let mut alice = Document::new(2);
        alice.set_parent_id(1).set_url("/home/alice").set_mtime(1).set_ctime(1);
        let mut report = Document::new(3);
        report
            .set_parent_id(2)
            .set_url("/home/alice/report.pdf")
            .add_term("quarterly")
            .set_mtime(5)
            .set_ctime(5);

        let mut txn = WriteTransaction::new(kv.begin_write().unwrap());
        txn.add_document(&home).unwrap();
        txn.add_document(&alice).unwrap();
        txn.add_document(&report).unwrap();
        txn.commit().unwrap();

        let read = ReadTransaction::new(kv.begin_read());
        assert_eq!(
            read.document_url(3).unwrap(),
            Some(b"home/alice/report.pdf".to_vec())
        );
        assert_eq!(read.document_id(b"home/alice/report.pdf").unwrap(), Some(3));
        assert_eq!(read.document_id(b"home/alice").unwrap(), Some(2));

        let mut it = read.postings(b"quarterly").unwrap();
        assert_eq!(it.next(), 3);
        assert_eq!(it.next(), 0);
    }

    #[test]
    fn phrase_factory_matches_adjacent_terms() {
        let kv = BTreeKv::in_memory();
        let mut d = Document::new(1);
        d.set_url("notes.txt")
            .add_term_at("quick", 0)
            .add_term_at("brown", 1);

        let mut txn = WriteTransaction::new(kv.begin_write().unwrap());
        txn.add_document(&d).unwrap();
        txn.commit().unwrap();

        let read = ReadTransaction::new(kv.begin_read());
        let terms = vec![b"quick".to_vec(), b"brown".to_vec()];
        let mut it = read.phrase(&terms, &[0, 1]).unwrap();
        assert_eq!(it.next(), 1);
        assert_eq!(it.next(), 0);
    }

    #[test]
    fn phase_one_fetch_returns_smallest_ids_ascending() {
        let kv = BTreeKv::in_memory();
        let mut txn = WriteTransaction::new(kv.begin_write().unwrap());
        for id in [5u64, 1, 3, 2, 4] {
            let mut d = Document::new(id);
            d.set_url(format!("f{id}")).set_content_indexing_required(true);
            txn.add_document(&d).unwrap();
        }
        txn.commit().unwrap();

        let read = ReadTransaction::new(kv.begin_read());
        assert_eq!(read.phase_one_size(), 5);
        assert_eq!(read.fetch_phase_one_ids(3), vec![1, 2, 3]);
    }
}
