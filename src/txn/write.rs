//! `WriteTransaction` (§4.4): batches add/remove/replace operations,
//! aggregates posting mutations per term, and commits them in sorted order.

use std::collections::BTreeMap;

use crate::codec::{self, PositionRecord, TimeInfo};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::kv::WriteHandle;
use crate::subdb::{
    DocumentDataDb, DocumentIdDb, DocumentTermsDb, DocumentTimeDb, DocumentUrlDb, MTimeDb,
    PositionDb, PostingDb, TermKind,
};

/// One staged mutation against a term's posting/position entry.
#[derive(Debug, Clone)]
enum PendingOp {
    AddId { id: u64, positions: Vec<u32> },
    RemoveId { id: u64 },
}

/// Which parts of a document [`WriteTransaction::replace_document`] touches.
/// Defaults to touching nothing; the public setters carry the masking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceMask {
    pub content_terms: bool,
    pub xattr_terms: bool,
    pub filename_terms: bool,
    pub url: bool,
    pub time: bool,
    pub data: bool,
}

impl ReplaceMask {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all_terms() -> Self {
        Self {
            content_terms: true,
            xattr_terms: true,
            filename_terms: true,
            ..Self::default()
        }
    }

    pub fn with_content_terms(mut self) -> Self {
        self.content_terms = true;
        self
    }

    pub fn with_xattr_terms(mut self) -> Self {
        self.xattr_terms = true;
        self
    }

    pub fn with_filename_terms(mut self) -> Self {
        self.filename_terms = true;
        self
    }

    pub fn with_url(mut self) -> Self {
        self.url = true;
        self
    }

    pub fn with_time(mut self) -> Self {
        self.time = true;
        self
    }

    pub fn with_data(mut self) -> Self {
        self.data = true;
        self
    }
}

/// The single exclusive handle through which documents are staged and
/// committed. Dropping without calling [`WriteTransaction::commit`] discards
/// every staged operation; nothing touches the backend until `commit`.
pub struct WriteTransaction<W: WriteHandle> {
    handle: W,
    pending: BTreeMap<Vec<u8>, Vec<PendingOp>>,
}

impl<W: WriteHandle> WriteTransaction<W> {
    pub fn new(handle: W) -> Self {
        Self {
            handle,
            pending: BTreeMap::new(),
        }
    }

    fn stage_add(&mut self, term: &[u8], id: u64, positions: Vec<u32>) {
        self.pending
            .entry(term.to_vec())
            .or_default()
            .push(PendingOp::AddId { id, positions });
    }

    fn stage_remove(&mut self, term: &[u8], id: u64) {
        self.pending
            .entry(term.to_vec())
            .or_default()
            .push(PendingOp::RemoveId { id });
    }

    /// Stages a brand-new document. Fails with `ContractViolation` if `id`
    /// already occupies any of the six primary sub-DBs.
    pub fn add_document(&mut self, doc: &Document) -> Result<()> {
        if !DocumentTermsDb::get(&self.handle, TermKind::Content, doc.id())?.is_empty()
            || !DocumentTermsDb::get(&self.handle, TermKind::Xattr, doc.id())?.is_empty()
            || !DocumentTermsDb::get(&self.handle, TermKind::Filename, doc.id())?.is_empty()
            || DocumentTimeDb::get(&self.handle, doc.id())?.is_some()
            || DocumentDataDb::get(&self.handle, doc.id())?.is_some()
            || DocumentIdDb::contains_phase_one(&self.handle, doc.id())
        {
            return Err(Error::ContractViolation(format!(
                "add_document: id {} already present",
                doc.id()
            )));
        }

        for (kind, terms) in [
            (TermKind::Content, doc.content_terms()),
            (TermKind::Xattr, doc.xattr_terms()),
            (TermKind::Filename, doc.filename_terms()),
        ] {
            let term_list: Vec<Vec<u8>> = terms.keys().cloned().collect();
            DocumentTermsDb::put(&mut self.handle, kind, doc.id(), &term_list);
            for (term, positions) in terms {
                self.stage_add(term, doc.id(), positions.as_slice().to_vec());
            }
        }

        DocumentUrlDb::put(&mut self.handle, doc.id(), doc.parent_id(), basename(doc.url()), doc.mtime())?;
        DocumentTimeDb::put(
            &mut self.handle,
            doc.id(),
            TimeInfo { mtime: doc.mtime(), ctime: doc.ctime() },
        );
        MTimeDb::add_id(&mut self.handle, doc.mtime(), doc.id())?;

        if doc.content_indexing_required() {
            DocumentIdDb::add_phase_one(&mut self.handle, doc.id());
        }

        if !doc.data().is_empty() {
            DocumentDataDb::put(&mut self.handle, doc.id(), doc.data());
        }

        Ok(())
    }

    /// Removes a document, if present. A no-op (not an error) if `id` is not
    /// indexed.
    pub fn remove_document(&mut self, id: u64) -> Result<()> {
        // Existence, like `has_document`, is defined by `DocumentTimeDb`
        // (written unconditionally by `add_document`), not by term
        // presence: a document with no terms in any of the three variants
        // is still indexed and must still be fully erased.
        if DocumentTimeDb::get(&self.handle, id)?.is_none() {
            return Ok(());
        }

        let content = DocumentTermsDb::get(&self.handle, TermKind::Content, id)?;
        let xattr = DocumentTermsDb::get(&self.handle, TermKind::Xattr, id)?;
        let filename = DocumentTermsDb::get(&self.handle, TermKind::Filename, id)?;

        let mut terms: Vec<Vec<u8>> = content;
        terms.extend(xattr);
        terms.extend(filename);
        terms.sort();
        terms.dedup();
        for term in &terms {
            self.stage_remove(term, id);
        }

        DocumentTermsDb::remove(&mut self.handle, TermKind::Content, id);
        DocumentTermsDb::remove(&mut self.handle, TermKind::Xattr, id);
        DocumentTermsDb::remove(&mut self.handle, TermKind::Filename, id);
        DocumentUrlDb::remove(&mut self.handle, id)?;
        DocumentIdDb::remove_phase_one(&mut self.handle, id);

        if let Some(info) = DocumentTimeDb::get(&self.handle, id)? {
            MTimeDb::remove_id(&mut self.handle, info.mtime, id)?;
        }
        DocumentTimeDb::remove(&mut self.handle, id);
        DocumentDataDb::remove(&mut self.handle, id);

        Ok(())
    }

    /// Replaces the parts of an already-indexed document named by `mask`. An
    /// empty mask is a no-op, not an error.
    ///
    /// `mask.url` is not supported: the hierarchy in `DocumentUrlDB` is keyed
    /// by parent/filename, and moving a document is a remove+add at the
    /// crawler layer, not an in-place replace.
    pub fn replace_document(&mut self, doc: &Document, mask: ReplaceMask) -> Result<()> {
        if mask.url {
            return Err(Error::Unsupported(
                "replace_document: url is not replaceable in place".into(),
            ));
        }

        for (kind, touched, new_terms) in [
            (TermKind::Content, mask.content_terms, doc.content_terms()),
            (TermKind::Xattr, mask.xattr_terms, doc.xattr_terms()),
            (TermKind::Filename, mask.filename_terms, doc.filename_terms()),
        ] {
            if !touched {
                continue;
            }
            let old_terms = DocumentTermsDb::get(&self.handle, kind, doc.id())?;
            for term in &old_terms {
                self.stage_remove(term, doc.id());
            }
            let new_term_list: Vec<Vec<u8>> = new_terms.keys().cloned().collect();
            for (term, positions) in new_terms {
                self.stage_add(term, doc.id(), positions.as_slice().to_vec());
            }
            DocumentTermsDb::put(&mut self.handle, kind, doc.id(), &new_term_list);
        }

        if mask.time {
            // Known wart: the stale MTimeDB entry under the document's
            // previous mtime is intentionally left in place, not erased.
            DocumentTimeDb::put(
                &mut self.handle,
                doc.id(),
                TimeInfo { mtime: doc.mtime(), ctime: doc.ctime() },
            );
            MTimeDb::add_id(&mut self.handle, doc.mtime(), doc.id())?;
        }

        if mask.data {
            DocumentDataDb::put(&mut self.handle, doc.id(), doc.data());
        }

        Ok(())
    }

    /// Marks `id` as permanently failed extraction. Supplemental to the
    /// core add/remove/replace surface: moves `id` out of the phase-one
    /// queue into the failed set.
    pub fn mark_failed(&mut self, id: u64) {
        DocumentIdDb::mark_failed(&mut self.handle, id);
    }

    /// Removes `id` from the phase-one queue without marking it failed, e.g.
    /// once extraction has completed successfully.
    pub fn remove_phase_one(&mut self, id: u64) {
        DocumentIdDb::remove_phase_one(&mut self.handle, id);
    }

    /// Applies every staged per-term operation in sorted term order, then
    /// commits the underlying write handle atomically.
    pub fn commit(mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        log::debug!("committing write transaction: {} terms touched", pending.len());
        for (term, ops) in pending {
            let mut ids = PostingDb::get(&self.handle, &term)?;
            let mut records = PositionDb::get(&self.handle, &term)?;

            for op in ops {
                match op {
                    PendingOp::AddId { id, positions } => {
                        sorted_insert(&mut ids, id);
                        upsert_position_record(&mut records, id, positions);
                    }
                    PendingOp::RemoveId { id } => {
                        if let Ok(at) = ids.binary_search(&id) {
                            ids.remove(at);
                        }
                        if let Ok(at) = records.binary_search_by_key(&id, |r| r.id) {
                            records.remove(at);
                        }
                    }
                }
            }

            PostingDb::put(&mut self.handle, &term, &ids);
            PositionDb::put(&mut self.handle, &term, &records);
        }

        self.handle.commit().map(|()| {
            log::trace!("write transaction committed");
        })
    }
}

/// The final `/`-delimited component of `url`, the single path component
/// `DocumentUrlDb` stores per id (§4.3.3). `url` is the document's absolute
/// path; everything up to and including the last `/` is the parent's own
/// path and is not repeated here.
fn basename(url: &[u8]) -> &[u8] {
    match url.iter().rposition(|&b| b == b'/') {
        Some(at) => &url[at + 1..],
        None => url,
    }
}

/// Inserts `x` into sorted, strictly-ascending, unique `v` in place.
/// Idempotent: inserting a value already present is a no-op.
fn sorted_insert(v: &mut Vec<u64>, x: u64) {
    let at = v.partition_point(|&e| e < x);
    if at >= v.len() || v[at] != x {
        v.insert(at, x);
    }
}

fn upsert_position_record(records: &mut Vec<PositionRecord>, id: u64, positions: Vec<u32>) {
    match records.binary_search_by_key(&id, |r| r.id) {
        Ok(at) => {
            for pos in positions {
                sorted_insert_u32(&mut records[at].positions, pos);
            }
        }
        Err(at) => records.insert(at, PositionRecord { id, positions }),
    }
}

fn sorted_insert_u32(v: &mut Vec<u32>, x: u32) {
    if let Err(at) = v.binary_search(&x) {
        v.insert(at, x);
    }
}
