//! The in-memory document record staged by the extractor before being handed
//! to `WriteTransaction::add_document`/`replace_document`.

use std::collections::BTreeMap;

/// Positions at which a term occurred, kept sorted and de-duplicated as the
/// caller builds the document up incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermPositions {
    positions: Vec<u32>,
}

impl TermPositions {
    fn insert(&mut self, position: u32) {
        match self.positions.binary_search(&position) {
            Ok(_) => {}
            Err(at) => self.positions.insert(at, position),
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.positions
    }
}

/// A term → positions map, ordered by term so iteration (and the set of
/// terms handed to `DocumentTermsDB`) comes out already sorted.
pub type TermMap = BTreeMap<Vec<u8>, TermPositions>;

/// A document staged for indexing. Built incrementally by the extractor,
/// handed once to `add_document`/`replace_document`, then dropped.
#[derive(Debug, Clone, Default)]
pub struct Document {
    id: u64,
    parent_id: u64,
    url: Vec<u8>,
    content_terms: TermMap,
    xattr_terms: TermMap,
    filename_terms: TermMap,
    mtime: i64,
    ctime: i64,
    content_indexing_required: bool,
    data: Vec<u8>,
}

impl Document {
    /// Creates a new staging document. `id` must be nonzero: zero is the
    /// reserved "none" sentinel used by iterators, never a real document.
    pub fn new(id: u64) -> Self {
        assert_ne!(id, 0, "document id 0 is the reserved end-of-iteration sentinel");
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn set_parent_id(&mut self, parent_id: u64) -> &mut Self {
        self.parent_id = parent_id;
        self
    }

    pub fn parent_id(&self) -> u64 {
        self.parent_id
    }

    /// Sets the document's absolute path (§3). `WriteTransaction` derives
    /// the single path component `DocumentUrlDb` stores from this relative
    /// to `parent_id` — callers pass the real absolute path, not a
    /// pre-stripped basename.
    pub fn set_url(&mut self, url: impl Into<Vec<u8>>) -> &mut Self {
        self.url = url.into();
        self
    }

    /// The document's absolute path, as set by `set_url`.
    pub fn url(&self) -> &[u8] {
        &self.url
    }

    /// Adds a content term at position 0. Extractors that don't track word
    /// offsets (xattrs, most metadata) use this form.
    pub fn add_term(&mut self, term: impl Into<Vec<u8>>) -> &mut Self {
        self.add_term_at(term, 0)
    }

    pub fn add_term_at(&mut self, term: impl Into<Vec<u8>>, position: u32) -> &mut Self {
        self.content_terms.entry(term.into()).or_default().insert(position);
        self
    }

    pub fn add_xattr_term(&mut self, term: impl Into<Vec<u8>>) -> &mut Self {
        self.xattr_terms.entry(term.into()).or_default().insert(0);
        self
    }

    pub fn add_filename_term(&mut self, term: impl Into<Vec<u8>>) -> &mut Self {
        self.filename_terms.entry(term.into()).or_default().insert(0);
        self
    }

    pub fn content_terms(&self) -> &TermMap {
        &self.content_terms
    }

    pub fn xattr_terms(&self) -> &TermMap {
        &self.xattr_terms
    }

    pub fn filename_terms(&self) -> &TermMap {
        &self.filename_terms
    }

    pub fn set_mtime(&mut self, mtime: i64) -> &mut Self {
        self.mtime = mtime;
        self
    }

    pub fn mtime(&self) -> i64 {
        self.mtime
    }

    pub fn set_ctime(&mut self, ctime: i64) -> &mut Self {
        self.ctime = ctime;
        self
    }

    pub fn ctime(&self) -> i64 {
        self.ctime
    }

    pub fn set_content_indexing_required(&mut self, required: bool) -> &mut Self {
        self.content_indexing_required = required;
        self
    }

    pub fn content_indexing_required(&self) -> bool {
        self.content_indexing_required
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.data = data.into();
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
