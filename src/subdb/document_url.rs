//! `DocumentUrlDB` (§4.3.3): a bijection between url and document id,
//! implemented as a parent/filename hierarchy rather than a flat string map.
//!
//! Reconstructing a url walks the parent chain up to the root (`parent_id ==
//! 0`), joining filename components with `/`. Every non-zero id stored has
//! either `parent_id == 0` or an entry for its parent — the core never
//! writes an orphaned child.

use crate::codec::{self, UrlEntry};
use crate::error::{Error, Result};
use crate::kv::{Snapshot, WriteHandle};

const FORWARD: &str = "doc_url_id";
const REVERSE: &str = "doc_url_name";

fn reverse_key(parent_id: u64, filename: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 2 + filename.len());
    key.extend_from_slice(&parent_id.to_be_bytes());
    key.extend_from_slice(&(filename.len() as u16).to_be_bytes());
    key.extend_from_slice(filename);
    key
}

pub struct DocumentUrlDb;

impl DocumentUrlDb {
    /// Raw forward record for `id`, or `None` if `id` is not indexed.
    pub fn get_entry(snap: &impl Snapshot, id: u64) -> Result<Option<UrlEntry>> {
        match snap.get(FORWARD, &codec::id_key(id)) {
            Some(bytes) => Ok(Some(codec::decode_url_entry(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Reconstructs the full `/`-joined url for `id` by walking the parent
    /// chain to the root.
    pub fn url_for(snap: &impl Snapshot, id: u64) -> Result<Option<Vec<u8>>> {
        let mut components = Vec::new();
        let mut current = id;
        loop {
            let entry = match Self::get_entry(snap, current)? {
                Some(e) => e,
                None => return Ok(None),
            };
            components.push(entry.filename);
            if entry.parent_id == 0 {
                break;
            }
            current = entry.parent_id;
        }
        components.reverse();
        let mut url = Vec::new();
        for (i, component) in components.iter().enumerate() {
            if i > 0 {
                url.push(b'/');
            }
            url.extend_from_slice(component);
        }
        Ok(Some(url))
    }

    /// Looks up `id` by its immediate `(parent_id, filename)` pair. The
    /// caller (the parser, or a future `id_for_url` that splits the url into
    /// components) resolves the full path one level at a time.
    pub fn child_id(snap: &impl Snapshot, parent_id: u64, filename: &[u8]) -> Result<Option<u64>> {
        match snap.get(REVERSE, &reverse_key(parent_id, filename)) {
            Some(bytes) => Ok(Some(codec::decode_id_key(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Inserts or overwrites the entry for `id`, maintaining both directions
    /// of the bijection.
    pub fn put(
        handle: &mut impl WriteHandle,
        id: u64,
        parent_id: u64,
        filename: &[u8],
        mtime: i64,
    ) -> Result<()> {
        if let Some(existing) = Self::get_entry(&*handle, id)? {
            if existing.parent_id != parent_id || existing.filename != filename {
                handle.del(REVERSE, &reverse_key(existing.parent_id, &existing.filename));
            }
        }
        let entry = UrlEntry {
            parent_id,
            filename: filename.to_vec(),
            mtime,
        };
        handle.put(FORWARD, &codec::id_key(id), codec::encode_url_entry(&entry));
        handle.put(REVERSE, &reverse_key(parent_id, filename), codec::id_key(id).to_vec());
        Ok(())
    }

    /// Removes `id` from both directions. A no-op if `id` is not indexed.
    pub fn remove(handle: &mut impl WriteHandle, id: u64) -> Result<()> {
        if let Some(entry) = Self::get_entry(&*handle, id)? {
            handle.del(FORWARD, &codec::id_key(id));
            handle.del(REVERSE, &reverse_key(entry.parent_id, &entry.filename));
        }
        Ok(())
    }

    pub fn contains(snap: &impl Snapshot, id: u64) -> bool {
        snap.contains(FORWARD, &codec::id_key(id))
    }
}
