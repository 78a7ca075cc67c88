//! `BTreeKv`: the concrete [`KvStore`] implementation this crate ships.
//!
//! Each named sub-map is a `BTreeMap<Vec<u8>, Vec<u8>>` guarded by a single
//! `parking_lot::RwLock`. `begin_read` clones the current maps into an owned
//! snapshot so later commits cannot perturb it. A single writer is enforced
//! with an atomic flag rather than a blocking lock, since the contract is to
//! fail fast with `Busy` rather than queue (queuing is the caller's job, per
//! the error handling design).
//!
//! Durability is provided by an append-only log of committed op-batches,
//! each wrapped in a CRC32C checksum (`storage::checksum`) and replayed in
//! order when the store is opened.

use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kv::{KvStore, Snapshot as SnapshotTrait, WriteHandle as WriteHandleTrait};
use crate::storage::checksum;

type SubMap = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Default)]
struct Store {
    maps: HashMap<String, SubMap>,
}

impl Store {
    fn sub(&self, name: &str) -> Option<&SubMap> {
        self.maps.get(name)
    }

    fn sub_mut(&mut self, name: &str) -> &mut SubMap {
        self.maps.entry(name.to_string()).or_default()
    }
}

/// One committed batch of mutations, as it is written to the log file.
#[derive(Serialize, Deserialize)]
struct OpBatch {
    ops: Vec<(String, Vec<u8>, Option<Vec<u8>>)>,
}

pub struct BTreeKv {
    store: Arc<RwLock<Store>>,
    writer_active: Arc<AtomicBool>,
    log_path: Option<PathBuf>,
    log: Option<Arc<parking_lot::Mutex<File>>>,
}

impl BTreeKv {
    /// Opens (or creates) the durability log at `log_path` and replays it to
    /// reconstruct the in-memory maps. `log_path` is `None` for a purely
    /// in-memory store (used in tests that don't care about persistence).
    pub fn open(log_path: Option<&Path>) -> Result<Self> {
        let mut store = Store::default();

        let log = match log_path {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .read(true)
                    .append(true)
                    .open(path)?;
                let replayed = replay(path, &mut store)?;
                log::debug!("replayed {replayed} WAL batches from {}", path.display());
                Some(Arc::new(parking_lot::Mutex::new(file)))
            }
            None => None,
        };

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            writer_active: Arc::new(AtomicBool::new(false)),
            log_path: log_path.map(|p| p.to_path_buf()),
            log,
        })
    }

    pub fn in_memory() -> Self {
        Self::open(None).expect("in-memory store never touches disk")
    }
}

fn replay(path: &Path, store: &mut Store) -> Result<usize> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut whole = Vec::new();
    reader.read_to_end(&mut whole)?;

    let mut offset = 0usize;
    let mut batches = 0usize;
    while offset < whole.len() {
        if offset + 4 > whole.len() {
            break; // trailing partial write; ignore.
        }
        let len = u32::from_le_bytes(whole[offset..offset + 4].try_into().unwrap()) as usize;
        let block_end = offset + 4 + len + 4;
        if block_end > whole.len() {
            break; // partial write at the tail, skip it.
        }
        let block = &whole[offset..block_end];
        let payload = checksum::decode_with_checksum(block)
            .map_err(|e| Error::Corruption(format!("WAL replay: {e}")))?;
        let batch: OpBatch = bincode::deserialize(&payload)?;
        for (sub, key, value) in batch.ops {
            match value {
                Some(v) => {
                    store.sub_mut(&sub).insert(key, v);
                }
                None => {
                    store.sub_mut(&sub).remove(&key);
                }
            }
        }
        offset = block_end;
        batches += 1;
    }
    Ok(batches)
}

pub struct BTreeSnapshot {
    maps: HashMap<String, SubMap>,
}

impl SnapshotTrait for BTreeSnapshot {
    fn get(&self, sub: &str, key: &[u8]) -> Option<Vec<u8>> {
        self.maps.get(sub).and_then(|m| m.get(key)).cloned()
    }

    fn range(&self, sub: &str, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        match self.maps.get(sub) {
            Some(m) => m
                .range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            None => Vec::new(),
        }
    }
}

pub struct BTreeWriteHandle {
    store: Arc<RwLock<Store>>,
    writer_active: Arc<AtomicBool>,
    log: Option<Arc<parking_lot::Mutex<File>>>,
    pending: Vec<(String, Vec<u8>, Option<Vec<u8>>)>,
    committed: bool,
}

impl BTreeWriteHandle {
    fn pending_value(&self, sub: &str, key: &[u8]) -> Option<Option<Vec<u8>>> {
        self.pending
            .iter()
            .rev()
            .find(|(s, k, _)| s == sub && k.as_slice() == key)
            .map(|(_, _, v)| v.clone())
    }
}

impl SnapshotTrait for BTreeWriteHandle {
    fn get(&self, sub: &str, key: &[u8]) -> Option<Vec<u8>> {
        if let Some(v) = self.pending_value(sub, key) {
            return v;
        }
        self.store.read().sub(sub).and_then(|m| m.get(key)).cloned()
    }

    fn range(&self, sub: &str, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let base = self.store.read();
        let mut merged: BTreeMap<Vec<u8>, Option<Vec<u8>>> = BTreeMap::new();
        if let Some(m) = base.sub(sub) {
            for (k, v) in m.range(prefix.to_vec()..) {
                if !k.starts_with(prefix) {
                    break;
                }
                merged.insert(k.clone(), Some(v.clone()));
            }
        }
        for (s, k, v) in &self.pending {
            if s == sub && k.starts_with(prefix) {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}

impl WriteHandleTrait for BTreeWriteHandle {
    fn put(&mut self, sub: &str, key: &[u8], value: Vec<u8>) {
        self.pending.push((sub.to_string(), key.to_vec(), Some(value)));
    }

    fn del(&mut self, sub: &str, key: &[u8]) {
        self.pending.push((sub.to_string(), key.to_vec(), None));
    }

    fn commit(mut self) -> Result<()> {
        if let Some(log) = &self.log {
            let batch = OpBatch {
                ops: self.pending.clone(),
            };
            let payload = bincode::serialize(&batch)?;
            let block = checksum::encode_with_checksum(&payload);
            let mut file = log.lock();
            file.write_all(&block)?;
            file.flush()?;
            file.sync_data()?;
        }

        {
            let mut store = self.store.write();
            for (sub, key, value) in self.pending.drain(..) {
                match value {
                    Some(v) => {
                        store.sub_mut(&sub).insert(key, v);
                    }
                    None => {
                        store.sub_mut(&sub).remove(&key);
                    }
                }
            }
        }

        self.committed = true;
        Ok(())
    }
}

impl Drop for BTreeWriteHandle {
    fn drop(&mut self) {
        // Whether committed or abandoned mid-transaction, release the
        // exclusive writer slot. Uncommitted `pending` ops are simply
        // dropped with `self`: the live store was never touched.
        self.writer_active.store(false, Ordering::Release);
    }
}

impl KvStore for BTreeKv {
    type Snapshot = BTreeSnapshot;
    type WriteHandle = BTreeWriteHandle;

    fn begin_read(&self) -> Self::Snapshot {
        BTreeSnapshot {
            maps: self.store.read().maps.clone(),
        }
    }

    fn begin_write(&self) -> Result<Self::WriteHandle> {
        if self
            .writer_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("begin_write: a write handle is already open");
            return Err(Error::Busy);
        }
        Ok(BTreeWriteHandle {
            store: self.store.clone(),
            writer_active: self.writer_active.clone(),
            log: self.log.clone(),
            pending: Vec::new(),
            committed: false,
        })
    }
}

impl BTreeKv {
    /// Exposed for `Database::open`'s version-stamp handling, which needs to
    /// read/write a single reserved key before any `WriteTransaction` exists.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }
}
