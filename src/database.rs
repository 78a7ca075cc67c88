//! `Database` façade (§4.7): opens/creates the store, verifies the version
//! stamp, and hands out read and write transactions.

use std::fs;

use crate::codec::{self, VersionStamp, CURRENT_VERSION_MAJOR, CURRENT_VERSION_MINOR};
use crate::config::{Config, OpenMode};
use crate::error::{Error, Result};
use crate::kv::btree_store::{BTreeKv, BTreeSnapshot, BTreeWriteHandle};
use crate::kv::{KvStore, Snapshot as _, WriteHandle as _};
use crate::subdb::{META, META_VERSION_KEY};
use crate::txn::read::ReadTransaction;
use crate::txn::write::WriteTransaction;

/// The durability log file name under a `Database`'s directory.
const LOG_FILE: &str = "index.wal";

pub struct Database {
    kv: BTreeKv,
}

impl Database {
    /// Opens or creates the store at `config.path` per `mode`, verifying (or
    /// writing, on first creation) the on-disk version stamp.
    pub fn open(config: &Config, mode: OpenMode) -> Result<Self> {
        let path = config.path();
        let log_path = path.join(LOG_FILE);
        let already_exists = log_path.exists();

        match mode {
            OpenMode::Open if !already_exists => {
                return Err(Error::PathUnusable(format!(
                    "{}: no database found and mode is Open",
                    path.display()
                )));
            }
            OpenMode::Create if already_exists => {
                return Err(Error::PathUnusable(format!(
                    "{}: database already exists and mode is Create",
                    path.display()
                )));
            }
            _ => {}
        }

        fs::create_dir_all(path)
            .map_err(|e| Error::PathUnusable(format!("{}: {e}", path.display())))?;

        let kv = BTreeKv::open(Some(log_path.as_path()))?;
        let db = Self { kv };
        db.verify_or_write_version_stamp(already_exists)?;
        log::info!("opened database at {}", path.display());
        Ok(db)
    }

    /// An in-memory database with no backing file, for tests and embedding
    /// scenarios that never need persistence across process restarts.
    pub fn in_memory() -> Result<Self> {
        let kv = BTreeKv::in_memory();
        let db = Self { kv };
        db.verify_or_write_version_stamp(false)?;
        Ok(db)
    }

    fn verify_or_write_version_stamp(&self, already_exists: bool) -> Result<()> {
        let snapshot = self.kv.begin_read();
        match snapshot.get(META, META_VERSION_KEY) {
            Some(bytes) => {
                let stamp = codec::decode_version_stamp(&bytes)?;
                if stamp.major != CURRENT_VERSION_MAJOR {
                    log::error!(
                        "version mismatch: on-disk {}.{}, expected major {}",
                        stamp.major,
                        stamp.minor,
                        CURRENT_VERSION_MAJOR
                    );
                    return Err(Error::VersionMismatch {
                        on_disk_major: stamp.major,
                        on_disk_minor: stamp.minor,
                        expected_major: CURRENT_VERSION_MAJOR,
                    });
                }
                Ok(())
            }
            None => {
                debug_assert!(!already_exists, "existing store with no version stamp");
                let stamp = VersionStamp {
                    major: CURRENT_VERSION_MAJOR,
                    minor: CURRENT_VERSION_MINOR,
                };
                let mut handle = self.kv.begin_write()?;
                handle.put(META, META_VERSION_KEY, codec::encode_version_stamp(&stamp));
                handle.commit()
            }
        }
    }

    pub fn begin_read(&self) -> ReadTransaction<BTreeSnapshot> {
        ReadTransaction::new(self.kv.begin_read())
    }

    pub fn begin_write(&self) -> Result<WriteTransaction<BTreeWriteHandle>> {
        Ok(WriteTransaction::new(self.kv.begin_write()?))
    }
}
