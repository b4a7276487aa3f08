//! File-backed state storage with atomic whole-file replacement
//!
//! The complete key/value table lives in memory behind one read/write lock and
//! is mirrored by a single JSON file (the canonical file).
//!
//! # Write path
//!
//! ```text
//! set() ── write lock ──> mutate table ──> serialize ──> AtomicWriter::write_atomic()
//!                                                           │ Ok  -> return
//!                                                           │ Err -> restore previous value, return Err
//! ```
//!
//! The lock is held across the flush, so readers never observe a value that
//! is not on disk, and a failed `set` leaves memory and disk exactly as they
//! were.
//!
//! # Open path
//!
//! - canonical file present: parse it, refuse to start on malformed content
//! - canonical file missing: start empty and persist `{}` right away

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::convert::bytes_to_str;
use crate::file_io::create_parent_dir_if_not_exist;
use crate::file_io::AtomicWriter;
use crate::file_io::FsAtomicWriter;
use crate::Error;
use crate::Result;
use crate::StateStorage;
use crate::StorageConfig;
use crate::StorageError;

type Table = BTreeMap<String, String>;

/// The durable map: in-memory table plus canonical file
pub struct FileStateStorage<W = FsAtomicWriter> {
    path: PathBuf,
    pretty: bool,
    table: RwLock<Table>,
    writer: W,
}

impl<W> std::fmt::Debug for FileStateStorage<W> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("FileStateStorage")
            .field("path", &self.path)
            .field("table_len", &self.table.read().len())
            .finish()
    }
}

impl FileStateStorage<FsAtomicWriter> {
    /// Opens the store at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(StorageConfig::with_path(path.as_ref()))
    }

    pub fn open_with_config(config: StorageConfig) -> Result<Self> {
        let writer = FsAtomicWriter::new(config.sync_parent_dir);
        Self::open_with_writer(config, writer)
    }
}

impl<W: AtomicWriter> FileStateStorage<W> {
    /// Loads the canonical file, or creates it holding an empty table.
    ///
    /// Never returns a partially initialized store: malformed content, I/O
    /// failures and a failed initial write are all errors.
    pub fn open_with_writer(
        config: StorageConfig,
        writer: W,
    ) -> Result<Self> {
        let config = config.validate()?;
        if config.create_parent_dir {
            create_parent_dir_if_not_exist(&config.path)?;
        }

        let path = config.path;
        let table = match fs::read(&path) {
            Ok(bytes) => Some(serde_json::from_slice::<Table>(&bytes).map_err(|source| {
                error!(?path, %source, "state file is corrupted, refusing to open");
                StorageError::DataCorruption {
                    path: path.clone(),
                    source,
                }
            })?),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                error!(?path, %e, "failed to read state file");
                return Err(StorageError::PathError { path, source: e }.into());
            }
        };

        let created = table.is_none();
        let storage = Self {
            path,
            pretty: config.pretty,
            table: RwLock::new(table.unwrap_or_default()),
            writer,
        };

        if created {
            storage.persist(&storage.table.read())?;
            info!(path = ?storage.path, "created empty state file");
        } else {
            info!(path = ?storage.path, entries = storage.len(), "loaded state file");
        }

        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Copy of the current table.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.table.read().clone()
    }

    fn encode(
        &self,
        table: &Table,
    ) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(table)
        } else {
            serde_json::to_vec(table)
        };
        Ok(bytes.map_err(StorageError::Serialization)?)
    }

    fn persist(
        &self,
        table: &Table,
    ) -> Result<()> {
        let bytes = self.encode(table)?;
        self.writer.write_atomic(&self.path, &bytes)?;
        debug!(path = ?self.path, entries = table.len(), "table persisted");
        Ok(())
    }
}

impl<W: AtomicWriter> StateStorage for FileStateStorage<W> {
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Vec<u8>> {
        // Non UTF-8 keys are rejected by set, so they can never be present
        let Ok(key) = std::str::from_utf8(key) else {
            return Err(Error::NotFound);
        };

        self.table
            .read()
            .get(key)
            .map(|value| value.clone().into_bytes())
            .ok_or(Error::NotFound)
    }

    fn set(
        &self,
        key: &[u8],
        value: &[u8],
    ) -> Result<()> {
        let key = bytes_to_str(key, "key")?;
        let value = bytes_to_str(value, "value")?;

        let mut table = self.table.write();
        let previous = if value.is_empty() {
            table.remove(key)
        } else {
            table.insert(key.to_owned(), value.to_owned())
        };

        if let Err(e) = self.persist(&table) {
            match previous {
                Some(previous) => {
                    table.insert(key.to_owned(), previous);
                }
                None => {
                    table.remove(key);
                }
            }
            warn!(key, %e, "persist failed, in-memory table rolled back");
            return Err(e);
        }

        Ok(())
    }
}
