//! File helpers behind the atomic persistence protocol.
//!
//! Every state file replacement goes through [`AtomicWriter::write_atomic`]:
//!
//! ```text
//! <path>.tmp-<hex8>  --write_all-->  --sync_all-->  --close-->  rename(<path>)
//!        ^                                                          |
//!        +------------- remove (best effort) on any failure --------+
//! ```
//!
//! Readers of `<path>` see either the previous file or the complete new one.

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::debug;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::constants::TEMP_FILE_INFIX;
use crate::Result;
use crate::StorageError;

pub fn create_parent_dir_if_not_exist(path: &Path) -> Result<()> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            if let Err(e) = fs::create_dir_all(parent_dir) {
                error!("Failed to create parent directory {:?}: {:?}", parent_dir, e);
                return Err(StorageError::PathError {
                    path: parent_dir.to_path_buf(),
                    source: e,
                }
                .into());
            }
        }
    }
    Ok(())
}

/// `<path>.tmp-<8 random hex digits>`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_FILE_INFIX);
    name.push(format!("{:08x}", rand::random::<u32>()));
    PathBuf::from(name)
}

/// Replaces a file's contents so that no observer ever sees a partial write.
#[cfg_attr(test, automock)]
pub trait AtomicWriter: Send + Sync + 'static {
    fn write_atomic(
        &self,
        path: &Path,
        data: &[u8],
    ) -> Result<()>;
}

/// Temp file + `sync_all` + rename, on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsAtomicWriter {
    sync_parent_dir: bool,
}

impl Default for FsAtomicWriter {
    fn default() -> Self {
        Self {
            sync_parent_dir: true,
        }
    }
}

impl FsAtomicWriter {
    pub fn new(sync_parent_dir: bool) -> Self {
        Self { sync_parent_dir }
    }

    fn write_and_rename(
        &self,
        temp_path: &Path,
        path: &Path,
        data: &[u8],
    ) -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(temp_path, path)
    }

    /// Makes the rename itself durable. The new file is already in place,
    /// so a failure here is only reported.
    fn sync_parent(
        &self,
        path: &Path,
    ) {
        if !self.sync_parent_dir {
            return;
        }
        #[cfg(unix)]
        {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                warn!(?parent, %e, "fsync of parent directory failed after rename");
            }
        }
        #[cfg(not(unix))]
        {
            trace!(?path, "parent directory sync is not supported on this platform");
        }
    }
}

impl AtomicWriter for FsAtomicWriter {
    fn write_atomic(
        &self,
        path: &Path,
        data: &[u8],
    ) -> Result<()> {
        let temp_path = temp_path_for(path);
        trace!(?temp_path, len = data.len(), "writing temp state file");

        if let Err(e) = self.write_and_rename(&temp_path, path, data) {
            remove_temp_file(&temp_path);
            error!(?path, %e, "atomic write failed, state file left untouched");
            return Err(StorageError::PathError {
                path: path.to_path_buf(),
                source: e,
            }
            .into());
        }

        self.sync_parent(path);
        debug!(?path, bytes = data.len(), "state file replaced");
        Ok(())
    }
}

fn remove_temp_file(temp_path: &Path) {
    match fs::remove_file(temp_path) {
        Ok(()) => trace!(?temp_path, "removed temp state file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(?temp_path, %e, "failed to remove temp state file"),
    }
}
