//! Crash-consistent storage for Raft hard state.
//!
//! [`FileStateStorage`] keeps the whole key/value table in memory and mirrors
//! it to one file. Every `set` rewrites that file through a temp file, `fsync`
//! and an atomic rename before it returns, so after a crash the file holds
//! either the last completed write or the state before it.
//!
//! ```
//! use d_engine_stable_store::{FileStateStorage, StateStorage, StateStorageExt};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = FileStateStorage::open(dir.path().join("s.json")).unwrap();
//!
//! store.set_u64(b"CurrentTerm", 3).unwrap();
//! assert_eq!(store.get_u64(b"CurrentTerm").unwrap(), 3);
//! assert!(store.get(b"LastVoteCand").unwrap_err().is_not_found());
//! ```

mod config;
mod constants;
mod errors;
mod storage;
pub mod utils;

pub use config::*;
pub use constants::STATE_STORAGE_HARD_STATE_KEY;
pub use errors::*;
pub use storage::*;
pub use utils::*;

#[cfg(test)]
mod errors_test;
