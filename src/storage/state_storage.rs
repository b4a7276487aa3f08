//! Core model in Raft: StateStorage Definition, persistent state: e.g. current_term
//!
#[cfg(test)]
use mockall::automock;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::constants::STATE_STORAGE_HARD_STATE_KEY;
use crate::convert::decode_u64;
use crate::convert::encode_u64;
use crate::Error;
use crate::HardState;
use crate::Result;
use crate::StorageError;

#[cfg_attr(test, automock)]
pub trait StateStorage: Send + Sync + 'static {
    /// Returns the value stored under `key`, or [`Error::NotFound`].
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Vec<u8>>;

    /// Creates, updates or deletes `key` and makes the change durable
    /// before returning.
    ///
    /// An empty `value` deletes the key. On error neither memory nor disk
    /// has changed.
    fn set(
        &self,
        key: &[u8],
        value: &[u8],
    ) -> Result<()>;
}

/// Typed accessors layered on [`StateStorage::get`] and [`StateStorage::set`].
pub trait StateStorageExt: StateStorage {
    /// Like `get`, but for values written by [`StateStorageExt::set_u64`].
    fn get_u64(
        &self,
        key: &[u8],
    ) -> Result<u64> {
        decode_u64(self.get(key)?)
    }

    /// Like `set`, stores `value` as decimal text.
    fn set_u64(
        &self,
        key: &[u8],
        value: u64,
    ) -> Result<()> {
        self.set(key, &encode_u64(value))
    }

    /// When node restarts, check if there is stored state from disk
    fn load_hard_state(&self) -> Result<Option<HardState>> {
        let bytes = match self.get(STATE_STORAGE_HARD_STATE_KEY.as_bytes()) {
            Ok(bytes) => bytes,
            Err(Error::NotFound) => {
                info!("no hard state found with key: {}", STATE_STORAGE_HARD_STATE_KEY);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<HardState>(&bytes) {
            Ok(hard_state) => {
                info!(current_term = hard_state.current_term, "loaded hard state");
                Ok(Some(hard_state))
            }
            Err(e) => {
                error!("hard state deserialize error. {}", e);
                Err(StorageError::Serialization(e).into())
            }
        }
    }

    /// Save role hard state; term and vote are written in one set
    fn save_hard_state(
        &self,
        hard_state: &HardState,
    ) -> Result<()> {
        let bytes = serde_json::to_vec(hard_state).map_err(StorageError::Serialization)?;
        self.set(STATE_STORAGE_HARD_STATE_KEY.as_bytes(), &bytes)?;
        debug!(?hard_state, "hard state persisted");
        Ok(())
    }
}

impl<S: StateStorage + ?Sized> StateStorageExt for S {}
