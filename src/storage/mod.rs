//! Persistent Raft state: the storage seam and its file-backed implementation.
mod adaptors;
mod hard_state;
mod state_storage;


#[doc(hidden)]
pub use adaptors::*;
pub use hard_state::*;
pub use state_storage::*;
