//! Configuration management for the stable store.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support (`CONFIG_PATH` or an explicit override file)
//! - Environment variable overrides (`STABLE_STORE__` prefix, highest priority)
//! - Deferred validation via `validate()`
mod storage;
pub use storage::*;
