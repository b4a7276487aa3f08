// -
// State file naming

/// Infix between the canonical path and the random suffix of a temp file
pub(crate) const TEMP_FILE_INFIX: &str = ".tmp-";

/// Default canonical file location
pub(crate) const DEFAULT_STATE_FILE: &str = "./db/stable_store.json";

// -
// Reserved keys

/// Holds the JSON encoded `HardState`
pub const STATE_STORAGE_HARD_STATE_KEY: &str = "_state_storage_hard_state";

// -
// Configuration

pub(crate) const CONFIG_ENV_PREFIX: &str = "STABLE_STORE";
pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
