mod file_state_storage;


pub use file_state_storage::*;
