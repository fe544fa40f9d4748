// Cache module for local filesystem caching.
// Stores the feature configuration and developer toggles across restarts.

pub mod paths;
pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, load_json, save_json};
