// Read-through content cache module
// Author: kelexine (https://github.com/kelexine)

pub mod keys;
pub mod manager;
pub mod models;
pub mod store;

pub use manager::{read_file, read_file_metadata, ContentCache};
pub use models::{CacheStats, CachedValue, FileContent, FileMetadata};
pub use store::{FileStore, KeyValueStore, MemoryStore};
