//! Scoped key-value persistence for the visitor's own story additions.
//!
//! The key-value layer knows nothing about stories; `LocalStories` owns the
//! one key that holds the serialized array and heals it when it is corrupt.

pub mod error;
pub mod kv;
pub mod local;

pub use error::{Result, StoreError};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use local::{LocalStories, LOCAL_STORIES_KEY};
