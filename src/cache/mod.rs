//! Cache module for keeping the last catalog response available offline
//!
//! The hook stores the raw body of every successful online fetch under a single
//! fixed key and reads it back when the network probe reports no connectivity.
//! Entries never expire and are not keyed by URL.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, CACHE_KEY};
