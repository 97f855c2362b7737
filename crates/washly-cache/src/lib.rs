//! Type-safe Key-Value storage layer for the Washly storefront.
//!
//! Provides a simple, ergonomic API for keeping data in a local key-value
//! store with automatic JSON serialization. Two stores ship with the crate:
//! [`MemoryStore`] for a single session and [`FileStore`] for state that has
//! to survive a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use washly_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".washly")?);
//!
//! // Store a value
//! cache.set("pendingBooking", &draft)?;
//!
//! // Retrieve a value
//! let draft: Option<PendingBooking> = cache.get("pendingBooking")?;
//!
//! // Delete a value
//! cache.delete("pendingBooking")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
