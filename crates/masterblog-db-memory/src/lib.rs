//! In-memory blog storage backend for the Masterblog server.
//!
//! This crate provides an in-memory implementation of the `BlogStorage` trait
//! from `masterblog-storage`, using papaya lock-free HashMap for concurrent
//! access.
//!
//! # Example
//!
//! ```ignore
//! use masterblog_core::PostDraft;
//! use masterblog_db_memory::InMemoryStorage;
//! use masterblog_storage::BlogStorage;
//!
//! let storage = InMemoryStorage::new();
//! let post = storage
//!     .create_post(PostDraft::new("First post", "Hello world"))
//!     .await?;
//! assert_eq!(post.id, 1);
//! ```

pub mod storage;

// Re-export the BlogStorage trait for convenience
pub use masterblog_storage::{BlogStorage, StorageError};
pub use storage::InMemoryStorage;

/// Type alias for a shareable BlogStorage instance.
pub type DynBlogStorage = std::sync::Arc<dyn BlogStorage>;

/// Creates a new in-memory BlogStorage instance.
#[must_use]
pub fn create_storage() -> DynBlogStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
