//! # masterblog-storage
//!
//! Storage abstraction layer for the Masterblog server.
//!
//! This crate defines the traits and types that all storage backends must
//! implement. It does not contain any implementations - those are provided
//! by separate crates.
//!
//! ## Overview
//!
//! The main trait is [`BlogStorage`], which defines the contract for:
//! - Post CRUD operations (create, read, update, delete)
//! - Listing with sorting and pagination
//! - Title/content search
//! - Comments attached to posts
//!
//! ## Example
//!
//! ```ignore
//! use masterblog_storage::{BlogStorage, ListParams, SortField, StorageError};
//!
//! async fn titles_sorted(
//!     storage: &dyn BlogStorage,
//! ) -> Result<Vec<String>, StorageError> {
//!     let params = ListParams::new().with_sort(SortField::Title);
//!     let page = storage.list_posts(&params).await?;
//!     Ok(page.posts.into_iter().map(|p| p.title).collect())
//! }
//! ```

mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::BlogStorage;
pub use types::{
    InvalidSortDirection, InvalidSortField, ListParams, PageParams, PostPage, SearchParams,
    SortDirection, SortField,
};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a boxed storage trait object.
pub type DynStorage = std::sync::Arc<dyn BlogStorage>;
