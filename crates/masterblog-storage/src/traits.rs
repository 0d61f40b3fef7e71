//! Storage traits for the blog storage abstraction layer.
//!
//! This module defines the trait that all storage backends must implement.

use async_trait::async_trait;
use masterblog_core::{Comment, CommentDraft, Post, PostDraft, PostPatch};

use crate::error::StorageError;
use crate::types::{ListParams, PostPage, SearchParams};

/// The storage trait that all blog storage backends must implement.
///
/// This trait defines the contract for post CRUD, search and pagination, and
/// comment handling. Implementations must be thread-safe (`Send + Sync`);
/// the server consumes them as `Arc<dyn BlogStorage>`.
///
/// # Example
///
/// ```ignore
/// use masterblog_storage::{BlogStorage, StorageError};
///
/// async fn post_title(storage: &dyn BlogStorage, id: u64) -> Result<String, StorageError> {
///     let post = storage
///         .get_post(id)
///         .await?
///         .ok_or_else(|| StorageError::post_not_found(id))?;
///     Ok(post.title)
/// }
/// ```
#[async_trait]
pub trait BlogStorage: Send + Sync {
    // ==================== Posts ====================

    /// Creates a new post from a validated draft, assigning the next id.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures; a valid draft always
    /// creates a post.
    async fn create_post(&self, draft: PostDraft) -> Result<Post, StorageError>;

    /// Reads a post by id.
    ///
    /// Returns `None` if the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, not for missing posts.
    async fn get_post(&self, id: u64) -> Result<Option<Post>, StorageError>;

    /// Lists posts with optional sorting and pagination.
    ///
    /// Without a sort field, posts come back in creation (id) order. The
    /// returned page always carries the total matching count so callers can
    /// expose it regardless of paging.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn list_posts(&self, params: &ListParams) -> Result<PostPage, StorageError>;

    /// Applies a patch to an existing post and returns the updated post.
    ///
    /// Fields absent from the patch keep their stored values. An empty patch
    /// returns the post unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the post does not exist.
    async fn update_post(&self, id: u64, patch: PostPatch) -> Result<Post, StorageError>;

    /// Deletes a post and all of its comments.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the post does not exist.
    async fn delete_post(&self, id: u64) -> Result<(), StorageError>;

    /// Returns all posts matching the search terms, ascending by id.
    ///
    /// Empty search parameters match nothing and return an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn search_posts(&self, params: &SearchParams) -> Result<Vec<Post>, StorageError>;

    // ==================== Comments ====================

    /// Creates a comment under an existing post.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the post does not exist; no
    /// comment is created in that case.
    async fn create_comment(
        &self,
        post_id: u64,
        draft: CommentDraft,
    ) -> Result<Comment, StorageError>;

    /// Returns all comments of a post, ascending by comment id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the post does not exist.
    async fn list_comments(&self, post_id: u64) -> Result<Vec<Comment>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the number of stored posts.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn count_posts(&self) -> Result<usize, StorageError>;

    /// Returns the number of stored comments across all posts.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn count_comments(&self) -> Result<usize, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
