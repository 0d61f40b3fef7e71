use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use masterblog_core::{Comment, CommentDraft, Post, PostDraft, PostPatch};
use masterblog_storage::{
    BlogStorage, ListParams, PostPage, SearchParams, SortDirection, SortField, StorageError,
};
use papaya::HashMap as PapayaHashMap;

/// In-memory blog storage backend using papaya lock-free HashMap.
///
/// This storage implementation provides:
/// - Lock-free concurrent access via papaya::HashMap
/// - Full post CRUD with sorting and pagination
/// - Case-insensitive substring search over title and content
/// - Comments with cascade deletion when their post is removed
///
/// Ids are allocated from atomic counters, so they are unique for the
/// lifetime of the process and never reused after a delete.
#[derive(Debug)]
pub struct InMemoryStorage {
    /// Posts keyed by post id
    posts: PapayaHashMap<u64, Post>,
    /// Comments keyed by comment id
    comments: PapayaHashMap<u64, Comment>,
    /// Atomic counter for the next post id
    next_post_id: AtomicU64,
    /// Atomic counter for the next comment id
    next_comment_id: AtomicU64,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: PapayaHashMap::new(),
            comments: PapayaHashMap::new(),
            next_post_id: AtomicU64::new(1),
            next_comment_id: AtomicU64::new(1),
        }
    }

    fn next_post_id(&self) -> u64 {
        self.next_post_id.fetch_add(1, Ordering::SeqCst)
    }

    fn next_comment_id(&self) -> u64 {
        self.next_comment_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Clones all posts out of the map in creation (id) order.
    fn collect_posts(&self) -> Vec<Post> {
        let guard = self.posts.pin();
        let mut posts: Vec<Post> = guard.iter().map(|(_, post)| post.clone()).collect();
        posts.sort_by_key(|post| post.id);
        posts
    }

    /// Sorts posts by the given field and direction, breaking ties by
    /// ascending id so ordering is deterministic.
    fn sort_posts(posts: &mut [Post], field: SortField, direction: SortDirection) {
        posts.sort_by(|a, b| {
            let comparison = match field {
                SortField::Title => a.title.cmp(&b.title),
                SortField::Content => a.content.cmp(&b.content),
            };
            let comparison = match direction {
                SortDirection::Asc => comparison,
                SortDirection::Desc => comparison.reverse(),
            };
            comparison.then_with(|| a.id.cmp(&b.id))
        });
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogStorage for InMemoryStorage {
    async fn create_post(&self, draft: PostDraft) -> Result<Post, StorageError> {
        let post = Post::new(self.next_post_id(), draft);
        let guard = self.posts.pin();
        guard.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: u64) -> Result<Option<Post>, StorageError> {
        let guard = self.posts.pin();
        Ok(guard.get(&id).cloned())
    }

    async fn list_posts(&self, params: &ListParams) -> Result<PostPage, StorageError> {
        let mut posts = self.collect_posts();

        if let Some(field) = params.sort {
            Self::sort_posts(&mut posts, field, params.direction);
        }

        let total = posts.len();

        match params.page {
            Some(page) => {
                let offset = page.offset();
                let page_posts = if offset < total {
                    posts.into_iter().skip(offset).take(page.limit).collect()
                } else {
                    Vec::new()
                };
                Ok(PostPage::new(total, page_posts, offset))
            }
            None => Ok(PostPage::new(total, posts, 0)),
        }
    }

    async fn update_post(&self, id: u64, patch: PostPatch) -> Result<Post, StorageError> {
        let guard = self.posts.pin();
        let existing = guard
            .get(&id)
            .ok_or_else(|| StorageError::post_not_found(id))?;

        if patch.is_empty() {
            return Ok(existing.clone());
        }

        // Clone-modify-insert; concurrent updates to the same post are
        // last-writer-wins, like the rest of the map operations.
        let mut updated = existing.clone();
        updated.apply_patch(patch);
        guard.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_post(&self, id: u64) -> Result<(), StorageError> {
        let guard = self.posts.pin();
        if guard.remove(&id).is_none() {
            return Err(StorageError::post_not_found(id));
        }

        // Cascade: drop every comment that referenced the removed post.
        let comments_guard = self.comments.pin();
        let orphaned: Vec<u64> = comments_guard
            .iter()
            .filter(|(_, comment)| comment.post_id == id)
            .map(|(comment_id, _)| *comment_id)
            .collect();
        for comment_id in orphaned {
            comments_guard.remove(&comment_id);
        }

        Ok(())
    }

    async fn search_posts(&self, params: &SearchParams) -> Result<Vec<Post>, StorageError> {
        if params.is_empty() {
            return Ok(Vec::new());
        }

        let guard = self.posts.pin();
        let mut matching: Vec<Post> = guard
            .iter()
            .filter(|(_, post)| params.matches(post))
            .map(|(_, post)| post.clone())
            .collect();
        matching.sort_by_key(|post| post.id);
        Ok(matching)
    }

    async fn create_comment(
        &self,
        post_id: u64,
        draft: CommentDraft,
    ) -> Result<Comment, StorageError> {
        let posts_guard = self.posts.pin();
        if posts_guard.get(&post_id).is_none() {
            return Err(StorageError::post_not_found(post_id));
        }

        let comment = Comment::new(self.next_comment_id(), post_id, draft);
        let guard = self.comments.pin();
        guard.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: u64) -> Result<Vec<Comment>, StorageError> {
        let posts_guard = self.posts.pin();
        if posts_guard.get(&post_id).is_none() {
            return Err(StorageError::post_not_found(post_id));
        }

        let guard = self.comments.pin();
        let mut comments: Vec<Comment> = guard
            .iter()
            .filter(|(_, comment)| comment.post_id == post_id)
            .map(|(_, comment)| comment.clone())
            .collect();
        comments.sort_by_key(|comment| comment.id);
        Ok(comments)
    }

    async fn count_posts(&self) -> Result<usize, StorageError> {
        let guard = self.posts.pin();
        Ok(guard.len())
    }

    async fn count_comments(&self) -> Result<usize, StorageError> {
        let guard = self.comments.pin();
        Ok(guard.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
