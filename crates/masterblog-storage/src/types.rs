//! Storage types for the blog storage abstraction layer.
//!
//! This module defines the query, pagination and result types used by the
//! storage traits.

use std::fmt;
use std::str::FromStr;

use masterblog_core::Post;
use serde::{Deserialize, Serialize};

/// A post field that listings can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Sort by post title.
    Title,
    /// Sort by post content.
    Content,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// Error returned when a sort field name is not recognized.
///
/// The `Display` text is the exact message clients see in 400 responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort field: {0}")]
pub struct InvalidSortField(pub String);

impl FromStr for SortField {
    type Err = InvalidSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            other => Err(InvalidSortField(other.to_string())),
        }
    }
}

/// Direction applied to a sorted listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Error returned when a sort direction is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort direction: {0}")]
pub struct InvalidSortDirection(pub String);

impl FromStr for SortDirection {
    type Err = InvalidSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(InvalidSortDirection(other.to_string())),
        }
    }
}

/// A single page request: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number.
    pub number: usize,
    /// Maximum number of posts in the page.
    pub limit: usize,
}

impl PageParams {
    /// Creates a new `PageParams`. `number` is 1-based.
    #[must_use]
    pub fn new(number: usize, limit: usize) -> Self {
        Self { number, limit }
    }

    /// Returns the number of posts to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Parameters for listing posts.
///
/// With the defaults, listing returns every post in creation (id) order
/// without paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Field to sort by; `None` keeps creation order.
    pub sort: Option<SortField>,
    /// Direction applied when `sort` is set.
    pub direction: SortDirection,
    /// Page to return; `None` returns all matching posts.
    pub page: Option<PageParams>,
}

impl ListParams {
    /// Creates parameters for an unsorted, unpaged listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort field.
    #[must_use]
    pub fn with_sort(mut self, field: SortField) -> Self {
        self.sort = Some(field);
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the page to return.
    #[must_use]
    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

/// Parameters for searching posts by title and/or content substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Substring the title must contain (case-insensitive).
    pub title: Option<String>,
    /// Substring the content must contain (case-insensitive).
    pub content: Option<String>,
}

impl SearchParams {
    /// Creates search parameters. Empty strings are normalized to `None`,
    /// matching how absent query parameters behave.
    #[must_use]
    pub fn new(title: Option<String>, content: Option<String>) -> Self {
        Self {
            title: normalize(title),
            content: normalize(content),
        }
    }

    /// Returns `true` when no search terms are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Checks whether a post matches every present search term.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        contains_term(&post.title, self.title.as_deref())
            && contains_term(&post.content, self.content.as_deref())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn contains_term(value: &str, term: Option<&str>) -> bool {
    match term {
        Some(term) => value.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

/// One page of posts with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    /// Total number of posts matching the listing, across all pages.
    pub total: usize,
    /// Posts in this page.
    pub posts: Vec<Post>,
    /// Offset of the first post in this page.
    pub offset: usize,
    /// Whether there are more posts after this page.
    pub has_more: bool,
}

impl PostPage {
    /// Creates a page, computing `has_more` from the offset and total.
    #[must_use]
    pub fn new(total: usize, posts: Vec<Post>, offset: usize) -> Self {
        let has_more = offset + posts.len() < total;
        Self {
            total,
            posts,
            offset,
            has_more,
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            posts: Vec::new(),
            offset: 0,
            has_more: false,
        }
    }

    /// Returns the number of posts in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns true if this page contains no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
