//! Core domain types for the Masterblog server.
//!
//! This crate defines the post and comment entities, the draft/patch payload
//! types that validate incoming JSON, and the errors that validation can
//! produce. It is free of any HTTP or storage concerns so every other crate
//! in the workspace can depend on it.

pub mod comment;
pub mod error;
pub mod post;

// Re-export commonly used types
pub use comment::{Comment, CommentDraft};
pub use error::{CoreError, Result};
pub use post::{Post, PostDraft, PostPatch};
