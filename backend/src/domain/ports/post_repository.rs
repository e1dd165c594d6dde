//! Port abstraction for post persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::post::{NewPost, Post, PostId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// A storage-level constraint was violated.
        Conflict { message: String } => "post constraint violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post; the store assigns id and timestamps.
    async fn insert(&self, record: NewPost) -> Result<Post, PostPersistenceError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// All post rows, soft-deleted ones included.
    async fn list(&self) -> Result<Vec<Post>, PostPersistenceError>;

    /// All posts owned by one author.
    async fn list_by_author(&self, author: UserId) -> Result<Vec<Post>, PostPersistenceError>;

    /// Write back a mutated post.
    async fn save(&self, post: &Post) -> Result<(), PostPersistenceError>;
}
