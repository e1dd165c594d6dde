//! Port interface for the memoized posts-by-author read path.
//!
//! The cache is an injected capability rather than an ambient singleton so
//! tests can supply an isolated instance per case. It is best effort: a
//! miss, an expired entry, or a backend failure only costs a recompute.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::post::Post;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by cache adapters. Callers degrade these to misses.
    pub enum PostListCacheError {
        /// Cache backend is unavailable or its state is unusable.
        Backend { message: String } => "post list cache backend failure: {message}",
    }
}

/// Cache key for one author's post listing.
///
/// Keys pair the query kind with the owning user so a write can evict
/// exactly the entries it affects and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostListCacheKey {
    author: UserId,
}

impl PostListCacheKey {
    /// Key for the posts-by-author query.
    pub fn posts_by_author(author: UserId) -> Self {
        Self { author }
    }

    /// The owning author.
    pub fn author(&self) -> UserId {
        self.author
    }
}

impl fmt::Display for PostListCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "posts_by_author:{}", self.author)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostListCache: Send + Sync {
    /// Read a cached listing if present and not past its expiry.
    async fn get(
        &self,
        key: &PostListCacheKey,
    ) -> Result<Option<Vec<Post>>, PostListCacheError>;

    /// Store a listing with an absolute expiry of now plus `ttl`.
    async fn put(
        &self,
        key: &PostListCacheKey,
        posts: &[Post],
        ttl: Duration,
    ) -> Result<(), PostListCacheError>;

    /// Drop any entry for `key`. Evicting an absent key is a no-op.
    async fn evict(&self, key: &PostListCacheKey) -> Result<(), PostListCacheError>;
}
