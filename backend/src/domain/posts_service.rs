//! Post CRUD use-cases and the cache-coherent read layer.
//!
//! The posts-by-author listing is memoized for a short window. Every write
//! that changes an author's listing evicts that author's cache entry after
//! the persistence write and before the operation reports success, so the
//! author always reads their own writes. A reader that started before the
//! eviction may still observe the old value; that is the extent of the
//! guarantee.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::ports::{
    PostListCache, PostListCacheKey, PostPersistenceError, PostRepository,
};
use crate::domain::post::{NewPost, Post, PostDraft, PostId};
use crate::domain::user::{User, UserId};

/// Fixed time-to-live for the posts-by-author listing.
pub const POSTS_BY_AUTHOR_TTL: Duration = Duration::from_secs(60);

/// Post management use-cases.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    cache: Arc<dyn PostListCache>,
    cache_ttl: Duration,
}

impl PostService {
    /// Service over the given repository and cache.
    pub fn new(posts: Arc<dyn PostRepository>, cache: Arc<dyn PostListCache>) -> Self {
        Self {
            posts,
            cache,
            cache_ttl: POSTS_BY_AUTHOR_TTL,
        }
    }

    /// Override the listing ttl.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Author a new post. The caller is the author; the listing cache for
    /// that author is evicted before success is reported.
    pub async fn create(&self, author: &User, draft: PostDraft) -> Result<Post, Error> {
        let record = NewPost::live(author.id(), draft);
        let post = self
            .posts
            .insert(record)
            .await
            .map_err(map_post_persistence)?;
        info!(title = %post.title(), "post created");
        self.evict_author(post.author_id()).await;
        Ok(post)
    }

    /// All posts, soft-deleted ones included.
    pub async fn list(&self) -> Result<Vec<Post>, Error> {
        self.posts.list().await.map_err(map_post_persistence)
    }

    /// Fetch one post by identifier.
    pub async fn get(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_persistence)?
            .ok_or_else(|| Error::not_found("Post not found."))
    }

    /// Posts for one author, served from the cache within the ttl window.
    ///
    /// Cache failures degrade to a repository read: a miss never affects
    /// correctness, only cost.
    pub async fn posts_by_author(&self, author: UserId) -> Result<Vec<Post>, Error> {
        let key = PostListCacheKey::posts_by_author(author);
        match self.cache.get(&key).await {
            Ok(Some(posts)) => return Ok(posts),
            Ok(None) => {}
            Err(err) => warn!(%key, error = %err, "cache read failed"),
        }

        let posts = self
            .posts
            .list_by_author(author)
            .await
            .map_err(map_post_persistence)?;
        if let Err(err) = self.cache.put(&key, &posts, self.cache_ttl).await {
            warn!(%key, error = %err, "cache write failed");
        }
        Ok(posts)
    }

    /// Edit a post. Only the author may act, and the check runs before any
    /// mutation is applied.
    pub async fn update(&self, id: PostId, draft: PostDraft, current: &User) -> Result<Post, Error> {
        let mut post = self.get(id).await?;
        if post.author_id() != current.id() {
            return Err(Error::unauthorized("Unauthorized."));
        }
        post.apply(draft);
        self.posts.save(&post).await.map_err(map_post_persistence)?;
        self.evict_author(post.author_id()).await;
        Ok(post)
    }

    /// Soft-delete a post. Only the author may act.
    pub async fn delete(&self, id: PostId, current: &User) -> Result<(), Error> {
        let mut post = self.get(id).await?;
        if post.author_id() != current.id() {
            return Err(Error::unauthorized("Unauthorized."));
        }
        post.mark_deleted();
        self.posts.save(&post).await.map_err(map_post_persistence)?;
        info!(title = %post.title(), "post deleted");
        self.evict_author(post.author_id()).await;
        Ok(())
    }

    /// Evict one author's cached listing. A failure is logged; the stale
    /// entry still ages out within the ttl window.
    async fn evict_author(&self, author: UserId) {
        let key = PostListCacheKey::posts_by_author(author);
        if let Err(err) = self.cache.evict(&key).await {
            error!(%key, error = %err, "cache eviction failed");
        }
    }
}

fn map_post_persistence(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Conflict { message } => {
            warn!(detail = %message, "post write conflicted");
            Error::conflict("Database conflict.")
        }
        other => {
            error!(error = %other, "post repository failure");
            Error::internal("An error occurred.")
        }
    }
}
