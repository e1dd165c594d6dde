//! In-process TTL cache adapter for the posts-by-author read path.
//!
//! Entries carry an absolute expiry computed from the injected clock; an
//! entry past its expiry is a miss. The `RwLock` gives sequential
//! consistency per key: once an eviction returns, subsequently issued
//! reads on that key cannot observe the evicted entry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::ports::{PostListCache, PostListCacheError, PostListCacheKey};
use crate::domain::post::Post;

/// Keyed in-memory store with per-entry absolute expiries.
pub struct InMemoryPostListCache {
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<PostListCacheKey, CacheEntry>>,
}

struct CacheEntry {
    expires_at: DateTime<Utc>,
    posts: Vec<Post>,
}

impl InMemoryPostListCache {
    /// Empty cache reading the current instant from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PostListCache for InMemoryPostListCache {
    async fn get(
        &self,
        key: &PostListCacheKey,
    ) -> Result<Option<Vec<Post>>, PostListCacheError> {
        let now = self.clock.utc();
        let entries = self
            .entries
            .read()
            .map_err(|_| PostListCacheError::backend("cache lock poisoned"))?;
        Ok(entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.posts.clone()))
    }

    async fn put(
        &self,
        key: &PostListCacheKey,
        posts: &[Post],
        ttl: Duration,
    ) -> Result<(), PostListCacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|err| PostListCacheError::backend(format!("ttl out of range: {err}")))?;
        let expires_at = self.clock.utc() + ttl;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PostListCacheError::backend("cache lock poisoned"))?;
        entries.insert(
            *key,
            CacheEntry {
                expires_at,
                posts: posts.to_vec(),
            },
        );
        Ok(())
    }

    async fn evict(&self, key: &PostListCacheKey) -> Result<(), PostListCacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PostListCacheError::backend("cache lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::rstest;

    use super::*;
    use crate::domain::post::{NewPost, PostDraft, PostId, Title};
    use crate::domain::user::UserId;

    fn cache() -> InMemoryPostListCache {
        InMemoryPostListCache::new(Arc::new(DefaultClock))
    }

    fn key(author: i64) -> PostListCacheKey {
        PostListCacheKey::posts_by_author(UserId::new(author))
    }

    fn posts(author: i64, title: &str) -> Vec<Post> {
        let draft = PostDraft {
            title: Title::new(title).expect("title"),
            content: "body".to_owned(),
        };
        vec![Post::from_insert(
            PostId::new(1),
            NewPost::live(UserId::new(author), draft),
            Utc::now(),
        )]
    }

    #[rstest]
    #[tokio::test]
    async fn entries_are_served_within_their_ttl() {
        let cache = cache();
        let listing = posts(5, "Cached");
        cache
            .put(&key(5), &listing, Duration::from_secs(60))
            .await
            .expect("put");

        let hit = cache.get(&key(5)).await.expect("get");
        assert_eq!(hit, Some(listing));
    }

    #[rstest]
    #[tokio::test]
    async fn entries_expire_once_their_ttl_elapses() {
        let cache = cache();
        cache
            .put(&key(5), &posts(5, "Stale"), Duration::ZERO)
            .await
            .expect("put");

        let hit = cache.get(&key(5)).await.expect("get");
        assert_eq!(hit, None);
    }

    #[rstest]
    #[tokio::test]
    async fn keys_do_not_bleed_into_each_other() {
        let cache = cache();
        cache
            .put(&key(5), &posts(5, "Mine"), Duration::from_secs(60))
            .await
            .expect("put");

        let other = cache.get(&key(6)).await.expect("get");
        assert_eq!(other, None);
    }

    #[rstest]
    #[tokio::test]
    async fn eviction_is_idempotent() {
        let cache = cache();
        cache
            .put(&key(5), &posts(5, "Gone"), Duration::from_secs(60))
            .await
            .expect("put");

        cache.evict(&key(5)).await.expect("first eviction");
        cache.evict(&key(5)).await.expect("second eviction");
        assert_eq!(cache.get(&key(5)).await.expect("get"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn a_fresh_put_overwrites_the_previous_entry() {
        let cache = cache();
        cache
            .put(&key(5), &posts(5, "Old"), Duration::from_secs(60))
            .await
            .expect("put");
        let newer = posts(5, "New");
        cache
            .put(&key(5), &newer, Duration::from_secs(60))
            .await
            .expect("put");

        let hit = cache.get(&key(5)).await.expect("get");
        assert_eq!(hit, Some(newer));
    }
}
