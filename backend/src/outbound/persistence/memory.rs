//! Process-local persistence adapters.
//!
//! Back the repository ports with `RwLock`-guarded maps: ids are assigned
//! from a monotonic counter and never reused, timestamps are stamped from
//! the injected clock, and uniqueness constraints surface as `Conflict`
//! just like a database unique index would. Concurrent writers to the same
//! resource are serialized by the lock; there is no automatic retry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    PostPersistenceError, PostRepository, UserPersistenceError, UserRepository,
};
use crate::domain::post::{NewPost, Post, PostId};
use crate::domain::user::{Email, NewUser, PublicId, User, UserId};

/// In-memory user table.
pub struct InMemoryUserRepository {
    clock: Arc<dyn Clock>,
    inner: RwLock<UserTable>,
}

#[derive(Default)]
struct UserTable {
    rows: HashMap<i64, User>,
    last_id: i64,
}

impl InMemoryUserRepository {
    /// Empty table stamping timestamps from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: RwLock::new(UserTable::default()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: NewUser) -> Result<User, UserPersistenceError> {
        let now = self.clock.utc();
        let mut table = self
            .inner
            .write()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))?;
        let clash = table
            .rows
            .values()
            .any(|row| row.username() == &record.username || row.email() == &record.email);
        if clash {
            return Err(UserPersistenceError::conflict(format!(
                "username {} or email {} already taken",
                record.username, record.email
            )));
        }
        table.last_id += 1;
        let user = User::from_insert(UserId::new(table.last_id), record, now);
        table.rows.insert(user.id().get(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))?;
        Ok(table.rows.get(&id.get()).cloned())
    }

    async fn find_by_public_id(
        &self,
        public_id: PublicId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))?;
        Ok(table
            .rows
            .values()
            .find(|row| row.public_id() == &public_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))?;
        Ok(table.rows.values().find(|row| row.email() == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))?;
        let mut rows: Vec<User> = table.rows.values().cloned().collect();
        rows.sort_by_key(User::id);
        Ok(rows)
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let now = self.clock.utc();
        let mut table = self
            .inner
            .write()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))?;
        if !table.rows.contains_key(&user.id().get()) {
            return Err(UserPersistenceError::query(format!(
                "user {} does not exist",
                user.id()
            )));
        }
        let clash = table.rows.values().any(|row| {
            row.id() != user.id()
                && (row.username() == user.username() || row.email() == user.email())
        });
        if clash {
            return Err(UserPersistenceError::conflict(format!(
                "username {} or email {} already taken",
                user.username(),
                user.email()
            )));
        }
        let mut stored = user.clone();
        stored.touch(now);
        table.rows.insert(stored.id().get(), stored);
        Ok(())
    }
}

/// In-memory post table.
pub struct InMemoryPostRepository {
    clock: Arc<dyn Clock>,
    inner: RwLock<PostTable>,
}

#[derive(Default)]
struct PostTable {
    rows: HashMap<i64, Post>,
    last_id: i64,
}

impl InMemoryPostRepository {
    /// Empty table stamping timestamps from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: RwLock::new(PostTable::default()),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, record: NewPost) -> Result<Post, PostPersistenceError> {
        let now = self.clock.utc();
        let mut table = self
            .inner
            .write()
            .map_err(|_| PostPersistenceError::connection("post table lock poisoned"))?;
        table.last_id += 1;
        let post = Post::from_insert(PostId::new(table.last_id), record, now);
        table.rows.insert(post.id().get(), post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| PostPersistenceError::connection("post table lock poisoned"))?;
        Ok(table.rows.get(&id.get()).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, PostPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| PostPersistenceError::connection("post table lock poisoned"))?;
        let mut rows: Vec<Post> = table.rows.values().cloned().collect();
        rows.sort_by_key(Post::id);
        Ok(rows)
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Post>, PostPersistenceError> {
        let table = self
            .inner
            .read()
            .map_err(|_| PostPersistenceError::connection("post table lock poisoned"))?;
        let mut rows: Vec<Post> = table
            .rows
            .values()
            .filter(|row| row.author_id() == author)
            .cloned()
            .collect();
        rows.sort_by_key(Post::id);
        Ok(rows)
    }

    async fn save(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let now = self.clock.utc();
        let mut table = self
            .inner
            .write()
            .map_err(|_| PostPersistenceError::connection("post table lock poisoned"))?;
        if !table.rows.contains_key(&post.id().get()) {
            return Err(PostPersistenceError::query(format!(
                "post {} does not exist",
                post.id()
            )));
        }
        let mut stored = post.clone();
        stored.touch(now);
        table.rows.insert(stored.id().get(), stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use mockable::DefaultClock;
    use rstest::rstest;

    use super::*;
    use crate::domain::credentials::SecretHasher;
    use crate::domain::post::{PostDraft, Title};
    use crate::domain::user::{UserStatus, Username};

    fn user_record(name: &str, email: &str) -> NewUser {
        let hasher = SecretHasher::default();
        NewUser {
            public_id: PublicId::random(),
            username: Username::new(name).expect("username"),
            email: Email::new(email).expect("email"),
            digest: hasher.digest("p1").expect("digest"),
            admin: false,
            status: UserStatus::Active,
        }
    }

    fn post_record(author: i64, title: &str) -> NewPost {
        NewPost::live(
            UserId::new(author),
            PostDraft {
                title: Title::new(title).expect("title"),
                content: "body".to_owned(),
            },
        )
    }

    fn user_repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::new(DefaultClock))
    }

    fn post_repo() -> InMemoryPostRepository {
        InMemoryPostRepository::new(Arc::new(DefaultClock))
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_assigned_monotonically() {
        let repo = user_repo();
        let first = repo
            .insert(user_record("mozart5", "five@test.email"))
            .await
            .expect("insert");
        let second = repo
            .insert(user_record("salieri", "six@test.email"))
            .await
            .expect("insert");
        assert_eq!(first.id(), UserId::new(1));
        assert_eq!(second.id(), UserId::new(2));
    }

    #[rstest]
    #[case("mozart5", "other@test.email")]
    #[case("other", "five@test.email")]
    #[tokio::test]
    async fn duplicate_unique_fields_conflict(#[case] name: &str, #[case] email: &str) {
        let repo = user_repo();
        repo.insert(user_record("mozart5", "five@test.email"))
            .await
            .expect("insert");

        let err = repo
            .insert(user_record(name, email))
            .await
            .expect_err("duplicate must conflict");
        assert!(matches!(err, UserPersistenceError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn save_rejects_renames_onto_a_taken_username() {
        let repo = user_repo();
        repo.insert(user_record("mozart5", "five@test.email"))
            .await
            .expect("insert");
        let mut second = repo
            .insert(user_record("salieri", "six@test.email"))
            .await
            .expect("insert");

        second.rename(Username::new("mozart5").expect("username"));
        let err = repo.save(&second).await.expect_err("rename must conflict");
        assert!(matches!(err, UserPersistenceError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_cover_every_unique_field() {
        let repo = user_repo();
        let stored = repo
            .insert(user_record("mozart5", "five@test.email"))
            .await
            .expect("insert");

        let by_id = repo.find_by_id(stored.id()).await.expect("query");
        let by_public = repo
            .find_by_public_id(*stored.public_id())
            .await
            .expect("query");
        let by_email = repo
            .find_by_email(&Email::new("five@test.email").expect("email"))
            .await
            .expect("query");
        assert_eq!(by_id.map(|u| u.id()), Some(stored.id()));
        assert_eq!(by_public.map(|u| u.id()), Some(stored.id()));
        assert_eq!(by_email.map(|u| u.id()), Some(stored.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn saved_mutations_are_visible_and_stamped() {
        let repo = user_repo();
        let mut user = repo
            .insert(user_record("mozart5", "five@test.email"))
            .await
            .expect("insert");

        user.mark_deleted();
        repo.save(&user).await.expect("save");

        let reloaded = repo
            .find_by_id(user.id())
            .await
            .expect("query")
            .expect("row present");
        assert!(reloaded.is_deleted());
        assert!(reloaded.updated_at() >= reloaded.created_at());
    }

    #[rstest]
    #[tokio::test]
    async fn author_listings_are_filtered_and_ordered() {
        let repo = post_repo();
        repo.insert(post_record(5, "First")).await.expect("insert");
        repo.insert(post_record(6, "Other")).await.expect("insert");
        repo.insert(post_record(5, "Second")).await.expect("insert");

        let listing = repo.list_by_author(UserId::new(5)).await.expect("query");
        let titles: Vec<&str> = listing.iter().map(|p| p.title().as_ref()).collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[rstest]
    #[tokio::test]
    async fn saving_an_unknown_post_is_a_query_error() {
        let repo = post_repo();
        let phantom = Post::from_insert(
            PostId::new(99),
            post_record(5, "Phantom"),
            chrono::Utc::now(),
        );

        let err = repo.save(&phantom).await.expect_err("unknown row");
        assert!(matches!(err, PostPersistenceError::Query { .. }));
    }
}
