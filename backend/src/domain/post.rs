//! Blog post aggregate.
//!
//! A post belongs to exactly one author; the author reference is immutable
//! after creation and every mutation is gated on it. Posts are soft
//! deleted like users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Maximum length of a post title.
pub const TITLE_MAX: usize = 50;

/// Validation errors returned by the post value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Internal storage-assigned identifier for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw storage key.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw storage key.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated post title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`], trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lifecycle status for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Live,
    Deleted,
}

/// Owned content associated with exactly one author.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: PostId,
    author_id: UserId,
    title: Title,
    content: String,
    status: PostStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Materialize a stored row from an insertion record.
    pub fn from_insert(id: PostId, record: NewPost, at: DateTime<Utc>) -> Self {
        let NewPost {
            author_id,
            title,
            content,
            status,
        } = record;
        Self {
            id,
            author_id,
            title,
            content,
            status,
            created_at: at,
            updated_at: at,
        }
    }

    /// Internal storage identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Owning author. Immutable for the lifetime of the post.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Post title.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Post body.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> PostStatus {
        self.status
    }

    /// Insertion timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace title and body from an edit.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
    }

    /// Transition the post into the `Deleted` status.
    pub fn mark_deleted(&mut self) {
        self.status = PostStatus::Deleted;
    }

    /// Stamp the last-mutation instant. Called by repositories on save.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Insertion record for a post row. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: Title,
    pub content: String,
    pub status: PostStatus,
}

impl NewPost {
    /// Record for freshly authored content.
    pub fn live(author_id: UserId, draft: PostDraft) -> Self {
        Self {
            author_id,
            title: draft.title,
            content: draft.content,
            status: PostStatus::Live,
        }
    }
}

/// Title and body pair used for both creation and edits.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: Title,
    pub content: String,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn sample_post() -> Post {
        let draft = PostDraft {
            title: Title::new("First post").expect("title"),
            content: "hello".to_owned(),
        };
        Post::from_insert(PostId::new(1), NewPost::live(UserId::new(5), draft), Utc::now())
    }

    #[rstest]
    #[case("", PostValidationError::EmptyTitle)]
    #[case("   ", PostValidationError::EmptyTitle)]
    fn rejects_blank_titles(#[case] raw: &str, #[case] expected: PostValidationError) {
        let err = Title::new(raw).expect_err("blank title must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn rejects_overlong_title() {
        let raw = "x".repeat(TITLE_MAX + 1);
        let err = Title::new(raw).expect_err("overlong title must fail");
        assert_eq!(err, PostValidationError::TitleTooLong { max: TITLE_MAX });
    }

    #[rstest]
    fn new_posts_start_live() {
        let post = sample_post();
        assert_eq!(post.status(), PostStatus::Live);
        assert_eq!(post.author_id(), UserId::new(5));
    }

    #[rstest]
    fn apply_edits_title_and_body_but_not_author() {
        let mut post = sample_post();
        post.apply(PostDraft {
            title: Title::new("Edited").expect("title"),
            content: "updated".to_owned(),
        });
        assert_eq!(post.title().as_ref(), "Edited");
        assert_eq!(post.content(), "updated");
        assert_eq!(post.author_id(), UserId::new(5));
    }

    #[rstest]
    fn soft_delete_keeps_the_row_contents() {
        let mut post = sample_post();
        post.mark_deleted();
        assert_eq!(post.status(), PostStatus::Deleted);
        assert_eq!(post.title().as_ref(), "First post");
    }
}
