//! User identity aggregate.
//!
//! A user carries two identifiers: the storage-assigned internal id used by
//! foreign keys and ownership checks, and a random public identifier that
//! stands in for the internal key everywhere outside the process (payloads,
//! token subjects). Accounts are soft deleted: the row survives with a
//! `Deleted` status and is excluded from authentication.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::credentials::{PasswordDigest, SecretHasher};

/// Maximum length of a display name.
pub const USERNAME_MAX: usize = 80;
/// Maximum length of a contact email.
pub const EMAIL_MAX: usize = 100;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    EmptyEmail,
    EmailMissingAtSign,
    EmailTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailMissingAtSign => write!(f, "email must contain an @ sign"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Internal storage-assigned identifier. Stable and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw storage key.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw storage key.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Random public identifier exposed in place of the internal id.
///
/// Immutable once assigned; token subjects reference this value so that
/// storage keys never leak through the authentication surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicId(Uuid);

impl PublicId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique contact address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`], trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !trimmed.contains('@') {
            return Err(UserValidationError::EmailMissingAtSign);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lifecycle status. Deletion is a status transition, not row removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Deleted,
}

/// Application user.
///
/// ## Invariants
/// - `public_id` never changes after construction.
/// - The password digest is write-only: it can be replaced through
///   [`User::replace_digest`] and checked through [`User::verify_secret`],
///   but no accessor exposes it.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    public_id: PublicId,
    username: Username,
    email: Email,
    digest: PasswordDigest,
    admin: bool,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Materialize a stored row from an insertion record.
    ///
    /// Repositories call this once the store has assigned an id; both
    /// timestamps start at the insertion instant.
    pub fn from_insert(id: UserId, record: NewUser, at: DateTime<Utc>) -> Self {
        let NewUser {
            public_id,
            username,
            email,
            digest,
            admin,
            status,
        } = record;
        Self {
            id,
            public_id,
            username,
            email,
            digest,
            admin,
            status,
            created_at: at,
            updated_at: at,
        }
    }

    /// Internal storage identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Public identifier used in payloads and token subjects.
    pub fn public_id(&self) -> &PublicId {
        &self.public_id
    }

    /// Display name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Whether the account holds administrative privileges.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Current lifecycle status.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Whether the account has been soft deleted.
    pub fn is_deleted(&self) -> bool {
        self.status == UserStatus::Deleted
    }

    /// Insertion timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check a plaintext secret against the stored digest.
    pub fn verify_secret(&self, hasher: &SecretHasher, plaintext: &str) -> bool {
        hasher.verify(&self.digest, plaintext)
    }

    /// Replace the display name.
    pub fn rename(&mut self, username: Username) {
        self.username = username;
    }

    /// Replace the stored digest with a freshly derived one.
    pub fn replace_digest(&mut self, digest: PasswordDigest) {
        self.digest = digest;
    }

    /// Transition the account into the `Deleted` status.
    pub fn mark_deleted(&mut self) {
        self.status = UserStatus::Deleted;
    }

    /// Stamp the last-mutation instant. Called by repositories on save.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Insertion record for a user row. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub public_id: PublicId,
    pub username: Username,
    pub email: Email,
    pub digest: PasswordDigest,
    pub admin: bool,
    pub status: UserStatus,
}

impl NewUser {
    /// Record for a self-registered account: active, no admin flag, fresh
    /// public identifier.
    pub fn registration(username: Username, email: Email, digest: PasswordDigest) -> Self {
        Self {
            public_id: PublicId::random(),
            username,
            email,
            digest,
            admin: false,
            status: UserStatus::Active,
        }
    }

    /// Record for a bootstrap administrator account.
    pub fn admin(username: Username, email: Email, digest: PasswordDigest) -> Self {
        Self {
            admin: true,
            ..Self::registration(username, email, digest)
        }
    }
}

/// Self-service profile changes. Absent fields are left untouched.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub username: Option<Username>,
    pub password: Option<Zeroizing<String>>,
}
