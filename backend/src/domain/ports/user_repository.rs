//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::user::{Email, NewUser, PublicId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint (username or email) was violated.
        Conflict { message: String } => "user uniqueness violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user; the store assigns id and timestamps.
    async fn insert(&self, record: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by internal identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by public identifier.
    async fn find_by_public_id(
        &self,
        public_id: PublicId,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by unique contact address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// All user rows, soft-deleted ones included.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Write back a mutated user. Uniqueness constraints still apply.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;
}
