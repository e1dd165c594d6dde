//! User CRUD use-cases with per-operation ownership checks.
//!
//! The guard only answers who is calling; whether the caller may act on a
//! specific account is decided here, before any mutation is applied. For
//! accounts the owner is the account itself: there is no admin override
//! for profile updates or deletion.

use std::sync::Arc;

use tracing::info;

use crate::domain::Error;
use crate::domain::auth::Registration;
use crate::domain::auth_service::map_user_persistence;
use crate::domain::credentials::SecretHasher;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User, UserId, UserUpdate};

/// User management use-cases.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: SecretHasher,
}

impl UserService {
    /// Service over the given repository and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: SecretHasher) -> Self {
        Self { users, hasher }
    }

    /// Create an account on behalf of an administrator.
    ///
    /// Unlike self-registration there is no pre-check: a duplicate surfaces
    /// as a persistence conflict.
    pub async fn create(&self, registration: Registration) -> Result<User, Error> {
        let digest = self.hasher.digest(registration.password())?;
        let record = NewUser::registration(
            registration.username().clone(),
            registration.email().clone(),
            digest,
        );
        let user = self
            .users
            .insert(record)
            .await
            .map_err(map_user_persistence)?;
        info!(username = %user.username(), "user created");
        Ok(user)
    }

    /// Create the bootstrap administrator unless the email is taken.
    pub async fn ensure_admin(&self, registration: Registration) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_persistence)?;
        if existing.is_some() {
            return Ok(());
        }

        let digest = self.hasher.digest(registration.password())?;
        let record = NewUser::admin(
            registration.username().clone(),
            registration.email().clone(),
            digest,
        );
        let user = self
            .users
            .insert(record)
            .await
            .map_err(map_user_persistence)?;
        info!(username = %user.username(), "administrator seeded");
        Ok(())
    }

    /// All accounts, soft-deleted ones included.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_persistence)
    }

    /// Fetch one account by internal identifier.
    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence)?
            .ok_or_else(|| Error::not_found("User not found."))
    }

    /// Apply a self-service profile update. Only the account owner may act,
    /// and the ownership check runs before the target is even loaded.
    pub async fn update(&self, id: UserId, update: UserUpdate, current: &User) -> Result<User, Error> {
        if current.id() != id {
            return Err(Error::unauthorized("Unauthorized."));
        }
        let mut user = self.get(id).await?;
        if let Some(username) = update.username {
            user.rename(username);
        }
        if let Some(password) = update.password.as_deref() {
            user.replace_digest(self.hasher.digest(password)?);
        }
        self.users.save(&user).await.map_err(map_user_persistence)?;
        Ok(user)
    }

    /// Soft-delete the account. The row survives with `Deleted` status and
    /// stops authenticating.
    pub async fn delete(&self, id: UserId, current: &User) -> Result<(), Error> {
        if current.id() != id {
            return Err(Error::unauthorized("Unauthorized."));
        }
        let mut user = self.get(id).await?;
        user.mark_deleted();
        self.users.save(&user).await.map_err(map_user_persistence)?;
        info!(username = %user.username(), "user deleted");
        Ok(())
    }
}
