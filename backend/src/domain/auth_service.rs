//! Login, registration, and the request guard.
//!
//! Identity resolution deliberately degrades to "no identity" instead of
//! erroring: missing header, malformed or expired token, unknown subject,
//! repository failure, and deleted accounts all land on the same `None`,
//! so every authorization decision funnels through one presence check and
//! callers learn nothing about why a credential was rejected.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::auth::{LoginCredentials, Registration};
use crate::domain::credentials::SecretHasher;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::token::TokenService;
use crate::domain::user::{Email, NewUser, User};

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum RegistrationOutcome {
    /// A fresh account was created.
    Registered(User),
    /// The email already belongs to an account; nothing was written.
    AlreadyRegistered,
}

/// Authentication use-cases plus the access-control guard.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    hasher: SecretHasher,
}

impl AuthService {
    /// Service over the given repository, token signer, and hasher.
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService, hasher: SecretHasher) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Validate credentials and issue a bearer token.
    ///
    /// Deleted accounts are indistinguishable from absent ones; only a
    /// live account with a matching secret produces a token.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        let user = match Email::new(credentials.email()) {
            Ok(email) => self
                .users
                .find_by_email(&email)
                .await
                .map_err(map_user_persistence)?,
            // An address that cannot exist matches no account.
            Err(_) => None,
        };
        let user = user
            .filter(|found| !found.is_deleted())
            .ok_or_else(|| Error::unauthorized("User does not exist."))?;

        if !user.verify_secret(&self.hasher, credentials.password()) {
            return Err(Error::forbidden("Wrong password."));
        }

        let token = self.tokens.issue(user.public_id())?;
        info!(username = %user.username(), "user logged in");
        Ok(token)
    }

    /// Register a new account unless the email is already taken.
    pub async fn register(&self, registration: Registration) -> Result<RegistrationOutcome, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_persistence)?;
        if existing.is_some() {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

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
        Ok(RegistrationOutcome::Registered(user))
    }

    /// Resolve the caller's identity from a bearer token.
    pub async fn resolve_identity(&self, token: Option<&str>) -> Option<User> {
        let token = token?;
        let subject = self.tokens.verify(token)?;
        let user = match self.users.find_by_public_id(subject).await {
            Ok(found) => found?,
            Err(err) => {
                warn!(error = %err, "identity lookup failed");
                return None;
            }
        };
        (!user.is_deleted()).then_some(user)
    }

    /// Reject the request unless a live identity is attached.
    pub async fn require_user(&self, token: Option<&str>) -> Result<User, Error> {
        self.resolve_identity(token)
            .await
            .ok_or_else(|| Error::unauthorized("Token is missing or invalid."))
    }

    /// As [`Self::require_user`], and the identity must hold the admin flag.
    pub async fn require_admin(&self, token: Option<&str>) -> Result<User, Error> {
        let user = self.require_user(token).await?;
        if !user.is_admin() {
            return Err(Error::forbidden("User is not an admin."));
        }
        Ok(user)
    }
}

pub(crate) fn map_user_persistence(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Conflict { message } => {
            warn!(detail = %message, "user write conflicted");
            Error::conflict("Database conflict.")
        }
        other => {
            error!(error = %other, "user repository failure");
            Error::internal("An error occurred.")
        }
    }
}
