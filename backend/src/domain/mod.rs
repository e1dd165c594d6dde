//! Domain model, services, and ports.
//!
//! Everything in this module is transport agnostic: inbound adapters map
//! domain errors onto their own envelopes, and outbound adapters implement
//! the ports. Services own the authorization decisions; repositories and
//! the cache are injected capabilities.

pub mod auth;
pub mod auth_service;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod post;
pub mod posts_service;
pub mod token;
pub mod user;
pub mod users_service;

pub use self::auth::{CredentialValidationError, LoginCredentials, Registration};
pub use self::auth_service::{AuthService, RegistrationOutcome};
pub use self::credentials::{PasswordDigest, SecretHasher};
pub use self::error::{Error, ErrorCode};
pub use self::posts_service::PostService;
pub use self::token::TokenService;
pub use self::users_service::UserService;
