//! Environment-driven application configuration.
//!
//! All knobs come from `BLOG_*` environment variables. The signing secret
//! is the only mandatory one: without it tokens cannot be issued or
//! verified, so a missing secret is fatal outside debug builds.

use std::net::SocketAddr;
use std::time::Duration;
use std::{env, fs};

use tracing::warn;
use uuid::Uuid;

use crate::domain::posts_service::POSTS_BY_AUTHOR_TTL;
use crate::domain::token::DEFAULT_TOKEN_TTL_SECS;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration failures that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("signing secret is not configured; set BLOG_TOKEN_SECRET or BLOG_TOKEN_SECRET_FILE")]
    MissingTokenSecret,
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Bootstrap administrator credentials.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Runtime settings for the server process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub token_secret: String,
    pub token_ttl: chrono::Duration,
    pub cache_ttl: Duration,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BLOG_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|err| ConfigError::Invalid {
                name: "BLOG_BIND_ADDR",
                message: format!("{err}"),
            })?;

        let token_ttl_secs = parse_env("BLOG_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        let cache_ttl_secs = parse_env("BLOG_CACHE_TTL_SECS", POSTS_BY_AUTHOR_TTL.as_secs())?;

        Ok(Self {
            bind_addr,
            token_secret: load_token_secret()?,
            token_ttl: chrono::Duration::seconds(token_ttl_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            admin_seed: load_admin_seed(),
        })
    }
}

fn parse_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|err| ConfigError::Invalid {
            name,
            message: format!("{err}"),
        }),
        Err(_) => Ok(default),
    }
}

fn load_token_secret() -> Result<String, ConfigError> {
    if let Ok(secret) = env::var("BLOG_TOKEN_SECRET") {
        if !secret.is_empty() {
            return Ok(secret);
        }
    }
    if let Ok(path) = env::var("BLOG_TOKEN_SECRET_FILE") {
        return fs::read_to_string(&path)
            .map(|secret| secret.trim().to_owned())
            .map_err(|err| ConfigError::Invalid {
                name: "BLOG_TOKEN_SECRET_FILE",
                message: format!("{path}: {err}"),
            });
    }

    let allow_ephemeral = env::var("BLOG_ALLOW_EPHEMERAL_SECRET").ok().as_deref() == Some("1");
    if cfg!(debug_assertions) || allow_ephemeral {
        // Tokens die with the process; fine for local development.
        warn!("using an ephemeral signing secret (dev only)");
        return Ok(Uuid::new_v4().to_string());
    }
    Err(ConfigError::MissingTokenSecret)
}

fn load_admin_seed() -> Option<AdminSeed> {
    let username = env::var("BLOG_ADMIN_USERNAME").ok()?;
    let email = env::var("BLOG_ADMIN_EMAIL").ok()?;
    let password = env::var("BLOG_ADMIN_PASSWORD").ok()?;
    Some(AdminSeed {
        username,
        email,
        password,
    })
}
