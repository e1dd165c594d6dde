//! Bearer-token extraction for HTTP handlers.
//!
//! Extraction never fails: a missing or unreadable header yields an empty
//! token and the guard decides the outcome. That keeps every
//! authentication failure on one path with one fixed message.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use futures_util::future::{Ready, ready};

/// Raw bearer credential lifted from the `Authorization` header.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(Option<String>);

impl BearerToken {
    /// The token string, with any `Bearer ` scheme prefix removed.
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_header(raw: Option<&str>) -> Self {
        let token = raw
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);
        Self(token)
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(Ok(Self::from_header(raw)))
    }
}
