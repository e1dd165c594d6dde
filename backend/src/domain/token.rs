//! Signed bearer tokens.
//!
//! Tokens are stateless HS256 credentials: there is no session table and no
//! revocation before expiry. Statelessness trades revocability for
//! horizontal scalability; the short validity window bounds the blast
//! radius of a leaked token.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::user::PublicId;

/// Default validity window for issued tokens.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 60;

/// Claims carried by an issued token. `sub` is the user's public
/// identifier; internal storage keys never appear in tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Service signing with `secret` and issuing tokens valid for `ttl`.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Service with the standard 30-minute validity window.
    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Encode a token asserting `subject` until now plus the configured ttl.
    ///
    /// Fails only if encoding itself fails, which indicates a configuration
    /// problem rather than anything about the subject.
    pub fn issue(&self, subject: &PublicId) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("token encoding failed: {err}")))
    }

    /// Decode a token and check signature and expiry.
    ///
    /// Malformed structure, bad signature, elapsed expiry, and an
    /// unparseable subject all collapse to `None`; callers cannot
    /// distinguish why a token was rejected.
    pub fn verify(&self, token: &str) -> Option<PublicId> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: the expiry instant is exact.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).ok()?;
        PublicId::parse(&data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    const SECRET: &[u8] = b"unit-test-signing-secret";

    #[rstest]
    fn issued_tokens_verify_to_the_subject_before_expiry() {
        let service = TokenService::with_default_ttl(SECRET);
        let subject = PublicId::random();

        let token = service.issue(&subject).expect("token");
        assert_eq!(service.verify(&token), Some(subject));
    }

    #[rstest]
    fn expired_tokens_are_invalid() {
        let service = TokenService::new(SECRET, Duration::seconds(-60));
        let subject = PublicId::random();

        let token = service.issue(&subject).expect("token");
        assert_eq!(service.verify(&token), None);
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid() {
        let issuer = TokenService::with_default_ttl(b"original-secret");
        let verifier = TokenService::with_default_ttl(b"rotated-secret");
        let subject = PublicId::random();

        let token = issuer.issue(&subject).expect("token");
        assert_eq!(verifier.verify(&token), None);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("aaaa.bbbb.cccc")]
    fn malformed_tokens_are_invalid(#[case] token: &str) {
        let service = TokenService::with_default_ttl(SECRET);
        assert_eq!(service.verify(token), None);
    }
}
