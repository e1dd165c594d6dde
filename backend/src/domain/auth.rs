//! Authentication payload primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.
//! Passwords are held in zeroizing buffers so plaintext does not linger
//! after the request completes.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{Email, Username};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    MissingEmail,
    /// Password was blank.
    MissingPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEmail => write!(f, "email must not be empty"),
            Self::MissingPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials.
///
/// The email is kept as the raw caller-supplied string: lookup decides
/// whether an account exists, and a malformed address simply fails to match
/// anything.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::MissingEmail);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::MissingPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct Registration {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    /// Combine validated identity values with a non-empty password.
    pub fn new(
        username: Username,
        email: Email,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        if password.is_empty() {
            return Err(CredentialValidationError::MissingPassword);
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested display name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested contact address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password to derive the stored digest from.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialValidationError::MissingEmail)]
    #[case("   ", "pw", CredentialValidationError::MissingEmail)]
    #[case("five@test.email", "", CredentialValidationError::MissingPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn valid_credentials_trim_the_email() {
        let creds = LoginCredentials::try_from_parts("  five@test.email  ", "p1")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), "five@test.email");
        assert_eq!(creds.password(), "p1");
    }

    #[rstest]
    fn registration_rejects_blank_password() {
        let username = Username::new("mozart5").expect("username");
        let email = Email::new("five@test.email").expect("email");
        let err = Registration::new(username, email, "").expect_err("blank password");
        assert_eq!(err, CredentialValidationError::MissingPassword);
    }
}
