//! Login credentials and password digests.
//!
//! Handlers turn raw request strings into [`LoginCredentials`] before calling
//! the login port, so blank input never reaches persistence.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Raised when a login payload is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated username and password pair.
///
/// The password is held in zeroizing storage and is never trimmed.
///
/// # Examples
/// ```
/// use vidhub::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").expect("valid");
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw username and password input.
    ///
    /// # Errors
    /// Returns [`LoginValidationError`] for blank fields.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: trimmed.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised username used for lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Raw password as supplied.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether the password matches a stored hex digest.
    #[must_use]
    pub fn matches_digest(&self, stored_hex: &str) -> bool {
        password_digest(self.password()).eq_ignore_ascii_case(stored_hex)
    }
}

/// Lower-case hex SHA-256 digest of a password, as stored in the user table.
#[must_use]
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
