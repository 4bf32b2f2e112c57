//! Account model: users, their roles and display names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

/// Validation errors for user attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Display name was blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// Display name shorter than [`DISPLAY_NAME_MIN`].
    #[error("display name must be at least {min} characters")]
    DisplayNameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Display name longer than [`DISPLAY_NAME_MAX`].
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Display name contains characters outside the allowed set.
    #[error("display name may only contain letters, numbers, spaces, or underscores")]
    DisplayNameInvalidCharacters,
    /// Role string is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Authorisation role attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular viewer or creator.
    #[default]
    User,
    /// Platform administrator with access to moderation tooling.
    Admin,
}

impl Role {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole(s.to_owned())),
        }
    }
}

/// Human readable display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the name is blank, too short, too
    /// long or contains disallowed characters.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = display_name.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        let length = value.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_')
        {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    display_name: DisplayName,
    role: Role,
}

impl User {
    /// Build a user from validated parts.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, display_name: DisplayName, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            display_name,
            role,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Public display name.
    #[must_use]
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Authorisation role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada", true)]
    #[case("Ada Lovelace_99", true)]
    #[case("Al", false)]
    #[case("   ", false)]
    #[case("ada!", false)]
    #[case("a_very_long_display_name_exceeding_limit", false)]
    fn display_name_validation(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(DisplayName::new(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("ADMIN", Role::Admin)]
    #[case("user", Role::User)]
    fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    fn role_rejects_unknown_values() {
        assert_eq!(
            "moderator".parse::<Role>(),
            Err(UserValidationError::UnknownRole("moderator".to_owned()))
        );
    }

    #[rstest]
    fn role_serialises_in_upper_case() {
        let value = serde_json::to_value(Role::Admin).expect("serialise role");
        assert_eq!(value, serde_json::json!("ADMIN"));
    }
}
