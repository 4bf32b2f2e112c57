//! UUID-backed identifier newtypes.
//!
//! Each entity gets its own identifier type so a video id can never be passed
//! where a user id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raised when a string is not a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

impl IdParseError {
    /// Human label of the identifier that failed to parse.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident => $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse a canonical UUID string.
            ///
            /// # Errors
            /// Returns [`IdParseError`] when `raw` is not a UUID.
            pub fn parse(raw: &str) -> Result<Self, IdParseError> {
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdParseError { kind: $label })
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

uuid_identifier! {
    /// Registered account identifier.
    UserId => "user id"
}
uuid_identifier! {
    /// Video identifier.
    VideoId => "video id"
}
uuid_identifier! {
    /// Channel identifier.
    ChannelId => "channel id"
}
uuid_identifier! {
    /// Content flag identifier.
    FlagId => "flag id"
}
uuid_identifier! {
    /// Copyright claim identifier.
    ClaimId => "claim id"
}
uuid_identifier! {
    /// Contact submission identifier.
    ContactId => "contact id"
}
uuid_identifier! {
    /// Block record identifier.
    BlockId => "block id"
}
uuid_identifier! {
    /// Ledger transaction identifier.
    TransactionId => "transaction id"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parse_round_trips_through_display() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id = VideoId::parse(raw).expect("valid uuid");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa")]
    fn parse_rejects_malformed_input(#[case] raw: &str) {
        let err = UserId::parse(raw).expect_err("malformed id");
        assert_eq!(err.kind(), "user id");
        assert_eq!(err.to_string(), "user id must be a valid UUID");
    }

    #[rstest]
    fn serde_is_transparent() {
        let id = ChannelId::random();
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
        let back: ChannelId = serde_json::from_value(value).expect("deserialise id");
        assert_eq!(back, id);
    }
}
