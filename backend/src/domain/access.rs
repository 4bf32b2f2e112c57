//! Composable authorisation rules.
//!
//! Every privileged path evaluates one [`AccessRule`] against the caller's
//! [`Principal`]: the admin scope guard uses `AccessRule::role(Role::Admin)`,
//! ownership checks use `AccessRule::owned_by(owner)`, and rules combine with
//! [`AccessRule::and`] and [`AccessRule::or`].

use super::{Error, Role, UserId};

/// Authenticated caller as recorded in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    role: Role,
}

impl Principal {
    /// Build a principal from a user id and role.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Caller's user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Predicate over a principal.
///
/// # Examples
/// ```
/// use vidhub::domain::{AccessRule, Principal, Role, UserId};
///
/// let owner = UserId::random();
/// let rule = AccessRule::owned_by(owner).or(AccessRule::role(Role::Admin));
/// assert!(rule.permits(&Principal::new(owner, Role::User)));
/// assert!(rule.permits(&Principal::new(UserId::random(), Role::Admin)));
/// assert!(!rule.permits(&Principal::new(UserId::random(), Role::User)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    /// Any signed-in caller.
    Authenticated,
    /// Caller must hold the role.
    Role(Role),
    /// Caller must be the given user.
    Owner(UserId),
    /// Every nested rule must pass.
    AllOf(Vec<AccessRule>),
    /// At least one nested rule must pass.
    AnyOf(Vec<AccessRule>),
}

impl AccessRule {
    /// Rule satisfied by any signed-in caller.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self::Authenticated
    }

    /// Rule satisfied by callers holding `role`.
    #[must_use]
    pub const fn role(role: Role) -> Self {
        Self::Role(role)
    }

    /// Rule satisfied only by `owner`.
    #[must_use]
    pub const fn owned_by(owner: UserId) -> Self {
        Self::Owner(owner)
    }

    /// Require both this rule and `other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::AllOf(mut rules) => {
                rules.push(other);
                Self::AllOf(rules)
            }
            rule => Self::AllOf(vec![rule, other]),
        }
    }

    /// Require this rule or `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::AnyOf(mut rules) => {
                rules.push(other);
                Self::AnyOf(rules)
            }
            rule => Self::AnyOf(vec![rule, other]),
        }
    }

    /// Evaluate the rule for a signed-in caller.
    #[must_use]
    pub fn permits(&self, principal: &Principal) -> bool {
        match self {
            Self::Authenticated => true,
            Self::Role(role) => principal.role() == *role,
            Self::Owner(owner) => principal.user_id() == *owner,
            Self::AllOf(rules) => rules.iter().all(|rule| rule.permits(principal)),
            Self::AnyOf(rules) => rules.iter().any(|rule| rule.permits(principal)),
        }
    }

    /// Evaluate the rule for an optional caller.
    ///
    /// # Errors
    /// Returns `401` when there is no caller and `403` when the rule denies.
    pub fn authorize(&self, principal: Option<&Principal>) -> Result<(), Error> {
        let caller = principal.ok_or_else(|| Error::unauthorized("login required"))?;
        if self.permits(caller) {
            Ok(())
        } else {
            Err(Error::forbidden("Forbidden"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn viewer() -> Principal {
        Principal::new(UserId::random(), Role::User)
    }

    #[fixture]
    fn admin() -> Principal {
        Principal::new(UserId::random(), Role::Admin)
    }

    #[rstest]
    fn role_rule_distinguishes_roles(viewer: Principal, admin: Principal) {
        let rule = AccessRule::role(Role::Admin);
        assert!(rule.permits(&admin));
        assert!(!rule.permits(&viewer));
    }

    #[rstest]
    fn owner_rule_ignores_admin_role(admin: Principal) {
        let rule = AccessRule::owned_by(UserId::random());
        assert!(!rule.permits(&admin));
    }

    #[rstest]
    fn and_requires_every_rule(viewer: Principal) {
        let rule = AccessRule::owned_by(viewer.user_id()).and(AccessRule::role(Role::Admin));
        assert!(!rule.permits(&viewer));
        let relaxed = AccessRule::owned_by(viewer.user_id()).and(AccessRule::authenticated());
        assert!(relaxed.permits(&viewer));
    }

    #[rstest]
    fn chained_or_flattens_rules() {
        let rule = AccessRule::role(Role::Admin)
            .or(AccessRule::owned_by(UserId::random()))
            .or(AccessRule::authenticated());
        match rule {
            AccessRule::AnyOf(rules) => assert_eq!(rules.len(), 3),
            other => panic!("expected AnyOf, got {other:?}"),
        }
    }

    #[rstest]
    fn authorize_without_caller_is_unauthorized() {
        let err = AccessRule::authenticated()
            .authorize(None)
            .expect_err("no caller");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn authorize_denied_rule_is_forbidden(viewer: Principal) {
        let err = AccessRule::role(Role::Admin)
            .authorize(Some(&viewer))
            .expect_err("viewer is not admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
