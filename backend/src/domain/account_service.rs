//! Sign-in and profile services backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{LoginService, UserPersistenceError, UserProfileQuery, UserRepository};
use crate::domain::{Error, LoginCredentials, Principal, User, UserId};

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Account service implementing [`LoginService`] and [`UserProfileQuery`].
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
}

impl<R> AccountService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?;
        match stored {
            Some(found) if credentials.matches_digest(&found.password_digest) => {
                Ok(Principal::new(found.user.id(), found.user.role()))
            }
            _ => {
                debug!(username = credentials.username(), "rejected sign-in");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}

#[async_trait]
impl<R> UserProfileQuery for AccountService<R>
where
    R: UserRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUserRepository, StoredCredentials};
    use crate::domain::{DisplayName, ErrorCode, Role, password_digest};
    use rstest::{fixture, rstest};

    #[fixture]
    fn admin() -> User {
        User::new(
            UserId::random(),
            "admin",
            DisplayName::new("Site Admin").expect("display name"),
            Role::Admin,
        )
    }

    fn service_returning(
        stored: Option<StoredCredentials>,
    ) -> AccountService<MockUserRepository> {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials()
            .times(1)
            .return_once(move |_| Ok(stored));
        AccountService::new(Arc::new(repo))
    }

    #[rstest]
    #[tokio::test]
    async fn correct_password_yields_principal(admin: User) {
        let expected = Principal::new(admin.id(), Role::Admin);
        let service = service_returning(Some(StoredCredentials {
            user: admin,
            password_digest: password_digest("password"),
        }));
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("creds");

        let principal = service.authenticate(&creds).await.expect("signed in");
        assert_eq!(principal, expected);
    }

    #[rstest]
    #[case(Some("wrong"))]
    #[case(None)]
    #[tokio::test]
    async fn bad_credentials_are_unauthorized(admin: User, #[case] stored_password: Option<&str>) {
        let stored = stored_password.map(|password| StoredCredentials {
            user: admin,
            password_digest: password_digest(password),
        });
        let service = service_returning(stored);
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("creds");

        let err = service.authenticate(&creds).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Err(failure));
        let service = AccountService::new(Arc::new(repo));

        let err = service
            .fetch_profile(&UserId::random())
            .await
            .expect_err("mapped failure");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let service = AccountService::new(Arc::new(repo));

        let err = service
            .fetch_profile(&UserId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
