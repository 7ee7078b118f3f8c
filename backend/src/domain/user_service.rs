//! User use cases.
//!
//! Each operation sequences validate → authorize → execute and short-circuits
//! on the first failure. Inputs arrive already validated from the inbound
//! adapter; nothing before the repository call has side effects, so a failed
//! stage leaves no state to unwind.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paged};

use crate::domain::ports::{
    LoginService, UserRepository, UserRepositoryError, UsersCommand, UsersQuery,
};
use crate::domain::{DomainError, DomainResult, EmailAddress, NewUser, User, UserId, UserPatch};

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service over the given repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn require_self(actor: UserId, target: UserId) -> DomainResult<()> {
        if actor == target {
            Ok(())
        } else {
            Err(DomainError::unauthorized(
                "only the account owner may modify this account",
            ))
        }
    }

    fn map_missing_row(target: UserId) -> impl FnOnce(UserRepositoryError) -> DomainError {
        move |error| {
            if matches!(error, UserRepositoryError::RowMissing) {
                DomainError::not_found_id("user", target)
            } else {
                error.into_domain()
            }
        }
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, input: NewUser) -> DomainResult<User> {
        let existing = self
            .users
            .find_by_email(&input.email)
            .await
            .map_err(UserRepositoryError::into_domain)?;
        if existing.is_some() {
            return Err(DomainError::conflict(format!(
                "email '{}' is already registered",
                input.email
            ))
            .with_conflict_resource("user")
            .with_conflict_reason("duplicate_email"));
        }

        // The pre-check is a fast path for the common case; the storage
        // layer's unique index is the actual guarantee and its violation
        // maps to the same conflict.
        self.users
            .create(input)
            .await
            .map_err(UserRepositoryError::into_domain)
    }

    async fn update_user(
        &self,
        actor: UserId,
        target: UserId,
        patch: UserPatch,
    ) -> DomainResult<User> {
        Self::require_self(actor, target)?;

        if let Some(email) = &patch.email {
            let holder = self
                .users
                .find_by_email(email)
                .await
                .map_err(UserRepositoryError::into_domain)?;
            if holder.as_ref().is_some_and(|user| user.id() != target) {
                return Err(DomainError::conflict(format!(
                    "email '{email}' is already registered"
                ))
                .with_conflict_resource("user")
                .with_conflict_reason("duplicate_email"));
            }
        }

        self.users
            .update(target, patch)
            .await
            .map_err(Self::map_missing_row(target))
    }

    async fn delete_user(&self, actor: UserId, target: UserId) -> DomainResult<()> {
        Self::require_self(actor, target)?;
        self.users
            .delete(target)
            .await
            .map_err(Self::map_missing_row(target))
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get_user(&self, id: UserId) -> DomainResult<User> {
        let found = self
            .users
            .find_by_id(id)
            .await
            .map_err(UserRepositoryError::into_domain)?;
        found.ok_or_else(|| DomainError::not_found_id("user", id))
    }

    async fn list_users(&self, page: PageRequest) -> DomainResult<Paged<User>> {
        self.users
            .list(page)
            .await
            .map_err(UserRepositoryError::into_domain)
    }
}

#[async_trait]
impl<R> LoginService for UserService<R>
where
    R: UserRepository,
{
    async fn login(&self, email: EmailAddress) -> DomainResult<User> {
        let found = self
            .users
            .find_by_email(&email)
            .await
            .map_err(UserRepositoryError::into_domain)?;
        // Uniform failure for unknown and deleted accounts alike.
        found.ok_or_else(|| DomainError::unauthorized("invalid credentials"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::test_fixtures::user_named;
    use crate::domain::{DomainErrorKind, UserName};
    use rstest::rstest;

    fn service(users: MockUserRepository) -> UserService<MockUserRepository> {
        UserService::new(Arc::new(users))
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: UserName::new(name).expect("valid name"),
            email: EmailAddress::new(email).expect("valid email"),
        }
    }

    #[tokio::test]
    async fn create_user_succeeds_when_email_free() {
        let created = user_named("Ann", "ann@example.com");
        let expected = created.clone();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_create()
            .return_once(move |_| Ok(created));

        let user = service(users)
            .create_user(new_user("Ann", "ann@example.com"))
            .await
            .expect("create succeeds");
        assert_eq!(user, expected);
    }

    #[tokio::test]
    async fn create_user_pre_check_detects_duplicate() {
        let holder = user_named("Ann", "ann@example.com");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(holder)));
        users.expect_create().times(0);

        let error = service(users)
            .create_user(new_user("Ann", "ann@example.com"))
            .await
            .expect_err("duplicate email conflicts");
        assert_eq!(error.kind(), DomainErrorKind::Conflict);
    }

    #[tokio::test]
    async fn create_user_translates_storage_unique_violation() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users.expect_create().return_once(|input: NewUser| {
            Err(UserRepositoryError::duplicate_email(
                input.email.to_string(),
            ))
        });

        let error = service(users)
            .create_user(new_user("Ann", "ann@example.com"))
            .await
            .expect_err("index violation conflicts");
        assert_eq!(error.kind(), DomainErrorKind::Conflict);
    }

    #[tokio::test]
    async fn update_user_rejects_foreign_actor() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(0);
        users.expect_update().times(0);

        let error = service(users)
            .update_user(UserId::random(), UserId::random(), UserPatch::default())
            .await
            .expect_err("foreign actor is rejected");
        assert_eq!(error.kind(), DomainErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn update_user_rejects_email_held_by_other_account() {
        let holder = user_named("Ben", "taken@example.com");
        let target = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(holder)));
        users.expect_update().times(0);

        let patch = UserPatch {
            name: None,
            email: Some(EmailAddress::new("taken@example.com").expect("valid email")),
        };
        let error = service(users)
            .update_user(target, target, patch)
            .await
            .expect_err("held email conflicts");
        assert_eq!(error.kind(), DomainErrorKind::Conflict);
    }

    #[tokio::test]
    async fn update_user_allows_keeping_own_email() {
        let current = user_named("Ann", "ann@example.com");
        let target = current.id();
        let updated = current.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(current)));
        users
            .expect_update()
            .return_once(move |_, _| Ok(updated));

        let patch = UserPatch {
            name: None,
            email: Some(EmailAddress::new("ann@example.com").expect("valid email")),
        };
        service(users)
            .update_user(target, target, patch)
            .await
            .expect("own email is not a conflict");
    }

    #[tokio::test]
    async fn missing_update_target_maps_to_not_found() {
        let target = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_update()
            .return_once(|_, _| Err(UserRepositoryError::RowMissing));

        let patch = UserPatch {
            name: Some(UserName::new("Ann").expect("valid name")),
            email: None,
        };
        let error = service(users)
            .update_user(target, target, patch)
            .await
            .expect_err("missing row is not found");
        assert_eq!(error.kind(), DomainErrorKind::NotFound);
    }

    #[tokio::test]
    async fn get_user_translates_empty_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let error = service(users)
            .get_user(UserId::random())
            .await
            .expect_err("empty lookup is not found");
        assert_eq!(error.kind(), DomainErrorKind::NotFound);
    }

    #[rstest]
    #[case(UserRepositoryError::connection("pool exhausted"))]
    #[case(UserRepositoryError::query("syntax error"))]
    #[tokio::test]
    async fn repository_faults_map_to_unexpected(#[case] fault: UserRepositoryError) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Err(fault));

        let error = service(users)
            .get_user(UserId::random())
            .await
            .expect_err("fault surfaces as unexpected");
        assert_eq!(error.kind(), DomainErrorKind::Unexpected);
        assert!(error.cause().is_some());
    }

    #[tokio::test]
    async fn login_hides_unknown_accounts() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));

        let error = service(users)
            .login(EmailAddress::new("ghost@example.com").expect("valid email"))
            .await
            .expect_err("unknown account is unauthorized");
        assert_eq!(error.kind(), DomainErrorKind::Unauthorized);
        assert_eq!(error.to_string(), "invalid credentials");
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let target = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_delete()
            .return_once(|_| Err(UserRepositoryError::RowMissing));

        let error = service(users)
            .delete_user(target, target)
            .await
            .expect_err("already deleted row is not found");
        assert_eq!(error.kind(), DomainErrorKind::NotFound);
    }
}
