//! Driving ports for user use cases, consumed by inbound adapters.

use async_trait::async_trait;
use pagination::{PageRequest, Paged};

use crate::domain::{DomainResult, NewUser, User, UserId, UserPatch};

/// Mutating user use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user; duplicate emails fail with a conflict.
    async fn create_user(&self, input: NewUser) -> DomainResult<User>;

    /// Apply a partial update; only the account owner may mutate it.
    async fn update_user(
        &self,
        actor: UserId,
        target: UserId,
        patch: UserPatch,
    ) -> DomainResult<User>;

    /// Soft-delete an account; only the account owner may remove it.
    async fn delete_user(&self, actor: UserId, target: UserId) -> DomainResult<()>;
}

/// Read-only user use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one live user or fail with not-found.
    async fn get_user(&self, id: UserId) -> DomainResult<User>;

    /// Page through live users.
    async fn list_users(&self, page: PageRequest) -> DomainResult<Paged<User>>;
}
