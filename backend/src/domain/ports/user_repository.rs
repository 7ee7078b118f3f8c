//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{PageRequest, Paged};

use crate::domain::{DomainError, EmailAddress, NewUser, User, UserId, UserPatch};

/// Persistence errors raised by user repository adapters.
///
/// Genuine runtime faults from the storage engine are caught at this boundary
/// and wrapped; they never propagate upward as panics or raw driver errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Driver-level detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Driver-level detail.
        message: String,
    },
    /// The targeted row is absent or soft-deleted.
    #[error("user row is absent or deleted")]
    RowMissing,
    /// The storage-level unique index on email rejected the write.
    #[error("email '{email}' is already registered")]
    DuplicateEmail {
        /// Address that clashed.
        email: String,
    },
}

impl UserRepositoryError {
    /// Connection failure with driver detail.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with driver detail.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Unique-email rejection for the given address.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Translate into the domain taxonomy.
    ///
    /// Call sites that know which row was targeted should handle
    /// [`UserRepositoryError::RowMissing`] themselves to attach the id.
    pub fn into_domain(self) -> DomainError {
        match self {
            Self::Connection { message } => {
                DomainError::unexpected("user storage unavailable").with_cause(message)
            }
            Self::Query { message } => {
                DomainError::unexpected("user storage failed").with_cause(message)
            }
            Self::RowMissing => DomainError::not_found("user"),
            Self::DuplicateEmail { email } => {
                DomainError::conflict(format!("email '{email}' is already registered"))
                    .with_conflict_resource("user")
                    .with_conflict_reason("duplicate_email")
            }
        }
    }
}

/// Persistence contract for user records.
///
/// Every read filters out soft-deleted rows; `Ok(None)` means "absent or
/// deleted", never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, generating id and timestamps.
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch a live user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a live user by the unique email key.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, UserRepositoryError>;

    /// Page through live users; `total` counts all live rows.
    async fn list(&self, page: PageRequest) -> Result<Paged<User>, UserRepositoryError>;

    /// Apply a partial update to a live user, bumping `updated_at`.
    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, UserRepositoryError>;

    /// Soft-delete a live user by stamping `deleted_at`.
    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError>;
}
