//! Port abstraction for post persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{PageRequest, Paged};

use crate::domain::{DomainError, NewPost, Post, PostId, PostPatch, UserId};

/// Optional filters applied to post listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostListFilter {
    /// Restrict the listing to one author's posts.
    pub author_id: Option<UserId>,
}

/// Persistence errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostRepositoryError {
    /// Repository connection could not be established.
    #[error("post repository connection failed: {message}")]
    Connection {
        /// Driver-level detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("post repository query failed: {message}")]
    Query {
        /// Driver-level detail.
        message: String,
    },
    /// The targeted row is absent or soft-deleted.
    #[error("post row is absent or deleted")]
    RowMissing,
}

impl PostRepositoryError {
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

    /// Translate into the domain taxonomy.
    ///
    /// Call sites that know which row was targeted should handle
    /// [`PostRepositoryError::RowMissing`] themselves to attach the id.
    pub fn into_domain(self) -> DomainError {
        match self {
            Self::Connection { message } => {
                DomainError::unexpected("post storage unavailable").with_cause(message)
            }
            Self::Query { message } => {
                DomainError::unexpected("post storage failed").with_cause(message)
            }
            Self::RowMissing => DomainError::not_found("post"),
        }
    }
}

/// Persistence contract for post records.
///
/// Every read filters out soft-deleted rows; `Ok(None)` means "absent or
/// deleted", never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post, generating id and timestamps.
    async fn create(&self, new_post: NewPost) -> Result<Post, PostRepositoryError>;

    /// Fetch a live post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Page through live posts matching `filter`; `total` counts all live
    /// rows matching the same filter.
    async fn list(
        &self,
        page: PageRequest,
        filter: PostListFilter,
    ) -> Result<Paged<Post>, PostRepositoryError>;

    /// Apply a partial update to a live post, bumping `updated_at`.
    async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, PostRepositoryError>;

    /// Soft-delete a live post by stamping `deleted_at`.
    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError>;
}
