//! Driving ports for post use cases, consumed by inbound adapters.

use async_trait::async_trait;
use pagination::{PageRequest, Paged};

use super::post_repository::PostListFilter;
use crate::domain::{DomainResult, NewPost, Post, PostId, PostPatch, UserId};

/// Mutating post use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Publish a new post for the acting author.
    async fn create_post(&self, input: NewPost) -> DomainResult<Post>;

    /// Apply a partial update; only the post's author may mutate it.
    async fn update_post(
        &self,
        actor: UserId,
        id: PostId,
        patch: PostPatch,
    ) -> DomainResult<Post>;

    /// Soft-delete a post; only the post's author may remove it.
    async fn delete_post(&self, actor: UserId, id: PostId) -> DomainResult<()>;
}

/// Read-only post use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Fetch one live post or fail with not-found.
    async fn get_post(&self, id: PostId) -> DomainResult<Post>;

    /// Page through live posts matching `filter`.
    async fn list_posts(
        &self,
        page: PageRequest,
        filter: PostListFilter,
    ) -> DomainResult<Paged<Post>>;
}
