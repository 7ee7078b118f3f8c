//! Post use cases.
//!
//! Mutations run the ownership policy before touching storage; reads resolve
//! directly. As with users, every stage returns a `Result` and the first
//! failure is terminal.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paged};

use crate::domain::authorization::{AuthorizationOutcome, PostPolicy};
use crate::domain::ports::{
    PostListFilter, PostRepository, PostRepositoryError, PostsCommand, PostsQuery, UserRepository,
    UserRepositoryError,
};
use crate::domain::{DomainError, DomainResult, NewPost, Post, PostId, PostPatch, UserId};

/// Post service implementing the driving ports.
#[derive(Clone)]
pub struct PostService<P, U> {
    posts: Arc<P>,
    users: Arc<U>,
    policy: PostPolicy<U, P>,
}

impl<P, U> PostService<P, U> {
    /// Create a new service over the given repositories.
    pub fn new(posts: Arc<P>, users: Arc<U>) -> Self {
        let policy = PostPolicy::new(Arc::clone(&users), Arc::clone(&posts));
        Self {
            posts,
            users,
            policy,
        }
    }
}

impl<P, U> PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    fn deny(outcome: &AuthorizationOutcome) -> DomainError {
        DomainError::unauthorized(
            outcome
                .reason()
                .unwrap_or("not permitted to modify this post"),
        )
    }

    fn map_missing_row(id: PostId) -> impl FnOnce(PostRepositoryError) -> DomainError {
        move |error| {
            if matches!(error, PostRepositoryError::RowMissing) {
                DomainError::not_found_id("post", id)
            } else {
                error.into_domain()
            }
        }
    }
}

#[async_trait]
impl<P, U> PostsCommand for PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn create_post(&self, input: NewPost) -> DomainResult<Post> {
        let author = self
            .users
            .find_by_id(input.author_id)
            .await
            .map_err(UserRepositoryError::into_domain)?;
        if author.is_none() {
            // Same opacity as the policy: no hint about whether the account
            // ever existed.
            return Err(DomainError::unauthorized("acting user is unknown or deleted"));
        }

        self.posts
            .create(input)
            .await
            .map_err(PostRepositoryError::into_domain)
    }

    async fn update_post(
        &self,
        actor: UserId,
        id: PostId,
        patch: PostPatch,
    ) -> DomainResult<Post> {
        let outcome = self.policy.can_edit_post(actor, id).await?;
        if !outcome.is_authorized() {
            return Err(Self::deny(&outcome));
        }

        self.posts
            .update(id, patch)
            .await
            .map_err(Self::map_missing_row(id))
    }

    async fn delete_post(&self, actor: UserId, id: PostId) -> DomainResult<()> {
        let outcome = self.policy.can_delete_post(actor, id).await?;
        if !outcome.is_authorized() {
            return Err(Self::deny(&outcome));
        }

        self.posts
            .delete(id)
            .await
            .map_err(Self::map_missing_row(id))
    }
}

#[async_trait]
impl<P, U> PostsQuery for PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn get_post(&self, id: PostId) -> DomainResult<Post> {
        let found = self
            .posts
            .find_by_id(id)
            .await
            .map_err(PostRepositoryError::into_domain)?;
        found.ok_or_else(|| DomainError::not_found_id("post", id))
    }

    async fn list_posts(
        &self,
        page: PageRequest,
        filter: PostListFilter,
    ) -> DomainResult<Paged<Post>> {
        self.posts
            .list(page, filter)
            .await
            .map_err(PostRepositoryError::into_domain)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockPostRepository, MockUserRepository};
    use crate::domain::test_fixtures::{post_owned_by, user_named};
    use crate::domain::{DomainErrorKind, PostBody, PostTitle};

    fn service(
        posts: MockPostRepository,
        users: MockUserRepository,
    ) -> PostService<MockPostRepository, MockUserRepository> {
        PostService::new(Arc::new(posts), Arc::new(users))
    }

    fn draft(author: UserId) -> NewPost {
        NewPost {
            author_id: author,
            title: PostTitle::new("Hello").expect("valid title"),
            body: PostBody::new("First post.").expect("valid body"),
        }
    }

    #[tokio::test]
    async fn create_post_requires_live_author() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let mut posts = MockPostRepository::new();
        posts.expect_create().times(0);

        let error = service(posts, users)
            .create_post(draft(UserId::random()))
            .await
            .expect_err("missing author is unauthorized");
        assert_eq!(error.kind(), DomainErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn create_post_persists_for_live_author() {
        let author = user_named("Ann", "ann@example.com");
        let created = post_owned_by(&author);
        let author_id = author.id();
        let expected = created.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(author)));
        let mut posts = MockPostRepository::new();
        posts
            .expect_create()
            .return_once(move |_| Ok(created));

        let post = service(posts, users)
            .create_post(draft(author_id))
            .await
            .expect("create succeeds");
        assert_eq!(post, expected);
    }

    #[tokio::test]
    async fn update_post_translates_denied_outcome() {
        let owner = user_named("Ann", "ann@example.com");
        let other = user_named("Ben", "ben@example.com");
        let post = post_owned_by(&owner);
        let actor_id = other.id();
        let post_id = post.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(other)));
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(post)));
        posts.expect_update().times(0);

        let error = service(posts, users)
            .update_post(actor_id, post_id, PostPatch::default())
            .await
            .expect_err("denied outcome becomes unauthorized");
        assert_eq!(error.kind(), DomainErrorKind::Unauthorized);
        assert_eq!(error.to_string(), "only the author may edit this post");
    }

    #[tokio::test]
    async fn update_post_applies_patch_for_owner() {
        let owner = user_named("Ann", "ann@example.com");
        let post = post_owned_by(&owner);
        let actor_id = owner.id();
        let post_id = post.id();
        let updated = post.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(owner)));
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(post)));
        posts
            .expect_update()
            .return_once(move |_, _| Ok(updated));

        service(posts, users)
            .update_post(
                actor_id,
                post_id,
                PostPatch {
                    title: Some(PostTitle::new("Edited").expect("valid title")),
                    body: None,
                },
            )
            .await
            .expect("owner may edit");
    }

    #[tokio::test]
    async fn delete_post_soft_deletes_for_owner() {
        let owner = user_named("Ann", "ann@example.com");
        let post = post_owned_by(&owner);
        let actor_id = owner.id();
        let post_id = post.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(owner)));
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(post)));
        posts.expect_delete().return_once(|_| Ok(()));

        service(posts, users)
            .delete_post(actor_id, post_id)
            .await
            .expect("owner may delete");
    }

    #[tokio::test]
    async fn get_post_translates_empty_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().return_once(|_| Ok(None));

        let error = service(posts, users)
            .get_post(PostId::random())
            .await
            .expect_err("empty lookup is not found");
        assert_eq!(error.kind(), DomainErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_posts_passes_filter_through() {
        let author = UserId::random();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);
        let mut posts = MockPostRepository::new();
        posts
            .expect_list()
            .withf(move |_, filter| filter.author_id == Some(author))
            .return_once(|_, _| Ok(Paged::empty()));

        let page = service(posts, users)
            .list_posts(
                PageRequest::default(),
                PostListFilter {
                    author_id: Some(author),
                },
            )
            .await
            .expect("list succeeds");
        assert_eq!(page.total, 0);
    }
}
