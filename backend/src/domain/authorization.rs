//! Ownership checks for mutating operations on posts.
//!
//! A policy check distinguishes "could not determine authorization" (a failed
//! `Result`) from "determined: not allowed" (a successful `Result` carrying a
//! negative outcome). Callers translate the negative outcome into whichever
//! error fits their context.

use std::sync::Arc;

use crate::domain::ports::{
    PostRepository, PostRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{DomainError, DomainResult, Post, PostId, User, UserId};

/// Decision produced by a policy check.
///
/// `reason` is populated only when the decision is negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationOutcome {
    authorized: bool,
    reason: Option<String>,
}

impl AuthorizationOutcome {
    /// Positive decision.
    pub fn granted() -> Self {
        Self {
            authorized: true,
            reason: None,
        }
    }

    /// Negative decision with a human-readable reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            authorized: false,
            reason: Some(reason.into()),
        }
    }

    /// Whether the action is allowed.
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Why the action was denied, when it was.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Ownership policy for posts, resolved against the live rows of both
/// repositories.
#[derive(Clone)]
pub struct PostPolicy<U, P> {
    users: Arc<U>,
    posts: Arc<P>,
}

impl<U, P> PostPolicy<U, P> {
    /// Build a policy over the given repositories.
    pub fn new(users: Arc<U>, posts: Arc<P>) -> Self {
        Self { users, posts }
    }
}

impl<U, P> PostPolicy<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    /// May `actor` edit the post?
    ///
    /// Fails with unauthorized when the actor cannot be resolved and with
    /// not-found when the post is absent or deleted; an ownership mismatch is
    /// a successful negative outcome, not an error.
    pub async fn can_edit_post(
        &self,
        actor: UserId,
        post: PostId,
    ) -> DomainResult<AuthorizationOutcome> {
        let actor = self.resolve_actor(actor).await?;
        let post = self.resolve_post(post).await?;
        Ok(Self::ownership_outcome(&actor, &post, "edit"))
    }

    /// May `actor` delete the post? Same resolution rules as editing.
    pub async fn can_delete_post(
        &self,
        actor: UserId,
        post: PostId,
    ) -> DomainResult<AuthorizationOutcome> {
        let actor = self.resolve_actor(actor).await?;
        let post = self.resolve_post(post).await?;
        Ok(Self::ownership_outcome(&actor, &post, "delete"))
    }

    /// May anyone view the post? Any live post is viewable; no actor needed.
    pub async fn can_view_post(&self, post: PostId) -> DomainResult<AuthorizationOutcome> {
        self.resolve_post(post).await?;
        Ok(AuthorizationOutcome::granted())
    }

    async fn resolve_actor(&self, actor: UserId) -> DomainResult<User> {
        let user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(UserRepositoryError::into_domain)?;
        // A missing actor stays opaque: the response must not reveal whether
        // the account ever existed.
        user.ok_or_else(|| DomainError::unauthorized("acting user is unknown or deleted"))
    }

    async fn resolve_post(&self, post: PostId) -> DomainResult<Post> {
        let found = self.posts.find_by_id(post).await.map_err(|error| {
            if matches!(error, PostRepositoryError::RowMissing) {
                DomainError::not_found_id("post", post)
            } else {
                error.into_domain()
            }
        })?;
        found.ok_or_else(|| DomainError::not_found_id("post", post))
    }

    fn ownership_outcome(actor: &User, post: &Post, action: &str) -> AuthorizationOutcome {
        if post.author_id() == actor.id() {
            AuthorizationOutcome::granted()
        } else {
            AuthorizationOutcome::denied(format!("only the author may {action} this post"))
        }
    }
}
