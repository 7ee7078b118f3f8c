//! Driving port establishing the authenticated principal for a session.

use async_trait::async_trait;

use crate::domain::{DomainResult, EmailAddress, User};

/// Resolve the account a session should act as.
///
/// Failures are deliberately uniform: an unknown address and a soft-deleted
/// account both produce the same unauthorized error so the endpoint cannot be
/// used to probe for registered emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve the user the session will act as.
    async fn login(&self, email: EmailAddress) -> DomainResult<User>;
}
