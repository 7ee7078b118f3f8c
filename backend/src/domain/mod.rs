//! Domain primitives, aggregates, and use cases.
//!
//! Transport-agnostic core: entities with validated value types, the error
//! taxonomy, the ownership policy, and the services that sequence
//! validation, authorization, and persistence for each business action.
//! Inbound adapters translate [`DomainError`] values into wire envelopes;
//! outbound adapters implement the [`ports`] traits.

pub mod authorization;
pub mod error;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod user;
pub mod user_service;

pub use self::authorization::{AuthorizationOutcome, PostPolicy};
pub use self::error::{DomainError, DomainErrorKind, DomainResult, FieldViolation};
pub use self::post::{
    NewPost, Post, PostBody, PostFieldError, PostId, PostPatch, PostTitle, POST_BODY_MAX,
    POST_TITLE_MAX,
};
pub use self::post_service::PostService;
pub use self::user::{
    EmailAddress, NewUser, User, UserFieldError, UserId, UserName, UserPatch, EMAIL_MAX,
    USER_NAME_MAX,
};
pub use self::user_service::UserService;

#[cfg(test)]
pub(crate) mod test_fixtures {
    //! Shared builders for unit tests across the domain.

    use chrono::Utc;

    use super::{
        EmailAddress, NewPost, Post, PostBody, PostId, PostTitle, User, UserId, UserName,
    };

    /// Live user with generated id and current timestamps.
    pub fn user_named(name: &str, email: &str) -> User {
        let now = Utc::now();
        User::from_parts(
            UserId::random(),
            UserName::new(name).expect("fixture name is valid"),
            EmailAddress::new(email).expect("fixture email is valid"),
            now,
            now,
            None,
        )
    }

    /// Live post owned by `author` with generated id.
    pub fn post_owned_by(author: &User) -> Post {
        let now = Utc::now();
        Post::from_parts(
            PostId::random(),
            author.id(),
            PostTitle::new("Hello world").expect("fixture title is valid"),
            PostBody::new("A first post.").expect("fixture body is valid"),
            now,
            now,
            None,
        )
    }
}
