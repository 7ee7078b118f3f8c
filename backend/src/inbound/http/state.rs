//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, PostsCommand, PostsQuery, UsersCommand, UsersQuery};
use crate::domain::{PostService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Session-establishment use case.
    pub login: Arc<dyn LoginService>,
    /// Mutating user use cases.
    pub users: Arc<dyn UsersCommand>,
    /// Read-only user use cases.
    pub users_query: Arc<dyn UsersQuery>,
    /// Mutating post use cases.
    pub posts: Arc<dyn PostsCommand>,
    /// Read-only post use cases.
    pub posts_query: Arc<dyn PostsQuery>,
}

impl HttpState {
    /// Wire the state from the two domain services.
    ///
    /// The user service fronts login, user commands, and user queries; the
    /// post service fronts both post ports.
    pub fn from_services<R, P>(users: Arc<UserService<R>>, posts: Arc<PostService<P, R>>) -> Self
    where
        R: crate::domain::ports::UserRepository + 'static,
        P: crate::domain::ports::PostRepository + 'static,
    {
        Self {
            login: Arc::clone(&users) as Arc<dyn LoginService>,
            users: Arc::clone(&users) as Arc<dyn UsersCommand>,
            users_query: users as Arc<dyn UsersQuery>,
            posts: Arc::clone(&posts) as Arc<dyn PostsCommand>,
            posts_query: posts as Arc<dyn PostsQuery>,
        }
    }
}
