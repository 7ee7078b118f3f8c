//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The session cookie is the only authenticated-principal source: handlers
//! never read an acting user id from request headers or bodies, so a client
//! cannot act as someone else by editing its own payload.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::{DomainError, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the acting user's id in the session cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), DomainError> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| {
                DomainError::unexpected("failed to persist session").with_cause(error)
            })
    }

    /// Fetch the acting user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, DomainError> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| DomainError::unexpected("failed to read session").with_cause(error))?;
        match raw {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Ok(Some(UserId::from_uuid(id))),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an acting user id or fail with `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, DomainError> {
        self.user_id()?
            .ok_or_else(DomainError::authentication_required)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
