//! HTTP problem responses mapped from domain errors.
//!
//! Keeps the domain free of transport concerns: this is the only place that
//! turns a [`DomainError`] into a status code and an
//! `application/problem+json` body. The mapping is a pure function of the
//! error value, so equal errors always render identical bytes.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, DomainErrorKind, FieldViolation};

/// Content type of every error response.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Fixed client-facing detail for unexpected failures. The real message and
/// cause are logged and never serialized.
const UNEXPECTED_DETAIL: &str = "An unexpected error occurred";

/// Last-resort body should problem serialization itself fail.
const FALLBACK_BODY: &str = concat!(
    r#"{"type":"urn:app:error:unexpected","title":"Internal Server Error","#,
    r#""status":500,"detail":"An unexpected error occurred"}"#
);

fn status_for(kind: DomainErrorKind) -> StatusCode {
    match kind {
        DomainErrorKind::Validation => StatusCode::BAD_REQUEST,
        DomainErrorKind::NotFound => StatusCode::NOT_FOUND,
        DomainErrorKind::Conflict => StatusCode::CONFLICT,
        DomainErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainErrorKind::Forbidden => StatusCode::FORBIDDEN,
        DomainErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn title_for(kind: DomainErrorKind) -> &'static str {
    match kind {
        DomainErrorKind::Validation => "Validation Error",
        DomainErrorKind::NotFound => "Not Found",
        DomainErrorKind::Conflict => "Conflict",
        DomainErrorKind::Unauthorized => "Unauthorized",
        DomainErrorKind::Forbidden => "Forbidden",
        DomainErrorKind::Unexpected => "Internal Server Error",
    }
}

fn urn_for(kind: DomainErrorKind) -> &'static str {
    match kind {
        DomainErrorKind::Validation => "urn:app:error:validation",
        DomainErrorKind::NotFound => "urn:app:error:not-found",
        DomainErrorKind::Conflict => "urn:app:error:conflict",
        DomainErrorKind::Unauthorized => "urn:app:error:unauthorized",
        DomainErrorKind::Forbidden => "urn:app:error:forbidden",
        DomainErrorKind::Unexpected => "urn:app:error:unexpected",
    }
}

/// Problem Details error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    /// Stable URN identifying the error kind.
    #[serde(rename = "type")]
    #[schema(example = "urn:app:error:validation")]
    pub kind: String,
    /// Short human-readable summary of the kind.
    #[schema(example = "Validation Error")]
    pub title: String,
    /// HTTP status code duplicated into the body.
    #[schema(example = 400)]
    pub status: u16,
    /// Human-readable explanation of this occurrence.
    pub detail: String,
    /// Per-field violations, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
    /// Request path that produced the failure, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Map a domain error to its wire form.
    ///
    /// Pure: no logging, no clock, no randomness. The unexpected variant's
    /// detail is a fixed generic string regardless of the wrapped message.
    pub fn from_domain(error: &DomainError, instance: Option<&str>) -> Self {
        let kind = error.kind();
        let detail = match kind {
            DomainErrorKind::Unexpected => UNEXPECTED_DETAIL.to_owned(),
            _ => error.to_string(),
        };
        let errors = error
            .violations()
            .filter(|violations| !violations.is_empty())
            .map(<[FieldViolation]>::to_vec);

        Self {
            kind: urn_for(kind).to_owned(),
            title: title_for(kind).to_owned(),
            status: status_for(kind).as_u16(),
            detail,
            errors,
            instance: instance.map(str::to_owned),
        }
    }

    /// Render the problem as an HTTP response.
    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match serde_json::to_string(&self) {
            Ok(body) => HttpResponse::build(status)
                .content_type(PROBLEM_CONTENT_TYPE)
                .body(body),
            Err(err) => {
                error!(error = %err, "problem body failed to serialize");
                HttpResponse::InternalServerError()
                    .content_type(PROBLEM_CONTENT_TYPE)
                    .body(FALLBACK_BODY)
            }
        }
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Unexpected { message, cause } = self {
            error!(
                error = %message,
                cause = cause.as_deref().unwrap_or("unknown"),
                "unexpected failure reached the HTTP boundary"
            );
        }
        Problem::from_domain(self, None).into_response()
    }
}

impl From<actix_web::Error> for DomainError {
    fn from(err: actix_web::Error) -> Self {
        // Anything the framework surfaces outside our own handlers is by
        // definition unmapped; it renders as the generic 500 problem.
        Self::unexpected("framework error").with_cause(err)
    }
}

/// Render malformed request bodies as the 400 validation problem.
///
/// Wire this into `web::JsonConfig::error_handler` so deserialization
/// failures share the error contract instead of actix's default plain-text
/// 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    DomainError::validation(
        "request body is invalid",
        vec![FieldViolation::new("body", detail).with_code("invalid_json")],
    )
    .into()
}

/// Render malformed query strings as the 400 validation problem.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    DomainError::validation(
        "query string is invalid",
        vec![FieldViolation::new("query", detail).with_code("invalid_query")],
    )
    .into()
}

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, DomainError>;
