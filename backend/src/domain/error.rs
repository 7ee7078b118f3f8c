//! Domain error taxonomy.
//!
//! A closed set of failure kinds shared by validation, authorization, use
//! cases, and repositories. Values are built once by a factory at the point
//! of failure, are immutable afterwards, and travel by return value only —
//! nothing in the domain throws. Inbound adapters translate them into
//! protocol-specific envelopes.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable discriminant identifying the failure category.
///
/// Consumers match exhaustively on this enum; adding a variant is a breaking
/// change surfaced at every switch site by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DomainErrorKind {
    /// Input failed one or more declared constraints.
    Validation,
    /// The requested resource does not exist or is soft-deleted.
    NotFound,
    /// The request clashes with existing state (e.g. a uniqueness key).
    Conflict,
    /// No authenticated principal, or the principal could not be resolved.
    Unauthorized,
    /// Authenticated but lacking a required permission.
    Forbidden,
    /// A genuinely unexpected runtime failure wrapped at a boundary.
    Unexpected,
}

/// One failed constraint inside a [`DomainError::Validation`].
///
/// `field` is the dotted path into the raw input; `code` is a stable
/// machine-readable constraint identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    /// Dotted path to the offending field (e.g. `body`, `email`).
    #[schema(example = "email")]
    pub field: String,
    /// Human-readable description of the failed constraint.
    #[schema(example = "email must be a well-formed address")]
    pub message: String,
    /// Stable machine-readable constraint identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "invalid_email")]
    pub code: Option<String>,
}

impl FieldViolation {
    /// Record a failed constraint for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Attach the stable constraint identifier.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Domain failure value.
///
/// Exactly one variant is set per value and the variant determines which
/// payload fields are meaningful. The `Unexpected` cause is opaque: it is
/// logged at the boundary that wrapped it and never serialized into a
/// response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation; one entry per violated constraint.
    Validation {
        /// Summary of the failure.
        message: String,
        /// Ordered per-field detail, one entry per failed constraint.
        violations: Vec<FieldViolation>,
    },
    /// A resource lookup came back empty.
    NotFound {
        /// Resource noun used in the formatted message (e.g. `user`).
        resource: &'static str,
        /// Identifier that missed, when one was supplied.
        id: Option<String>,
    },
    /// The request clashes with existing state.
    Conflict {
        /// Summary of the clash.
        message: String,
        /// Resource noun involved, when known.
        resource: Option<&'static str>,
        /// Machine-friendly reason for the clash.
        reason: Option<String>,
    },
    /// Missing or unresolvable principal.
    Unauthorized {
        /// Summary returned to the client.
        message: String,
    },
    /// Principal resolved but not permitted.
    Forbidden {
        /// Summary returned to the client.
        message: String,
        /// Permission that would have allowed the action.
        required_permission: Option<String>,
    },
    /// Wrapped runtime fault from a collaborator boundary.
    Unexpected {
        /// Internal summary; redacted before it reaches a client.
        message: String,
        /// Opaque causal detail for logs only.
        cause: Option<String>,
    },
}

impl DomainError {
    /// Input failed the given constraints.
    pub fn validation(message: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self::Validation {
            message: message.into(),
            violations,
        }
    }

    /// Lookup for `resource` came back empty, no identifier supplied.
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource, id: None }
    }

    /// Lookup for `resource` by `id` came back empty.
    pub fn not_found_id(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: Some(id.to_string()),
        }
    }

    /// The request clashes with existing state.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            resource: None,
            reason: None,
        }
    }

    /// Missing or unresolvable principal.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Default unauthorized failure for endpoints that require a principal.
    pub fn authentication_required() -> Self {
        Self::unauthorized("Authentication required")
    }

    /// Principal resolved but not permitted.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            required_permission: None,
        }
    }

    /// Wrap a genuinely unexpected runtime failure.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
            cause: None,
        }
    }

    /// Name the resource involved in a conflict.
    #[must_use]
    pub fn with_conflict_resource(mut self, name: &'static str) -> Self {
        if let Self::Conflict { resource, .. } = &mut self {
            *resource = Some(name);
        }
        self
    }

    /// Attach a machine-friendly conflict reason.
    #[must_use]
    pub fn with_conflict_reason(mut self, value: impl Into<String>) -> Self {
        if let Self::Conflict { reason, .. } = &mut self {
            *reason = Some(value.into());
        }
        self
    }

    /// Attach the permission that would have allowed the action.
    #[must_use]
    pub fn with_required_permission(mut self, value: impl Into<String>) -> Self {
        if let Self::Forbidden {
            required_permission,
            ..
        } = &mut self
        {
            *required_permission = Some(value.into());
        }
        self
    }

    /// Attach the opaque cause to an `Unexpected` failure.
    #[must_use]
    pub fn with_cause(mut self, value: impl ToString) -> Self {
        if let Self::Unexpected { cause, .. } = &mut self {
            *cause = Some(value.to_string());
        }
        self
    }

    /// Stable discriminant for this value.
    pub fn kind(&self) -> DomainErrorKind {
        match self {
            Self::Validation { .. } => DomainErrorKind::Validation,
            Self::NotFound { .. } => DomainErrorKind::NotFound,
            Self::Conflict { .. } => DomainErrorKind::Conflict,
            Self::Unauthorized { .. } => DomainErrorKind::Unauthorized,
            Self::Forbidden { .. } => DomainErrorKind::Forbidden,
            Self::Unexpected { .. } => DomainErrorKind::Unexpected,
        }
    }

    /// Per-field detail, present only for validation failures.
    pub fn violations(&self) -> Option<&[FieldViolation]> {
        match self {
            Self::Validation { violations, .. } => Some(violations.as_slice()),
            _ => None,
        }
    }

    /// Opaque cause attached to an `Unexpected` failure, for logging only.
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Unexpected { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message, .. }
            | Self::Conflict { message, .. }
            | Self::Unauthorized { message }
            | Self::Forbidden { message, .. }
            | Self::Unexpected { message, .. } => f.write_str(message),
            Self::NotFound { resource, id } => match id {
                Some(id) => write!(f, "{resource} with id '{id}' not found"),
                None => write!(f, "{resource} not found"),
            },
        }
    }
}

impl std::error::Error for DomainError {}

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
