//! Shared validation helpers for inbound HTTP adapters.
//!
//! Validation here is exhaustive: a parse function walks the whole payload,
//! collects one [`FieldViolation`] per failed constraint, and returns them
//! together in a single validation error. Defaults (such as the pagination
//! window) are applied during validation, not afterwards.

use pagination::{PageBoundsError, PageRequest, DEFAULT_LIMIT};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::domain::{DomainError, FieldViolation, PostFieldError, UserFieldError};

/// Accumulator for per-field constraint failures.
pub(crate) struct ConstraintViolations {
    items: Vec<FieldViolation>,
}

impl ConstraintViolations {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a prepared violation.
    pub(crate) fn push(&mut self, violation: FieldViolation) {
        self.items.push(violation);
    }

    /// Record `field` as missing when `value` is absent.
    pub(crate) fn require<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(
                FieldViolation::new(field, format!("{field} is required")).with_code("required"),
            );
        }
        value
    }

    /// Record a constructor failure against `field`, keeping the value on
    /// success.
    pub(crate) fn check<T, E>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
        code: fn(&E) -> &'static str,
    ) -> Option<T>
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                let violation =
                    FieldViolation::new(field, error.to_string()).with_code(code(&error));
                self.push(violation);
                None
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Close the collection phase: all accumulated violations become one
    /// validation error.
    pub(crate) fn finish(self, summary: &'static str) -> Result<(), DomainError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(summary, self.items))
        }
    }
}

/// Stable code for a user field constructor failure.
pub(crate) fn user_field_code(error: &UserFieldError) -> &'static str {
    match error {
        UserFieldError::EmptyName | UserFieldError::EmptyEmail => "blank",
        UserFieldError::NameTooLong { .. } | UserFieldError::EmailTooLong { .. } => "too_long",
        UserFieldError::InvalidEmail => "invalid_email",
    }
}

/// Stable code for a post field constructor failure.
pub(crate) fn post_field_code(error: &PostFieldError) -> &'static str {
    match error {
        PostFieldError::EmptyTitle | PostFieldError::EmptyBody => "blank",
        PostFieldError::TitleTooLong { .. } | PostFieldError::BodyTooLong { .. } => "too_long",
    }
}

/// Parse a path segment as a UUID or fail with the single-field validation
/// error.
pub(crate) fn parse_path_uuid(field: &'static str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| {
        let message = format!("{field} must be a valid UUID");
        DomainError::validation(
            "path parameters are invalid",
            vec![FieldViolation::new(field, message).with_code("invalid_uuid")],
        )
    })
}

/// Collect an optional UUID query value; absence stays `None`, malformed
/// values record a violation.
pub(crate) fn parse_optional_uuid(
    violations: &mut ConstraintViolations,
    field: &'static str,
    raw: Option<String>,
) -> Option<Uuid> {
    let raw = raw?;
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            violations.push(
                FieldViolation::new(field, format!("{field} must be a valid UUID"))
                    .with_code("invalid_uuid"),
            );
            None
        }
    }
}

/// Raw pagination window as it arrives on the query string.
///
/// Numeric parameters arrive as strings and are coerced before any range
/// check; coercion failure carries its own code.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Page size; defaults to 20, capped at 100.
    pub limit: Option<String>,
    /// Rows skipped before the page; defaults to 0.
    pub offset: Option<String>,
}

fn coerce_integer(
    violations: &mut ConstraintViolations,
    field: &'static str,
    raw: Option<String>,
    default: i64,
) -> Option<i64> {
    let Some(raw) = raw else {
        return Some(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            violations.push(
                FieldViolation::new(field, format!("{field} must be an integer"))
                    .with_code("not_a_number"),
            );
            None
        }
    }
}

fn bounds_violation(field: &'static str, error: &PageBoundsError) -> FieldViolation {
    FieldViolation::new(field, error.to_string()).with_code("out_of_range")
}

/// Coerce and range-check the pagination window into `violations`, applying
/// defaults. Returns `None` when any window constraint failed.
pub(crate) fn collect_page_query(
    violations: &mut ConstraintViolations,
    query: PageQuery,
) -> Option<PageRequest> {
    let limit = coerce_integer(violations, "limit", query.limit, DEFAULT_LIMIT);
    let offset = coerce_integer(violations, "offset", query.offset, 0);

    let mut in_range = true;
    if let Some(limit) = limit {
        if let Err(error) = pagination::check_limit(limit) {
            violations.push(bounds_violation("limit", &error));
            in_range = false;
        }
    }
    if let Some(offset) = offset {
        if let Err(error) = pagination::check_offset(offset) {
            violations.push(bounds_violation("offset", &error));
            in_range = false;
        }
    }

    match (limit, offset, in_range) {
        // Both bounds coerced and passed their range checks.
        (Some(limit), Some(offset), true) => PageRequest::new(limit, offset).ok(),
        _ => None,
    }
}

/// Coerce and range-check the pagination window, applying defaults.
pub(crate) fn parse_page_query(query: PageQuery) -> Result<PageRequest, DomainError> {
    let mut violations = ConstraintViolations::new();
    let page = collect_page_query(&mut violations, query);
    violations.finish("query parameters are invalid")?;
    Ok(page.unwrap_or_default())
}
