//! User aggregate and its constrained value types.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted user name, in characters.
pub const USER_NAME_MAX: usize = 120;
/// Longest accepted email address, per the usual mailbox limit.
pub const EMAIL_MAX: usize = 254;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFieldError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Name exceeds [`USER_NAME_MAX`] characters.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email exceeds [`EMAIL_MAX`] characters.
    EmailTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Email does not look like a mailbox address.
    InvalidEmail,
}

impl fmt::Display for UserFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a well-formed address"),
        }
    }
}

impl std::error::Error for UserFieldError {}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-readable name shown alongside a user's posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a name from raw input.
    ///
    /// The value is trimmed before the emptiness and length checks.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserFieldError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserFieldError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserFieldError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserFieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Pragmatic mailbox shape; length is enforced separately.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique, case-normalised email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address from raw input.
    ///
    /// The value is trimmed and lowercased so the uniqueness key is
    /// case-insensitive.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserFieldError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserFieldError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserFieldError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserFieldError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserFieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user account.
///
/// ## Invariants
/// - `deleted_at` is the soft-delete marker; repositories never return a
///   value with it set, so a `User` in the domain is always live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Reassemble a user from already-validated parts (repository use).
    pub fn from_parts(
        id: UserId,
        name: UserName,
        email: EmailAddress,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Soft-delete timestamp; `None` on every live read path.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Unique email address.
    pub email: EmailAddress,
}

/// Validated partial update for a user.
///
/// The inbound adapter guarantees at least one field is present before this
/// value reaches a use case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement display name, when supplied.
    pub name: Option<UserName>,
    /// Replacement email address, when supplied.
    pub email: Option<EmailAddress>,
}

impl UserPatch {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserFieldError::EmptyName)]
    #[case("   ", UserFieldError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: UserFieldError) {
        assert_eq!(UserName::new(raw).expect_err("blank name"), expected);
    }

    #[test]
    fn rejects_overlong_name() {
        let raw = "x".repeat(USER_NAME_MAX + 1);
        assert_eq!(
            UserName::new(raw).expect_err("overlong name"),
            UserFieldError::NameTooLong { max: USER_NAME_MAX }
        );
    }

    #[test]
    fn trims_name_whitespace() {
        let name = UserName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada Lovelace");
    }

    #[rstest]
    #[case("ann@example.com")]
    #[case("a.b+tag@sub.example.org")]
    fn accepts_plausible_emails(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), raw);
    }

    #[rstest]
    #[case("not-an-email", UserFieldError::InvalidEmail)]
    #[case("missing@tld", UserFieldError::InvalidEmail)]
    #[case("two words@example.com", UserFieldError::InvalidEmail)]
    #[case("", UserFieldError::EmptyEmail)]
    fn rejects_malformed_emails(#[case] raw: &str, #[case] expected: UserFieldError) {
        assert_eq!(EmailAddress::new(raw).expect_err("invalid email"), expected);
    }

    #[test]
    fn lowercases_email_for_uniqueness() {
        let email = EmailAddress::new("Ann@Example.COM").expect("valid email");
        assert_eq!(email.as_ref(), "ann@example.com");
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            name: Some(UserName::new("Ann").expect("valid name")),
            email: None,
        };
        assert!(!patch.is_empty());
    }
}
