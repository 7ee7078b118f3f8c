//! Post aggregate and its constrained value types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Longest accepted post title, in characters.
pub const POST_TITLE_MAX: usize = 200;
/// Longest accepted post body, in characters.
pub const POST_BODY_MAX: usize = 20_000;

/// Validation errors raised by post value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFieldError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Title exceeds [`POST_TITLE_MAX`] characters.
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Body was missing or blank once trimmed.
    EmptyBody,
    /// Body exceeds [`POST_BODY_MAX`] characters.
    BodyTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for PostFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "body must not be empty"),
            Self::BodyTooLong { max } => write!(f, "body must be at most {max} characters"),
        }
    }
}

impl std::error::Error for PostFieldError {}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
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

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a title from raw input.
    pub fn new(title: impl AsRef<str>) -> Result<Self, PostFieldError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PostFieldError::EmptyTitle);
        }
        if trimmed.chars().count() > POST_TITLE_MAX {
            return Err(PostFieldError::TitleTooLong {
                max: POST_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostTitle {
    type Error = PostFieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Post content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostBody(String);

impl PostBody {
    /// Validate and construct a body from raw input.
    ///
    /// Content whitespace is preserved; only fully-blank bodies are rejected.
    pub fn new(body: impl Into<String>) -> Result<Self, PostFieldError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(PostFieldError::EmptyBody);
        }
        if body.chars().count() > POST_BODY_MAX {
            return Err(PostFieldError::BodyTooLong { max: POST_BODY_MAX });
        }
        Ok(Self(body))
    }
}

impl AsRef<str> for PostBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PostBody> for String {
    fn from(value: PostBody) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostBody {
    type Error = PostFieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Published post owned by a user.
///
/// ## Invariants
/// - `author_id` references a user that existed when the post was created.
/// - `deleted_at` is the soft-delete marker; repositories never return a
///   value with it set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    author_id: UserId,
    title: PostTitle,
    body: PostBody,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Reassemble a post from already-validated parts (repository use).
    pub fn from_parts(
        id: PostId,
        author_id: UserId,
        title: PostTitle,
        body: PostBody,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            body,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Owning user.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Headline.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Content.
    pub fn body(&self) -> &PostBody {
        &self.body
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

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Owning user; always the authenticated principal.
    pub author_id: UserId,
    /// Headline.
    pub title: PostTitle,
    /// Content.
    pub body: PostBody,
}

/// Validated partial update for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    /// Replacement title, when supplied.
    pub title: Option<PostTitle>,
    /// Replacement body, when supplied.
    pub body: Option<PostBody>,
}

impl PostPatch {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", PostFieldError::EmptyTitle)]
    #[case("   ", PostFieldError::EmptyTitle)]
    fn rejects_blank_titles(#[case] raw: &str, #[case] expected: PostFieldError) {
        assert_eq!(PostTitle::new(raw).expect_err("blank title"), expected);
    }

    #[test]
    fn rejects_overlong_title() {
        let raw = "x".repeat(POST_TITLE_MAX + 1);
        assert_eq!(
            PostTitle::new(raw).expect_err("overlong title"),
            PostFieldError::TitleTooLong {
                max: POST_TITLE_MAX
            }
        );
    }

    #[test]
    fn body_preserves_inner_whitespace() {
        let body = PostBody::new("line one\n\nline two").expect("valid body");
        assert_eq!(body.as_ref(), "line one\n\nline two");
    }

    #[test]
    fn rejects_blank_body() {
        assert_eq!(
            PostBody::new("  \n  ").expect_err("blank body"),
            PostFieldError::EmptyBody
        );
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(PostPatch::default().is_empty());
        let patch = PostPatch {
            title: Some(PostTitle::new("Hello").expect("valid title")),
            body: None,
        };
        assert!(!patch.is_empty());
    }
}
