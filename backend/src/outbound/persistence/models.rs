//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Row-to-entity conversion re-validates the constrained value types
//! so a row that drifted outside the domain invariants surfaces as a query
//! error instead of a malformed entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    EmailAddress, Post, PostBody, PostId, PostTitle, User, UserId, UserName,
};

use super::schema::{posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Rebuild the domain entity, re-checking the value invariants.
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let name = UserName::new(&self.name).map_err(|err| err.to_string())?;
        let email = EmailAddress::new(&self.email).map_err(|err| err.to_string())?;
        Ok(User::from_parts(
            UserId::from_uuid(self.id),
            name,
            email,
            self.created_at,
            self.updated_at,
            self.deleted_at,
        ))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
}

/// Changeset struct for partial user updates.
///
/// `None` fields are left untouched by Diesel; `updated_at` is always set.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PostRow {
    /// Rebuild the domain entity, re-checking the value invariants.
    pub(crate) fn into_domain(self) -> Result<Post, String> {
        let title = PostTitle::new(&self.title).map_err(|err| err.to_string())?;
        let body = PostBody::new(self.body).map_err(|err| err.to_string())?;
        Ok(Post::from_parts(
            PostId::from_uuid(self.id),
            UserId::from_uuid(self.author_id),
            title,
            body,
            self.created_at,
            self.updated_at,
            self.deleted_at,
        ))
    }
}

/// Insertable struct for creating new post records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
}

/// Changeset struct for partial post updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostChangeset<'a> {
    pub title: Option<&'a str>,
    pub body: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
