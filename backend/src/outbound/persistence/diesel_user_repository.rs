//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Soft deletion is enforced here: every statement carries the
//! `deleted_at IS NULL` guard, so deleted rows are invisible to all reads and
//! immune to further writes. The unique index on `users.email` is the
//! authoritative duplicate check; its violation surfaces as
//! [`UserRepositoryError::DuplicateEmail`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageRequest, Paged};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, NewUser, User, UserId, UserPatch};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        _ => UserRepositoryError::query("database error"),
    }
}

/// Mutation mapping: a unique violation on the email index becomes the
/// dedicated duplicate error so the use case can translate it to a conflict.
fn map_write_error(email: &str, error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserRepositoryError::duplicate_email(email);
    }
    map_diesel_error(error)
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row.into_domain().map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            name: new_user.name.as_ref(),
            email: new_user.email.as_ref(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(|error| map_write_error(new_user.email.as_ref(), error))?;
        row_to_user(inserted)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .filter(users::deleted_at.is_null())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .filter(users::deleted_at.is_null())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Paged<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total = users::table
            .filter(users::deleted_at.is_null())
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows = users::table
            .filter(users::deleted_at.is_null())
            .order(users::created_at.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Paged::new(items, u64::try_from(total).unwrap_or(0)))
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserChangeset {
            name: patch.name.as_ref().map(AsRef::as_ref),
            email: patch.email.as_ref().map(AsRef::as_ref),
            updated_at: Utc::now(),
        };

        let updated = diesel::update(
            users::table
                .filter(users::id.eq(id.as_uuid()))
                .filter(users::deleted_at.is_null()),
        )
        .set(&changeset)
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(&mut conn)
        .await
        .optional()
        .map_err(|error| match patch.email.as_ref() {
            Some(email) => map_write_error(email.as_ref(), error),
            None => map_diesel_error(error),
        })?;

        updated
            .ok_or(UserRepositoryError::RowMissing)
            .and_then(row_to_user)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            users::table
                .filter(users::id.eq(id.as_uuid()))
                .filter(users::deleted_at.is_null()),
        )
        .set(users::deleted_at.eq(Some(Utc::now())))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if affected == 0 {
            Err(UserRepositoryError::RowMissing)
        } else {
            Ok(())
        }
    }
}
