//! PostgreSQL-backed `PostRepository` implementation using Diesel.
//!
//! Listing supports an optional author filter; the page total is computed
//! against the same filtered scope. Soft deletion carries the same
//! `deleted_at IS NULL` guard on every statement as the user repository.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageRequest, Paged};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PostListFilter, PostRepository, PostRepositoryError};
use crate::domain::{NewPost, Post, PostId, PostPatch};

use super::models::{NewPostRow, PostChangeset, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Live rows narrowed by the listing filter.
    fn scope(filter: PostListFilter) -> posts::BoxedQuery<'static, diesel::pg::Pg> {
        let mut query = posts::table.filter(posts::deleted_at.is_null()).into_boxed();
        if let Some(author) = filter.author_id {
            query = query.filter(posts::author_id.eq(author.as_uuid()));
        }
        query
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PostRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PostRepositoryError::connection("database connection error")
        }
        _ => PostRepositoryError::query("database error"),
    }
}

fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    row.into_domain().map_err(PostRepositoryError::query)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            id: Uuid::new_v4(),
            author_id: new_post.author_id.as_uuid(),
            title: new_post.title.as_ref(),
            body: new_post.body.as_ref(),
        };

        let inserted = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result::<PostRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_post(inserted)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .filter(posts::deleted_at.is_null())
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_post).transpose()
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: PostListFilter,
    ) -> Result<Paged<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total = Self::scope(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows = Self::scope(filter)
            .order(posts::created_at.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(PostRow::as_select())
            .load::<PostRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_post)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Paged::new(items, u64::try_from(total).unwrap_or(0)))
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = PostChangeset {
            title: patch.title.as_ref().map(AsRef::as_ref),
            body: patch.body.as_ref().map(AsRef::as_ref),
            updated_at: Utc::now(),
        };

        let updated = diesel::update(
            posts::table
                .filter(posts::id.eq(id.as_uuid()))
                .filter(posts::deleted_at.is_null()),
        )
        .set(&changeset)
        .returning(PostRow::as_returning())
        .get_result::<PostRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        updated
            .ok_or(PostRepositoryError::RowMissing)
            .and_then(row_to_post)
    }

    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            posts::table
                .filter(posts::id.eq(id.as_uuid()))
                .filter(posts::deleted_at.is_null()),
        )
        .set(posts::deleted_at.eq(Some(Utc::now())))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if affected == 0 {
            Err(PostRepositoryError::RowMissing)
        } else {
            Ok(())
        }
    }
}
