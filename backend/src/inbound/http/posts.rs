//! Posts API handlers.
//!
//! ```text
//! POST /api/v1/posts          {"title":"...","body":"..."}
//! GET /api/v1/posts?limit=20&offset=0&authorId=...
//! GET /api/v1/posts/{id}
//! PATCH /api/v1/posts/{id}    {"title":"...", "body":"..."}
//! DELETE /api/v1/posts/{id}
//! ```
//!
//! The acting author always comes from the session; request payloads carry
//! content only.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::PostListFilter;
use crate::domain::{
    DomainError, DomainResult, FieldViolation, NewPost, Post, PostBody, PostId, PostPatch,
    PostTitle, UserId,
};
use crate::inbound::http::problem::{ApiResult, Problem};
use crate::inbound::http::schemas::{DataEnvelope, ListEnvelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    collect_page_query, parse_optional_uuid, parse_path_uuid, post_field_code,
    ConstraintViolations, PageQuery,
};

/// Post as serialized on the wire.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Stable identifier.
    pub id: String,
    /// Owning user.
    pub author_id: String,
    /// Headline.
    pub title: String,
    /// Content.
    pub body: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last-modification timestamp, RFC 3339.
    pub updated_at: String,
    /// Soft-delete timestamp; always null on live reads.
    pub deleted_at: Option<String>,
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            id: value.id().to_string(),
            author_id: value.author_id().to_string(),
            title: value.title().to_string(),
            body: value.body().to_string(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
            deleted_at: value.deleted_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Request body for `POST /api/v1/posts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Headline.
    pub title: Option<String>,
    /// Content.
    pub body: Option<String>,
}

/// Request body for `PATCH /api/v1/posts/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    /// Replacement headline.
    pub title: Option<String>,
    /// Replacement content.
    pub body: Option<String>,
}

/// Query string for `GET /api/v1/posts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    /// Page size; defaults to 20, capped at 100.
    pub limit: Option<String>,
    /// Rows skipped before the page; defaults to 0.
    pub offset: Option<String>,
    /// Restrict the listing to one author's posts.
    pub author_id: Option<String>,
}

/// Validate the create payload, collecting every violated constraint.
fn parse_create_post_input(actor: UserId, payload: CreatePostRequest) -> DomainResult<NewPost> {
    let mut violations = ConstraintViolations::new();

    let title = violations
        .require("title", payload.title)
        .and_then(|raw| violations.check("title", PostTitle::new(raw), post_field_code));
    let body = violations
        .require("body", payload.body)
        .and_then(|raw| violations.check("body", PostBody::new(raw), post_field_code));

    violations.finish("post payload is invalid")?;
    match (title, body) {
        (Some(title), Some(body)) => Ok(NewPost {
            author_id: actor,
            title,
            body,
        }),
        _ => Err(DomainError::unexpected(
            "fields missing after validation",
        )),
    }
}

/// Validate the partial-update payload; the cross-field "at least one field"
/// rule runs after the per-field checks.
fn parse_update_post_input(payload: UpdatePostRequest) -> DomainResult<PostPatch> {
    let mut violations = ConstraintViolations::new();

    let supplied_any = payload.title.is_some() || payload.body.is_some();
    let title = payload
        .title
        .and_then(|raw| violations.check("title", PostTitle::new(raw), post_field_code));
    let body = payload
        .body
        .and_then(|raw| violations.check("body", PostBody::new(raw), post_field_code));

    if !supplied_any {
        violations.push(
            FieldViolation::new("body", "at least one updatable field is required")
                .with_code("no_fields_to_update"),
        );
    }

    violations.finish("post patch is invalid")?;
    Ok(PostPatch { title, body })
}

/// Validate the listing query, collecting window and filter violations
/// together.
fn parse_list_posts_query(
    query: ListPostsQuery,
) -> DomainResult<(pagination::PageRequest, PostListFilter)> {
    let mut violations = ConstraintViolations::new();
    let page = collect_page_query(
        &mut violations,
        PageQuery {
            limit: query.limit,
            offset: query.offset,
        },
    );
    let author_id = parse_optional_uuid(&mut violations, "authorId", query.author_id);
    violations.finish("query parameters are invalid")?;
    Ok((
        page.unwrap_or_default(),
        PostListFilter {
            author_id: author_id.map(UserId::from_uuid),
        },
    ))
}

/// Publish a new post as the acting user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = DataEnvelope<PostResponse>),
        (status = 400, description = "Invalid payload", body = Problem),
        (status = 401, description = "No session", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let input = parse_create_post_input(actor, payload.into_inner())?;
    let post = state.posts.create_post(input).await?;
    Ok(HttpResponse::Created().json(DataEnvelope::new(PostResponse::from(post))))
}

/// Page through published posts.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts page", body = ListEnvelope<PostResponse>),
        (status = 400, description = "Invalid query", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    query: web::Query<ListPostsQuery>,
) -> ApiResult<HttpResponse> {
    let (page, filter) = parse_list_posts_query(query.into_inner())?;
    let posts = state.posts_query.list_posts(page, filter).await?;
    let envelope = ListEnvelope::new(posts.map(PostResponse::from), page);
    Ok(HttpResponse::Ok().json(envelope))
}

/// Fetch one post by id.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id (UUID)")),
    responses(
        (status = 200, description = "Post", body = DataEnvelope<PostResponse>),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Unknown or deleted post", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = PostId::from_uuid(parse_path_uuid("id", &path.into_inner())?);
    let post = state.posts_query.get_post(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(PostResponse::from(post))))
}

/// Apply a partial update to one of the acting user's posts.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    request_body = UpdatePostRequest,
    params(("id" = String, Path, description = "Post id (UUID)")),
    responses(
        (status = 200, description = "Updated post", body = DataEnvelope<PostResponse>),
        (status = 400, description = "Invalid payload", body = Problem),
        (status = 401, description = "Not the post author", body = Problem),
        (status = 404, description = "Unknown or deleted post", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[patch("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = PostId::from_uuid(parse_path_uuid("id", &path.into_inner())?);
    let patch = parse_update_post_input(payload.into_inner())?;
    let post = state.posts.update_post(actor, id, patch).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(PostResponse::from(post))))
}

/// Soft-delete one of the acting user's posts.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id (UUID)")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 401, description = "Not the post author", body = Problem),
        (status = 404, description = "Unknown or already deleted post", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = PostId::from_uuid(parse_path_uuid("id", &path.into_inner())?);
    state.posts.delete_post(actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
