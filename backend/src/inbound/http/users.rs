//! Users API handlers.
//!
//! ```text
//! POST /api/v1/login          {"email":"ann@example.com"}
//! POST /api/v1/users          {"name":"Ann","email":"ann@example.com"}
//! GET /api/v1/users?limit=20&offset=0
//! GET /api/v1/users/{id}
//! PATCH /api/v1/users/{id}    {"name":"...", "email":"..."}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DomainError, DomainResult, EmailAddress, FieldViolation, NewUser, User, UserId, UserName,
    UserPatch,
};
use crate::inbound::http::problem::{ApiResult, Problem};
use crate::inbound::http::schemas::{DataEnvelope, ListEnvelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_page_query, parse_path_uuid, user_field_code, ConstraintViolations, PageQuery,
};

/// User as serialized on the wire.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last-modification timestamp, RFC 3339.
    pub updated_at: String,
    /// Soft-delete timestamp; always null on live reads.
    pub deleted_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            email: value.email().to_string(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
            deleted_at: value.deleted_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Address of the account to act as.
    pub email: Option<String>,
}

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Display name.
    pub name: Option<String>,
    /// Unique email address.
    pub email: Option<String>,
}

/// Request body for `PATCH /api/v1/users/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
}

/// Validate the login payload into a typed email address.
fn parse_login_input(payload: LoginRequest) -> DomainResult<EmailAddress> {
    let mut violations = ConstraintViolations::new();
    let email = violations
        .require("email", payload.email)
        .and_then(|raw| violations.check("email", EmailAddress::new(raw), user_field_code));
    violations.finish("login payload is invalid")?;
    email.ok_or_else(|| DomainError::unexpected("email missing after validation"))
}

/// Validate the create payload, collecting every violated constraint.
fn parse_create_user_input(payload: CreateUserRequest) -> DomainResult<NewUser> {
    let mut violations = ConstraintViolations::new();

    let name = violations
        .require("name", payload.name)
        .and_then(|raw| violations.check("name", UserName::new(raw), user_field_code));
    let email = violations
        .require("email", payload.email)
        .and_then(|raw| violations.check("email", EmailAddress::new(raw), user_field_code));

    violations.finish("user payload is invalid")?;
    match (name, email) {
        (Some(name), Some(email)) => Ok(NewUser { name, email }),
        _ => Err(DomainError::unexpected(
            "fields missing after validation",
        )),
    }
}

/// Validate the partial-update payload.
///
/// Per-field constraints run first; the cross-field "at least one updatable
/// field" rule is checked afterwards so a malformed field and an empty body
/// are reported distinctly.
fn parse_update_user_input(payload: UpdateUserRequest) -> DomainResult<UserPatch> {
    let mut violations = ConstraintViolations::new();

    let supplied_any = payload.name.is_some() || payload.email.is_some();
    let name = payload
        .name
        .and_then(|raw| violations.check("name", UserName::new(raw), user_field_code));
    let email = payload
        .email
        .and_then(|raw| violations.check("email", EmailAddress::new(raw), user_field_code));

    if !supplied_any {
        violations.push(
            FieldViolation::new("body", "at least one updatable field is required")
                .with_code("no_fields_to_update"),
        );
    }

    violations.finish("user patch is invalid")?;
    Ok(UserPatch { name, email })
}

/// Establish the session principal by email.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = DataEnvelope<UserResponse>),
        (status = 400, description = "Invalid payload", body = Problem),
        (status = 401, description = "Unknown account", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_login_input(payload.into_inner())?;
    let user = state.login.login(email).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(UserResponse::from(user))))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = DataEnvelope<UserResponse>),
        (status = 400, description = "Invalid payload", body = Problem),
        (status = 409, description = "Email already registered", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let input = parse_create_user_input(payload.into_inner())?;
    let user = state.users.create_user(input).await?;
    Ok(HttpResponse::Created().json(DataEnvelope::new(UserResponse::from(user))))
}

/// Page through registered users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users page", body = ListEnvelope<UserResponse>),
        (status = 400, description = "Invalid query", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = parse_page_query(query.into_inner())?;
    let users = state.users_query.list_users(page).await?;
    let envelope = ListEnvelope::new(users.map(UserResponse::from), page);
    Ok(HttpResponse::Ok().json(envelope))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 200, description = "User", body = DataEnvelope<UserResponse>),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Unknown or deleted user", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = UserId::from_uuid(parse_path_uuid("id", &path.into_inner())?);
    let user = state.users_query.get_user(id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(UserResponse::from(user))))
}

/// Apply a partial update to the acting user's account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    request_body = UpdateUserRequest,
    params(("id" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 200, description = "Updated user", body = DataEnvelope<UserResponse>),
        (status = 400, description = "Invalid payload", body = Problem),
        (status = 401, description = "Not the account owner", body = Problem),
        (status = 404, description = "Unknown or deleted user", body = Problem),
        (status = 409, description = "Email already registered", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let target = UserId::from_uuid(parse_path_uuid("id", &path.into_inner())?);
    let patch = parse_update_user_input(payload.into_inner())?;
    let user = state.users.update_user(actor, target, patch).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(UserResponse::from(user))))
}

/// Soft-delete the acting user's account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 401, description = "Not the account owner", body = Problem),
        (status = 404, description = "Unknown or already deleted user", body = Problem),
        (status = 500, description = "Internal server error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let target = UserId::from_uuid(parse_path_uuid("id", &path.into_inner())?);
    state.users.delete_user(actor, target).await?;
    Ok(HttpResponse::NoContent().finish())
}
