//! OpenAPI document assembled from the annotated handlers.

use utoipa::OpenApi;

use crate::domain::error::FieldViolation;
use crate::inbound::http::posts::{
    CreatePostRequest, PostResponse, UpdatePostRequest,
};
use crate::inbound::http::problem::Problem;
use crate::inbound::http::schemas::{DataEnvelope, ListEnvelope, PageMeta};
use crate::inbound::http::users::{
    CreateUserRequest, LoginRequest, UpdateUserRequest, UserResponse,
};

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
        crate::inbound::http::users::login,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
    ),
    components(schemas(
        Problem,
        FieldViolation,
        PageMeta,
        LoginRequest,
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        DataEnvelope<UserResponse>,
        ListEnvelope<UserResponse>,
        CreatePostRequest,
        UpdatePostRequest,
        PostResponse,
        DataEnvelope<PostResponse>,
        ListEnvelope<PostResponse>,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "posts", description = "Posts owned by users"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;
