//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{PostService, UserService};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::posts::{create_post, delete_post, get_post, list_posts, update_post};
use crate::inbound::http::problem::{json_error_handler, query_error_handler};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{
    create_user, delete_user, get_user, list_users, login, update_user,
};
use crate::outbound::memory::{InMemoryPostRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselPostRepository, DieselUserRepository};

/// Everything `build_app` needs to assemble one worker's application.
#[derive(Clone)]
pub struct AppDependencies {
    /// Port implementations for the HTTP handlers.
    pub state: HttpState,
    /// Shared probe state.
    pub health: web::Data<HealthState>,
    /// Session cookie signing/encryption key.
    pub key: Key,
    /// Whether the session cookie requires HTTPS.
    pub cookie_secure: bool,
}

/// Wire the HTTP state from the Diesel adapters.
fn diesel_state(pool: crate::outbound::persistence::DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool));
    let user_service = Arc::new(UserService::new(Arc::clone(&users)));
    let post_service = Arc::new(PostService::new(posts, users));
    HttpState::from_services(user_service, post_service)
}

/// Wire the HTTP state from the in-memory adapters.
pub fn in_memory_state() -> HttpState {
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let user_service = Arc::new(UserService::new(Arc::clone(&users)));
    let post_service = Arc::new(PostService::new(posts, users));
    HttpState::from_services(user_service, post_service)
}

/// Assemble the application: error handlers, session middleware, routes, and
/// (in debug builds) the Swagger UI.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        state,
        health,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

    let app = App::new()
        .app_data(web::Data::new(state))
        .app_data(health)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(session)
        .service(live)
        .service(ready)
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(create_user)
                .service(list_users)
                .service(get_user)
                .service(update_user)
                .service(delete_user)
                .service(create_post)
                .service(list_posts)
                .service(get_post)
                .service(update_post)
                .service(delete_post),
        );

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Bind and start the HTTP server described by `config`.
///
/// # Errors
/// Returns [`std::io::Error`] when the listener cannot be bound.
pub fn run(config: ServerConfig) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        db_pool,
    } = config;

    let state = match db_pool {
        Some(pool) => diesel_state(pool),
        None => in_memory_state(),
    };
    let health = web::Data::new(HealthState::new());
    let server_health = health.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            state: state.clone(),
            health: server_health.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok((server, health))
}
