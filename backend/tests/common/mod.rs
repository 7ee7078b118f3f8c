//! Shared helpers for endpoint integration tests.
//!
//! Each test assembles the real router over fresh in-memory repositories, so
//! scenarios run end to end without PostgreSQL and without sharing state.

use actix_http::Request;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use backend::inbound::http::health::HealthState;
use backend::server::{build_app, in_memory_state, AppDependencies};

/// Assemble the application over fresh in-memory stores.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    build_app(AppDependencies {
        state: in_memory_state(),
        health: web::Data::new(HealthState::new()),
        key: Key::generate(),
        cookie_secure: false,
    })
}

/// Register a user and return the response body.
pub async fn create_user(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    email: &str,
) -> Value {
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "name": name, "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(response).await
}

/// Establish a session for `email` and return its cookie.
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Assert the response is a problem document and return its body.
pub async fn read_problem(response: ServiceResponse) -> Value {
    let content_type = response
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    test::read_body_json(response).await
}
