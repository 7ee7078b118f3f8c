//! End-to-end scenarios for the posts endpoints over in-memory storage.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::{create_user, login, read_problem, test_app};

#[actix_web::test]
async fn create_post_requires_a_session() {
    let app = test::init_service(test_app()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "title": "Hello", "body": "World." }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let problem = read_problem(response).await;
    assert_eq!(problem["detail"], "Authentication required");
}

#[actix_web::test]
async fn created_post_belongs_to_the_session_principal() {
    let app = test::init_service(test_app()).await;
    let ann = create_user(&app, "Ann", "ann@example.com").await;
    let ann_id = ann["data"]["id"].as_str().expect("id present");
    let cookie = login(&app, "ann@example.com").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(json!({ "title": "Hello", "body": "First post." }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["authorId"], ann_id);
    assert_eq!(body["data"]["title"], "Hello");
    assert!(body["data"]["deletedAt"].is_null());
}

#[actix_web::test]
async fn empty_post_payload_lists_every_violation() {
    let app = test::init_service(test_app()).await;
    create_user(&app, "Ann", "ann@example.com").await;
    let cookie = login(&app, "ann@example.com").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem = read_problem(response).await;
    let errors = problem["errors"].as_array().expect("errors listed");
    assert_eq!(errors.len(), 2);
}

#[actix_web::test]
async fn posts_are_publicly_readable() {
    let app = test::init_service(test_app()).await;
    create_user(&app, "Ann", "ann@example.com").await;
    let cookie = login(&app, "ann@example.com").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(json!({ "title": "Hello", "body": "First post." }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let id = created["data"]["id"].as_str().expect("id present");

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(fetched).await;
    assert_eq!(fetched["data"], created["data"]);
}

#[actix_web::test]
async fn listing_filters_by_author() {
    let app = test::init_service(test_app()).await;
    let ann = create_user(&app, "Ann", "ann@example.com").await;
    let ann_id = ann["data"]["id"].as_str().expect("id present").to_owned();
    create_user(&app, "Ben", "ben@example.com").await;

    let ann_cookie = login(&app, "ann@example.com").await;
    for i in 0..2 {
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(ann_cookie.clone())
                .set_json(json!({ "title": format!("Ann {i}"), "body": "Text." }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let ben_cookie = login(&app, "ben@example.com").await;
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(ben_cookie)
            .set_json(json!({ "title": "Ben 0", "body": "Text." }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let all = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/posts").to_request(),
    )
    .await;
    let all: Value = test::read_body_json(all).await;
    assert_eq!(all["pagination"]["total"], 3);

    let filtered = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts?authorId={ann_id}"))
            .to_request(),
    )
    .await;
    let filtered: Value = test::read_body_json(filtered).await;
    assert_eq!(filtered["pagination"]["total"], 2);
    let authors: Vec<&str> = filtered["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|post| post["authorId"].as_str())
        .collect();
    assert!(authors.iter().all(|author| *author == ann_id));
}

#[actix_web::test]
async fn non_owner_cannot_edit_or_delete() {
    let app = test::init_service(test_app()).await;
    create_user(&app, "Ann", "ann@example.com").await;
    create_user(&app, "Ben", "ben@example.com").await;

    let ann_cookie = login(&app, "ann@example.com").await;
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(ann_cookie)
            .set_json(json!({ "title": "Hello", "body": "Mine." }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let id = created["data"]["id"].as_str().expect("id present");

    let ben_cookie = login(&app, "ben@example.com").await;
    let patched = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(ben_cookie.clone())
            .set_json(json!({ "title": "Stolen" }))
            .to_request(),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::UNAUTHORIZED);
    let problem = read_problem(patched).await;
    assert_eq!(problem["detail"], "only the author may edit this post");

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(ben_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn owner_edits_and_soft_deletes_their_post() {
    let app = test::init_service(test_app()).await;
    create_user(&app, "Ann", "ann@example.com").await;
    let cookie = login(&app, "ann@example.com").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Hello", "body": "Mine." }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let id = created["data"]["id"].as_str().expect("id present");

    let patched = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Edited" }))
            .to_request(),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::OK);
    let patched: Value = test::read_body_json(patched).await;
    assert_eq!(patched["data"]["title"], "Edited");
    assert_eq!(patched["data"]["body"], "Mine.");

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);

    let again = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn empty_post_patch_is_rejected() {
    let app = test::init_service(test_app()).await;
    create_user(&app, "Ann", "ann@example.com").await;
    let cookie = login(&app, "ann@example.com").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Hello", "body": "Mine." }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let id = created["data"]["id"].as_str().expect("id present");

    let response = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem = read_problem(response).await;
    assert_eq!(problem["errors"][0]["code"], "no_fields_to_update");
}

#[actix_web::test]
async fn listing_rejects_malformed_author_filter() {
    let app = test::init_service(test_app()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts?authorId=nope")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem = read_problem(response).await;
    assert_eq!(problem["errors"][0]["field"], "authorId");
    assert_eq!(problem["errors"][0]["code"], "invalid_uuid");
}
