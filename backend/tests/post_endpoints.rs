//! End-to-end coverage of the post endpoints and their ownership rules.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use support::{error_message, login_token, signup, test_app, test_state};

/// Register mozart5 (id 1) and salieri (id 2), returning their tokens.
async fn register_two_users<S>(app: &S) -> (String, String)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    signup(app, "mozart5", "five@test.email", "p1").await;
    signup(app, "salieri", "six@test.email", "p2").await;
    let author = login_token(app, "five@test.email", "p1").await;
    let other = login_token(app, "six@test.email", "p2").await;
    (author, other)
}

#[actix_web::test]
async fn only_the_author_may_edit_a_post() {
    let app = test::init_service(test_app(test_state())).await;
    let (author, other) = register_two_users(&app).await;

    let create = test::TestRequest::post()
        .uri("/api/v1/post")
        .insert_header(("Authorization", author.clone()))
        .set_json(json!({ "title": "First post", "content": "hello" }))
        .to_request();
    let response = test::call_service(&app, create).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("author_id").and_then(Value::as_i64), Some(1));
    assert_eq!(body.get("status").and_then(Value::as_str), Some("live"));

    let hijack = test::TestRequest::put()
        .uri("/api/v1/post/1")
        .insert_header(("Authorization", other))
        .set_json(json!({ "title": "Hijacked", "content": "gotcha" }))
        .to_request();
    let response = test::call_service(&app, hijack).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Unauthorized.");

    let edit = test::TestRequest::put()
        .uri("/api/v1/post/1")
        .insert_header(("Authorization", author))
        .set_json(json!({ "title": "Edited", "content": "hello again" }))
        .to_request();
    let response = test::call_service(&app, edit).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("title").and_then(Value::as_str), Some("Edited"));
}

#[actix_web::test]
async fn reads_are_public_and_absences_map_to_not_found() {
    let app = test::init_service(test_app(test_state())).await;
    let (author, _other) = register_two_users(&app).await;

    let create = test::TestRequest::post()
        .uri("/api/v1/post")
        .insert_header(("Authorization", author))
        .set_json(json!({ "title": "First post", "content": "hello" }))
        .to_request();
    test::call_service(&app, create).await;

    let read = test::TestRequest::get().uri("/api/v1/post/1").to_request();
    let response = test::call_service(&app, read).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("title").and_then(Value::as_str), Some("First post"));

    let listing = test::TestRequest::get().uri("/api/v1/post").to_request();
    let response = test::call_service(&app, listing).await;
    assert_eq!(response.status(), StatusCode::OK);

    let missing = test::TestRequest::get().uri("/api/v1/post/99").to_request();
    let response = test::call_service(&app, missing).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Post not found.");
}

#[actix_web::test]
async fn an_empty_post_table_lists_as_no_content() {
    let app = test::init_service(test_app(test_state())).await;

    let listing = test::TestRequest::get().uri("/api/v1/post").to_request();
    let response = test::call_service(&app, listing).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn deletion_is_author_only_and_soft() {
    let app = test::init_service(test_app(test_state())).await;
    let (author, other) = register_two_users(&app).await;

    let create = test::TestRequest::post()
        .uri("/api/v1/post")
        .insert_header(("Authorization", author.clone()))
        .set_json(json!({ "title": "First post", "content": "hello" }))
        .to_request();
    test::call_service(&app, create).await;

    let hijack = test::TestRequest::delete()
        .uri("/api/v1/post/1")
        .insert_header(("Authorization", other))
        .to_request();
    let response = test::call_service(&app, hijack).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let delete = test::TestRequest::delete()
        .uri("/api/v1/post/1")
        .insert_header(("Authorization", author))
        .to_request();
    let response = test::call_service(&app, delete).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Soft delete: the row is still readable, with its status flipped.
    let read = test::TestRequest::get().uri("/api/v1/post/1").to_request();
    let response = test::call_service(&app, read).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("status").and_then(Value::as_str), Some("deleted"));
}

#[actix_web::test]
async fn editing_an_absent_post_is_not_found_before_ownership() {
    let app = test::init_service(test_app(test_state())).await;
    let (author, _other) = register_two_users(&app).await;

    let edit = test::TestRequest::put()
        .uri("/api/v1/post/99")
        .insert_header(("Authorization", author))
        .set_json(json!({ "title": "Anything", "content": "text" }))
        .to_request();
    let response = test::call_service(&app, edit).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Post not found.");
}
