//! Shared harness for the HTTP integration tests: a fully wired app over
//! the in-process adapters plus request helpers.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test};
use serde_json::{Value, json};

use backend::domain::Registration;
use backend::domain::user::{Email, Username};
use backend::inbound::http::configure_api;
use backend::inbound::http::state::HttpState;
use backend::server::build_state;
use backend::server::config::AppConfig;

/// Deterministic configuration for tests: fixed secret, default windows.
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        token_secret: "integration-test-secret".to_owned(),
        token_ttl: chrono::Duration::seconds(1800),
        cache_ttl: std::time::Duration::from_secs(60),
        admin_seed: None,
    }
}

/// Fresh state over empty in-memory stores.
pub fn test_state() -> HttpState {
    build_state(&test_config())
}

/// Seed an administrator account directly through the domain service.
pub async fn seed_admin(state: &HttpState, username: &str, email: &str, password: &str) {
    let registration = Registration::new(
        Username::new(username).expect("admin username"),
        Email::new(email).expect("admin email"),
        password,
    )
    .expect("admin registration");
    state
        .users
        .ensure_admin(registration)
        .await
        .expect("admin seeding");
}

/// Application under test, mounted exactly as in production.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().configure(|cfg| configure_api(cfg, state))
}

pub async fn signup<S>(app: &S, username: &str, email: &str, password: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .to_request();
    test::call_service(app, request).await
}

pub async fn login<S>(app: &S, email: &str, password: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, request).await
}

/// Log in and unwrap the issued token.
pub async fn login_token<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = login(app, email, password).await;
    assert_eq!(
        response.status(),
        actix_web::http::StatusCode::OK,
        "login should succeed"
    );
    let body: Value = test::read_body_json(response).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in login payload")
        .to_owned()
}

/// The `message` field of an error envelope.
pub async fn error_message(response: ServiceResponse) -> String {
    let body: Value = test::read_body_json(response).await;
    body.get("message")
        .and_then(Value::as_str)
        .expect("message in error payload")
        .to_owned()
}
