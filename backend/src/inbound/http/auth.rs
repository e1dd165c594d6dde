//! Authentication endpoints: login and signup.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::user::{Email, Username};
use crate::domain::{Error, LoginCredentials, Registration, RegistrationOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "five@test.email")]
    pub email: String,
    #[schema(example = "p1")]
    pub password: String,
}

/// Signup request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "mozart5")]
    pub username: String,
    #[schema(example = "five@test.email")]
    pub email: String,
    #[schema(example = "p1")]
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

impl TryFrom<&SignupRequest> for Registration {
    type Error = Error;

    fn try_from(value: &SignupRequest) -> Result<Self, Error> {
        let username =
            Username::new(&value.username).map_err(|err| Error::invalid_request(err.to_string()))?;
        let email =
            Email::new(&value.email).map_err(|err| Error::invalid_request(err.to_string()))?;
        Registration::new(username, email, &value.password)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Authenticate and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successfully logged in.", body = TokenResponse),
        (status = 400, description = "Bad input.", body = ApiError),
        (status = 401, description = "Login required.", body = ApiError),
        (status = 403, description = "Unable to authenticate.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|_| Error::unauthorized("Login required."))?;
    let token = state.auth.login(&credentials).await?;
    Ok(web::Json(TokenResponse { token }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User successfully registered.", body = String),
        (status = 202, description = "User already exists.", body = String),
        (status = 400, description = "Bad input.", body = ApiError),
        (status = 409, description = "Database conflict.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(&*payload)?;
    match state.auth.register(registration).await? {
        RegistrationOutcome::Registered(_) => {
            Ok(HttpResponse::Created().json("User successfully registered."))
        }
        RegistrationOutcome::AlreadyRegistered => {
            Ok(HttpResponse::Accepted().json("User already exists."))
        }
    }
}
