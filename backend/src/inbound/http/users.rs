//! User management endpoints.
//!
//! Listing, fetching, and creating accounts are administrator operations.
//! Updating and deleting are owner operations: the services compare the
//! caller's internal id against the target before mutating. The
//! posts-by-author listing is public and served through the cache.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::user::{Email, User, UserId, UserUpdate, Username};
use crate::domain::{Error, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::identity::BearerToken;
use crate::inbound::http::posts::PostResponse;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/user`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /api/v1/user/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// User payload. The public identifier stands in for the storage key.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.public_id().as_uuid(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

impl TryFrom<&CreateUserRequest> for Registration {
    type Error = Error;

    fn try_from(value: &CreateUserRequest) -> Result<Self, Error> {
        let username =
            Username::new(&value.username).map_err(|err| Error::invalid_request(err.to_string()))?;
        let email =
            Email::new(&value.email).map_err(|err| Error::invalid_request(err.to_string()))?;
        Registration::new(username, email, &value.password)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Error> {
        let username = value
            .username
            .map(Username::new)
            .transpose()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let password = match value.password {
            Some(password) if password.is_empty() => {
                return Err(Error::invalid_request("password must not be empty"));
            }
            other => other.map(Zeroizing::new),
        };
        Ok(Self { username, password })
    }
}

/// Create an account (administrators only).
#[utoipa::path(
    post,
    path = "/api/v1/user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully.", body = UserResponse),
        (status = 400, description = "Bad input.", body = ApiError),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 403, description = "Forbidden.", body = ApiError),
        (status = 409, description = "Database conflict.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user")]
pub async fn create_user(
    token: BearerToken,
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    state.auth.require_admin(token.value()).await?;
    let registration = Registration::try_from(&*payload)?;
    let user = state.users.create(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// List every account (administrators only).
#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "Users fetched successfully.", body = [UserResponse]),
        (status = 204, description = "No users found."),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 403, description = "Forbidden.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/user")]
pub async fn list_users(token: BearerToken, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.auth.require_admin(token.value()).await?;
    let users = state.users.list().await?;
    if users.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let payload: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(payload))
}

/// Fetch one account (administrators only).
#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    params(("id" = i64, Path, description = "Internal user id")),
    responses(
        (status = 200, description = "User fetched successfully.", body = UserResponse),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 403, description = "Forbidden.", body = ApiError),
        (status = 404, description = "User not found.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}")]
pub async fn get_user(
    token: BearerToken,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    state.auth.require_admin(token.value()).await?;
    let user = state.users.get(UserId::new(path.into_inner())).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Update the caller's own account.
#[utoipa::path(
    put,
    path = "/api/v1/user/{id}",
    params(("id" = i64, Path, description = "Internal user id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 201, description = "User updated successfully.", body = UserResponse),
        (status = 400, description = "Bad input.", body = ApiError),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 404, description = "User not found.", body = ApiError),
        (status = 409, description = "Database conflict.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/user/{id}")]
pub async fn update_user(
    token: BearerToken,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let current = state.auth.require_user(token.value()).await?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    let user = state
        .users
        .update(UserId::new(path.into_inner()), update, &current)
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Soft-delete the caller's own account.
#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    params(("id" = i64, Path, description = "Internal user id")),
    responses(
        (status = 204, description = "User deleted successfully."),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 404, description = "User not found.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}")]
pub async fn delete_user(
    token: BearerToken,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let current = state.auth.require_user(token.value()).await?;
    state
        .users
        .delete(UserId::new(path.into_inner()), &current)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List one author's posts. Public, served through the cache.
#[utoipa::path(
    get,
    path = "/api/v1/user/{id}/posts",
    params(("id" = i64, Path, description = "Internal user id")),
    responses(
        (status = 200, description = "User posts fetched successfully.", body = [PostResponse]),
        (status = 204, description = "No posts found."),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "getUserPosts",
    security([])
)]
#[get("/user/{id}/posts")]
pub async fn user_posts(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let posts = state
        .posts
        .posts_by_author(UserId::new(path.into_inner()))
        .await?;
    if posts.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let payload: Vec<PostResponse> = posts.iter().map(PostResponse::from).collect();
    Ok(HttpResponse::Ok().json(payload))
}
