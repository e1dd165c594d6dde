//! Post endpoints.
//!
//! Reading is public. Creating requires an authenticated caller; editing
//! and deleting additionally require the caller to be the author, checked
//! by the service before any mutation.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::post::{Post, PostDraft, PostId, PostStatus, Title};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::identity::BearerToken;
use crate::inbound::http::state::HttpState;

/// Request body for post creation and edits.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostRequest {
    #[schema(example = "First post")]
    pub title: String,
    #[schema(example = "Hello from the blog.")]
    pub content: String,
}

/// Post payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().get(),
            author_id: post.author_id().get(),
            title: post.title().to_string(),
            content: post.content().to_owned(),
            status: post.status(),
        }
    }
}

impl TryFrom<&PostRequest> for PostDraft {
    type Error = Error;

    fn try_from(value: &PostRequest) -> Result<Self, Error> {
        let title =
            Title::new(&value.title).map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(Self {
            title,
            content: value.content.clone(),
        })
    }
}

/// List every post.
#[utoipa::path(
    get,
    path = "/api/v1/post",
    responses(
        (status = 200, description = "Posts fetched successfully.", body = [PostResponse]),
        (status = 204, description = "No posts found."),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/post")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let posts = state.posts.list().await?;
    if posts.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let payload: Vec<PostResponse> = posts.iter().map(PostResponse::from).collect();
    Ok(HttpResponse::Ok().json(payload))
}

/// Author a new post as the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/v1/post",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created successfully.", body = PostResponse),
        (status = 400, description = "Bad input.", body = ApiError),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/post")]
pub async fn create_post(
    token: BearerToken,
    state: web::Data<HttpState>,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let current = state.auth.require_user(token.value()).await?;
    let draft = PostDraft::try_from(&*payload)?;
    let post = state.posts.create(&current, draft).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(&post)))
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/v1/post/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post fetched successfully.", body = PostResponse),
        (status = 404, description = "Post not found.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
#[get("/post/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let post = state.posts.get(PostId::new(path.into_inner())).await?;
    Ok(web::Json(PostResponse::from(&post)))
}

/// Edit a post as its author.
#[utoipa::path(
    put,
    path = "/api/v1/post/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post updated successfully.", body = PostResponse),
        (status = 400, description = "Bad input.", body = ApiError),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 404, description = "Post not found.", body = ApiError),
        (status = 409, description = "Database conflict.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/post/{id}")]
pub async fn update_post(
    token: BearerToken,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let current = state.auth.require_user(token.value()).await?;
    let draft = PostDraft::try_from(&*payload)?;
    let post = state
        .posts
        .update(PostId::new(path.into_inner()), draft, &current)
        .await?;
    Ok(HttpResponse::Created().json(PostResponse::from(&post)))
}

/// Soft-delete a post as its author.
#[utoipa::path(
    delete,
    path = "/api/v1/post/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted successfully."),
        (status = 401, description = "Unauthorized.", body = ApiError),
        (status = 404, description = "Post not found.", body = ApiError),
        (status = 500, description = "An error occurred.", body = ApiError)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/post/{id}")]
pub async fn delete_post(
    token: BearerToken,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let current = state.auth.require_user(token.value()).await?;
    state
        .posts
        .delete(PostId::new(path.into_inner()), &current)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
