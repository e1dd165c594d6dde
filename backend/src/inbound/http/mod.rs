//! Inbound HTTP adapter: handlers, DTOs, state, and the error envelope.

pub mod auth;
pub mod error;
pub mod health;
pub mod identity;
pub mod posts;
pub mod state;
pub mod users;

pub use error::{ApiError, ApiResult};

use actix_web::web;

use self::state::HttpState;

/// Mount every API route under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig, state: HttpState) {
    cfg.app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(auth::login)
            .service(auth::signup)
            .service(users::create_user)
            .service(users::list_users)
            .service(users::user_posts)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(posts::list_posts)
            .service(posts::create_post)
            .service(posts::get_post)
            .service(posts::update_post)
            .service(posts::delete_post),
    );
}
