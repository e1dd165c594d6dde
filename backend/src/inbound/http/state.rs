//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable with in-memory adapters.

use std::sync::Arc;

use crate::domain::{AuthService, PostService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
}

impl HttpState {
    /// Bundle the domain services.
    pub fn new(auth: AuthService, users: UserService, posts: PostService) -> Self {
        Self {
            auth: Arc::new(auth),
            users: Arc::new(users),
            posts: Arc::new(posts),
        }
    }
}
