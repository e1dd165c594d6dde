//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod post_cache;
mod post_repository;
mod user_repository;

#[cfg(test)]
pub use post_cache::MockPostListCache;
pub use post_cache::{PostListCache, PostListCacheError, PostListCacheKey};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
