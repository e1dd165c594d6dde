//! HTTP server assembly: state construction, seeding, bind and run.

pub mod config;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::{PostListCache, PostRepository, UserRepository};
use crate::domain::user::{Email, Username};
use crate::domain::{AuthService, PostService, Registration, SecretHasher, TokenService, UserService};
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;

use self::config::{AdminSeed, AppConfig};

/// Wire the domain services to the in-process adapters.
pub fn build_state(config: &AppConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users: Arc<dyn UserRepository> = Arc::new(
        crate::outbound::persistence::InMemoryUserRepository::new(clock.clone()),
    );
    let posts: Arc<dyn PostRepository> = Arc::new(
        crate::outbound::persistence::InMemoryPostRepository::new(clock.clone()),
    );
    let cache: Arc<dyn PostListCache> =
        Arc::new(crate::outbound::cache::InMemoryPostListCache::new(clock));

    let tokens = TokenService::new(config.token_secret.as_bytes(), config.token_ttl);
    let hasher = SecretHasher::default();

    HttpState::new(
        AuthService::new(users.clone(), tokens, hasher.clone()),
        UserService::new(users, hasher),
        PostService::new(posts, cache).with_cache_ttl(config.cache_ttl),
    )
}

/// Seed the bootstrap administrator, if one is configured.
pub async fn seed_admin(state: &HttpState, seed: &AdminSeed) -> std::io::Result<()> {
    let registration = admin_registration(seed).map_err(std::io::Error::other)?;
    state
        .users
        .ensure_admin(registration)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))
}

fn admin_registration(seed: &AdminSeed) -> Result<Registration, String> {
    let username =
        Username::new(&seed.username).map_err(|err| format!("BLOG_ADMIN_USERNAME: {err}"))?;
    let email = Email::new(&seed.email).map_err(|err| format!("BLOG_ADMIN_EMAIL: {err}"))?;
    Registration::new(username, email, &seed.password)
        .map_err(|err| format!("BLOG_ADMIN_PASSWORD: {err}"))
}

/// Bind and run the HTTP server until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let state = build_state(&config);
    if let Some(seed) = &config.admin_seed {
        seed_admin(&state, seed).await?;
    }

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness flip stays visible.
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr;
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .service(health::live)
            .service(health::ready)
            .configure(|cfg| crate::inbound::http::configure_api(cfg, state.clone()));
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
