/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use rolodex_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = rolodex_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{rate_limit, security::SecurityHeadersLayer},
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use rolodex_shared::auth::middleware::create_jwt_middleware;
use sqlx::PgPool;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Request body ceiling for the multipart contact endpoints
///
/// The per-file 5 MiB cap is enforced by the intake; this only bounds the
/// whole request so an oversized file still reaches the intake's typed
/// rejection instead of being cut off by the transport.
const MAX_MULTIPART_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; everything
/// inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Global fixed-window rate limiter (single counter scope)
    pub rate_limiter: Arc<Mutex<rate_limit::FixedWindow>>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            rate_limiter: Arc::new(Mutex::new(rate_limit::FixedWindow::new())),
        }
    }

    /// Gets the JWT signing secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                  # Health check (public)
/// ├── /api/
/// │   ├── /auth/
/// │   │   ├── POST /register   # public
/// │   │   └── POST /login      # public
/// │   └── /contacts/
/// │       ├── GET    /         # public
/// │       ├── GET    /:id      # public
/// │       ├── POST   /         # bearer, multipart
/// │       ├── PUT    /:id      # bearer, multipart
/// │       └── DELETE /:id      # bearer
/// ├── /uploads/*               # stored contact pictures (static)
/// └── /*                       # SPA bundle, index.html fallback
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers → CORS → request tracing; the global
/// rate limiter wraps the `/api` surface only, and the bearer check is a
/// route layer on the mutating contact routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Contact reads are public; mutations require a bearer token. Both sets
    // share the same paths, so they are kept as method-disjoint routers and
    // merged after the mutating set gets its layers.
    let contacts_public = Router::new()
        .route("/", get(routes::contacts::list_contacts))
        .route("/:id", get(routes::contacts::get_contact));

    let contacts_protected = Router::new()
        .route("/", post(routes::contacts::create_contact))
        .route(
            "/:id",
            put(routes::contacts::update_contact).delete(routes::contacts::delete_contact),
        )
        .route_layer(DefaultBodyLimit::max(MAX_MULTIPART_BYTES))
        .route_layer(axum::middleware::from_fn(create_jwt_middleware(
            state.config.jwt.secret.clone(),
        )));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/contacts", contacts_public.merge(contacts_protected))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Uploaded pictures and the SPA bundle; unknown paths fall back to
    // index.html so client-side routes survive a hard refresh.
    let uploads_service = ServeDir::new(&state.config.files.upload_dir);
    let spa_index = Path::new(&state.config.files.static_dir).join("index.html");
    let spa_service = ServeDir::new(&state.config.files.static_dir)
        .not_found_service(ServeFile::new(spa_index));

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .nest_service("/uploads", uploads_service)
        .fallback_service(spa_service)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
