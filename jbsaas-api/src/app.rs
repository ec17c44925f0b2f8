/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.

use crate::{
    clients::{
        CheckoutProvider, ContentGenerator, HttpTokenExchanger, MockCheckout, MockGenerator,
        OpenAiGenerator, PaddleCheckout,
    },
    config::Config,
    error::ApiError,
    middleware::security::SecurityHeadersLayer,
};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use jbsaas_shared::{
    auth::middleware::{resolve_session, AuthError, SessionState},
    oauth::{PlatformRegistry, TokenExchanger},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Social platform OAuth credentials
    pub platforms: Arc<PlatformRegistry>,

    /// Content generation provider
    pub generator: Arc<dyn ContentGenerator>,

    /// Billing checkout provider
    pub billing: Arc<dyn CheckoutProvider>,

    /// OAuth token exchanger
    pub exchanger: Arc<dyn TokenExchanger>,
}

impl AppState {
    /// Creates application state with providers selected from configuration
    ///
    /// Providers with no API key configured fall back to their mocks, so a
    /// development server boots with no upstream accounts.
    pub fn new(db: PgPool, config: Config) -> Self {
        let generator: Arc<dyn ContentGenerator> = match &config.providers.openai_api_key {
            Some(key) => Arc::new(OpenAiGenerator::new(key.clone())),
            None => {
                tracing::warn!("OPENAI_API_KEY not set; using mock content generator");
                Arc::new(MockGenerator)
            }
        };

        let billing: Arc<dyn CheckoutProvider> = match &config.providers.paddle_api_key {
            Some(key) => Arc::new(PaddleCheckout::new(key.clone())),
            None => {
                tracing::warn!("PADDLE_API_KEY not set; using mock billing provider");
                Arc::new(MockCheckout)
            }
        };

        Self {
            db,
            config: Arc::new(config),
            platforms: Arc::new(PlatformRegistry::from_env()),
            generator,
            billing,
            exchanger: Arc::new(HttpTokenExchanger::new()),
        }
    }

    /// Gets JWT secret for token operations
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
/// ├── /health                       # Health check (public)
/// ├── /api/blog                     # Public blog (no auth, cacheable)
/// │   ├── GET /?slug=               # List, or one article by slug
/// │   ├── GET /posts
/// │   └── GET /posts/:slug
/// └── /v1/                          # Authenticated API
///     ├── /auth/                    # register, login, refresh (public)
///     ├── /profiles/                # Business profile CRUD
///     ├── /posts/                   # Post CRUD + schedule/publish
///     ├── /analytics/               # Per-post metrics
///     ├── /calendar/                # Calendar events
///     ├── /oauth/                   # Social account handshake
///     ├── /social-accounts/         # Connected account management
///     ├── /generate                 # AI content generation
///     ├── /schedule/suggest         # Posting-slot suggestions
///     ├── /billing/                 # Checkout
///     └── /compliance/              # AHPRA/ABN validation and lookup
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public blog endpoints, consumed by the embeddable widget from any
    // origin. Responses carry Cache-Control so CDNs can absorb the load.
    let blog_routes = Router::new()
        .route("/", get(routes::blog::query_posts))
        .route("/posts", get(routes::blog::list_posts))
        .route("/posts/:slug", get(routes::blog::get_post))
        .layer(CorsLayer::permissive());

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Everything below requires a valid bearer token
    let profile_routes = Router::new()
        .route("/", post(routes::profiles::create_profile))
        .route("/", get(routes::profiles::list_profiles))
        .route("/:id", get(routes::profiles::get_profile))
        .route("/:id", put(routes::profiles::update_profile))
        .route("/:id", delete(routes::profiles::delete_profile));

    let post_routes = Router::new()
        .route("/", post(routes::posts::create_post))
        .route("/", get(routes::posts::list_posts))
        .route("/:id", get(routes::posts::get_post))
        .route("/:id", put(routes::posts::update_post))
        .route("/:id", delete(routes::posts::delete_post))
        .route("/:id/schedule", post(routes::posts::schedule_post))
        .route("/:id/publish", post(routes::posts::publish_post));

    let analytics_routes = Router::new()
        .route("/posts/:id", post(routes::analytics::record_metrics))
        .route("/posts/:id", get(routes::analytics::list_metrics));

    let calendar_routes = Router::new()
        .route("/events", post(routes::calendar::create_event))
        .route("/events", get(routes::calendar::list_events))
        .route("/events/:id", delete(routes::calendar::delete_event));

    let oauth_routes = Router::new()
        .route("/init", post(routes::oauth::init))
        .route("/callback", post(routes::oauth::callback));

    let social_account_routes = Router::new()
        .route("/", get(routes::oauth::list_accounts))
        .route("/:platform", delete(routes::oauth::disconnect_account));

    let billing_routes = Router::new()
        .route("/checkout", post(routes::billing::create_checkout))
        .route("/subscription", get(routes::billing::get_subscription));

    let compliance_routes = Router::new()
        .route("/abn/:abn", get(routes::compliance::validate_abn))
        .route("/ahpra/:number", get(routes::compliance::lookup_ahpra));

    let protected_routes = Router::new()
        .nest("/profiles", profile_routes)
        .nest("/posts", post_routes)
        .nest("/analytics", analytics_routes)
        .nest("/calendar", calendar_routes)
        .nest("/oauth", oauth_routes)
        .nest("/social-accounts", social_account_routes)
        .nest("/billing", billing_routes)
        .nest("/compliance", compliance_routes)
        .route("/generate", post(routes::generate::generate_content))
        .route("/schedule/suggest", post(routes::scheduling::suggest_slots))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
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

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/api/blog", blog_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Resolves the request's session state and either injects the
/// `AuthContext` into request extensions or converts the rejection into
/// an error response. An anonymous request on a protected route is a 401.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match resolve_session(req.headers(), state.jwt_secret()) {
        SessionState::Authenticated(ctx) => {
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        SessionState::Anonymous => Err(AuthError::MissingCredentials.into()),
        SessionState::Rejected(err) => Err(err.into()),
        // resolve_session never returns this intermediate state
        SessionState::Authenticating => Err(AuthError::MissingCredentials.into()),
    }
}
