/// Common test utilities for integration tests
///
/// Builds a full router against a lazily-connected pool, so tests that
/// never reach the database (auth enforcement, request validation, the
/// handshake's pre-exchange checks) run with no infrastructure. Tests that
/// need rows belong in a context with `DATABASE_URL` pointing at a real
/// database.

use jbsaas_api::app::{build_router, AppState};
use jbsaas_api::clients::{HttpTokenExchanger, MockCheckout, MockGenerator};
use jbsaas_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, ProviderConfig};
use jbsaas_shared::auth::jwt::{create_token, Claims, TokenType};
use jbsaas_shared::oauth::{Platform, PlatformCredentials, PlatformRegistry};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context carrying the router and a signed-in identity
pub struct TestContext {
    pub app: axum::Router,
    pub user_id: Uuid,
    pub jwt_token: String,
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://localhost:1/unreachable".to_string(),
            max_connections: 2,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        providers: ProviderConfig {
            openai_api_key: None,
            paddle_api_key: None,
        },
    }
}

impl TestContext {
    /// Builds a router with mock providers and a lazy, unreachable pool
    pub fn new() -> Self {
        let config = test_config();

        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_lazy(&config.database.url)
            .unwrap();

        // Facebook gets credentials so configured-platform paths are
        // exercisable; the rest stay unconfigured on purpose
        let mut platforms = PlatformRegistry::new();
        platforms.insert(
            Platform::Facebook,
            PlatformCredentials {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
            },
        );

        let user_id = Uuid::new_v4();
        let jwt_token =
            create_token(&Claims::new(user_id, TokenType::Access), TEST_JWT_SECRET).unwrap();

        let state = AppState {
            db,
            config: Arc::new(config),
            platforms: Arc::new(platforms),
            generator: Arc::new(MockGenerator),
            billing: Arc::new(MockCheckout),
            exchanger: Arc::new(HttpTokenExchanger::new()),
        };

        Self {
            app: build_router(state),
            user_id,
            jwt_token,
        }
    }

    /// Authorization header value for the test user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
