/// Server configuration, loaded from the environment
///
/// `DATABASE_URL` and `JWT_SECRET` are required; everything else has a
/// development default. Provider keys (`OPENAI_API_KEY`, `PADDLE_API_KEY`)
/// are optional because a missing key selects the mock client, letting the
/// server boot with no upstream accounts.

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` means permissive (development)
    pub cors_origins: Vec<String>,

    /// Enables HSTS and strict CORS
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key, at least 32 bytes (`openssl rand -hex 32`)
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub openai_api_key: Option<String>,
    pub paddle_api_key: Option<String>,
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable is required"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Loads configuration from the environment (and `.env` in development)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".into())
                    .parse()?,
                cors_origins: parse_origins(
                    &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
                ),
                production: matches!(
                    env::var("PRODUCTION").as_deref(),
                    Ok("true") | Ok("1")
                ),
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".into())
                    .parse()?,
            },
            jwt: JwtConfig { secret: jwt_secret },
            providers: ProviderConfig {
                openai_api_key: env::var("OPENAI_API_KEY").ok(),
                paddle_api_key: env::var("PADDLE_API_KEY").ok(),
            },
        })
    }

    /// The `host:port` pair the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            providers: ProviderConfig {
                openai_api_key: None,
                paddle_api_key: None,
            },
        };

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_origins_trims_and_drops_empties() {
        let origins = parse_origins("https://a.example, https://b.example,,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_parse_origins_wildcard() {
        assert_eq!(parse_origins("*"), vec!["*"]);
    }
}
