/// Bearer-token session resolution for axum
///
/// Every request passes through an explicit session state machine instead of
/// consulting ambient global state:
///
/// ```text
/// Anonymous ──(Authorization header present)──> Authenticating
/// Authenticating ──(token valid)──> Authenticated(AuthContext)
/// Authenticating ──(token invalid/expired)──> Rejected(reason)
/// ```
///
/// The API server's auth layer calls `resolve_session` and either injects
/// the resulting `AuthContext` into request extensions or converts the
/// rejection into a 401. Handlers extract `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use jbsaas_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on a protected route
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a Bearer token
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,
}

/// Authentication context injected into request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (the tenant boundary)
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn from_jwt(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Explicit per-request session state
///
/// `Authenticating` never escapes `resolve_session`; it exists so the
/// transition sequence is a value that can be reasoned about and tested,
/// not an implicit side effect.
#[derive(Debug)]
pub enum SessionState {
    /// No credentials presented
    Anonymous,

    /// Credentials presented, validation in progress
    Authenticating,

    /// Credentials validated
    Authenticated(AuthContext),

    /// Credentials presented but rejected
    Rejected(AuthError),
}

impl SessionState {
    /// Checks whether the session carries a validated identity
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Resolves the session state for a request
///
/// Inspects the Authorization header and validates the bearer token.
/// Returns `Anonymous` when no header is present so public routes can
/// share the same resolution path.
pub fn resolve_session(headers: &HeaderMap, jwt_secret: &str) -> SessionState {
    let header = match headers.get(header::AUTHORIZATION) {
        Some(value) => value,
        None => return SessionState::Anonymous,
    };

    // Credentials are present; from here the outcome is authenticated or rejected.
    let token = match header.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return SessionState::Rejected(AuthError::InvalidFormat),
    };

    match validate_access_token(token, jwt_secret) {
        Ok(claims) => SessionState::Authenticated(AuthContext::from_jwt(claims.sub)),
        Err(JwtError::Expired) => SessionState::Rejected(AuthError::TokenExpired),
        Err(e) => SessionState::Rejected(AuthError::InvalidToken(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims, TokenType};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_no_header_is_anonymous() {
        let state = resolve_session(&HeaderMap::new(), SECRET);
        assert!(matches!(state, SessionState::Anonymous));
    }

    #[test]
    fn test_valid_token_authenticates() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id, TokenType::Access), SECRET).unwrap();

        let state = resolve_session(&headers_with(&format!("Bearer {token}")), SECRET);
        match state {
            SessionState::Authenticated(ctx) => assert_eq!(ctx.user_id, user_id),
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let state = resolve_session(&headers_with("Basic dXNlcjpwYXNz"), SECRET);
        assert!(matches!(
            state,
            SessionState::Rejected(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let state = resolve_session(&headers_with("Bearer not.a.jwt"), SECRET);
        assert!(matches!(
            state,
            SessionState::Rejected(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_refresh_token_rejected_on_api() {
        let token =
            create_token(&Claims::new(Uuid::new_v4(), TokenType::Refresh), SECRET).unwrap();

        let state = resolve_session(&headers_with(&format!("Bearer {token}")), SECRET);
        assert!(matches!(state, SessionState::Rejected(_)));
    }
}
