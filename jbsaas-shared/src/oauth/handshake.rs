/// OAuth2 authorization-code handshake
///
/// Two operations, mirroring the two legs of the flow:
///
/// - `initiate`: generate a state token (and PKCE pair where required),
///   persist the pending row, and build the provider authorization URL.
/// - `complete`: redeem the state row exactly once, exchange the
///   authorization code for tokens, and store the connected account.
///
/// Token exchange goes through the `TokenExchanger` trait so the HTTP
/// implementation lives with the API server and tests can substitute a
/// mock.
///
/// # Failure Semantics
///
/// A missing, consumed, or expired state row fails closed with
/// `HandshakeError::InvalidState` before any token exchange. Provider-side
/// errors (user denied consent, exchange rejected) surface the provider's
/// error string; nothing is retried.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use url::Url;
use uuid::Uuid;

use crate::models::oauth_state::{CreateOAuthState, OAuthState};
use crate::models::social_account::{SocialAccount, UpsertSocialAccount};
use crate::oauth::pkce::{generate_state_token, PkcePair};
use crate::oauth::platform::{Platform, PlatformCredentials, PlatformRegistry};

/// How long a pending handshake stays redeemable
const STATE_TTL_MINUTES: i64 = 10;

/// Handshake error
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    /// Platform has no credentials configured
    #[error("Platform not configured: {0}")]
    NotConfigured(Platform),

    /// State token missing, already consumed, or expired
    #[error("Invalid or expired OAuth state")]
    InvalidState,

    /// Provider returned an error (consent denied, exchange rejected)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Tokens issued by the provider at the end of the exchange
#[derive(Debug, Clone)]
pub struct TokenResponse {
    /// Access token
    pub access_token: String,

    /// Refresh token, if the provider issued one
    pub refresh_token: Option<String>,

    /// Seconds until the access token expires, if reported
    pub expires_in: Option<i64>,

    /// Display name of the connected account, if reported
    pub account_name: Option<String>,
}

/// Exchanges an authorization code for tokens with the provider
///
/// The HTTP implementation lives in the API server; tests use a mock.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Performs the code-for-token exchange
    ///
    /// `code_verifier` is present exactly when the platform requires PKCE.
    async fn exchange_code(
        &self,
        platform: Platform,
        credentials: &PlatformCredentials,
        code: &str,
        redirect_uri: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenResponse, HandshakeError>;
}

/// Result of initiating a handshake
#[derive(Debug, Clone)]
pub struct InitiatedHandshake {
    /// Provider authorization URL for the browser to visit
    pub authorization_url: String,

    /// The state token embedded in that URL
    pub state: String,
}

/// Result of completing a handshake
#[derive(Debug, Clone)]
pub struct CompletedConnection {
    /// The stored connected account
    pub account: SocialAccount,
}

/// Initiates a handshake: NotStarted → PendingAuthorization
///
/// Persists the pending state row with a 10-minute expiry and returns the
/// authorization URL carrying the state token (and, for PKCE platforms,
/// the S256 challenge).
pub async fn initiate(
    pool: &PgPool,
    registry: &PlatformRegistry,
    user_id: Uuid,
    platform: Platform,
    redirect_uri: &str,
) -> Result<InitiatedHandshake, HandshakeError> {
    let credentials = registry
        .get(platform)
        .ok_or(HandshakeError::NotConfigured(platform))?;

    // Opportunistic cleanup so dead rows do not accumulate
    let removed = OAuthState::delete_expired(pool).await?;
    if removed > 0 {
        tracing::debug!(removed, "Pruned expired OAuth states");
    }

    let state_token = generate_state_token();
    let pkce = platform.requires_pkce().then(PkcePair::generate);

    OAuthState::create(
        pool,
        CreateOAuthState {
            user_id,
            platform: platform.as_str().to_string(),
            state_token: state_token.clone(),
            code_verifier: pkce.as_ref().map(|p| p.verifier.clone()),
            redirect_uri: redirect_uri.to_string(),
            expires_at: Utc::now() + Duration::minutes(STATE_TTL_MINUTES),
        },
    )
    .await?;

    let authorization_url = build_authorization_url(
        platform,
        &credentials.client_id,
        redirect_uri,
        &state_token,
        pkce.as_ref().map(|p| p.challenge.as_str()),
    );

    tracing::info!(user_id = %user_id, platform = %platform, "OAuth handshake initiated");

    Ok(InitiatedHandshake {
        authorization_url,
        state: state_token,
    })
}

/// Completes a handshake: PendingAuthorization → Consumed
///
/// Redeems the state row (at most once, before expiry), exchanges the code,
/// and stores the connected account against the initiating user.
pub async fn complete(
    pool: &PgPool,
    registry: &PlatformRegistry,
    exchanger: &dyn TokenExchanger,
    platform: Platform,
    code: &str,
    state: &str,
) -> Result<CompletedConnection, HandshakeError> {
    // Fail closed before touching the provider: a row we cannot redeem
    // means the callback is stale, replayed, or fabricated.
    let row = OAuthState::consume(pool, state, platform.as_str())
        .await?
        .ok_or(HandshakeError::InvalidState)?;

    let credentials = registry
        .get(platform)
        .ok_or(HandshakeError::NotConfigured(platform))?;

    let tokens = exchanger
        .exchange_code(
            platform,
            credentials,
            code,
            &row.redirect_uri,
            row.code_verifier.as_deref(),
        )
        .await?;

    let token_expires_at = tokens.expires_in.map(|s| Utc::now() + Duration::seconds(s));

    let account = SocialAccount::upsert(
        pool,
        row.user_id,
        UpsertSocialAccount {
            platform: platform.as_str().to_string(),
            account_name: tokens.account_name,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = %row.user_id, platform = %platform, "OAuth handshake completed");

    Ok(CompletedConnection { account })
}

/// Builds the provider authorization URL
///
/// Pure so the URL shape is testable without a database.
pub fn build_authorization_url(
    platform: Platform,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    code_challenge: Option<&str>,
) -> String {
    // Authorize endpoints are compile-time constants; parsing cannot fail.
    let mut url = Url::parse(platform.authorize_url()).expect("static authorize URL is valid");

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", platform.scopes())
        .append_pair("state", state);

    if let Some(challenge) = code_challenge {
        url.query_pairs_mut()
            .append_pair("code_challenge", challenge)
            .append_pair("code_challenge_method", "S256");
    }

    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_carries_state() {
        let url = build_authorization_url(
            Platform::Facebook,
            "fb-client",
            "https://app.jbsaas.com.au/cb",
            "abc123",
            None,
        );

        assert!(url.starts_with("https://www.facebook.com/v19.0/dialog/oauth?"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("client_id=fb-client"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.jbsaas.com.au%2Fcb"));
        assert!(!url.contains("code_challenge"));
    }

    #[test]
    fn test_pkce_platform_gets_challenge_params() {
        let url = build_authorization_url(
            Platform::Twitter,
            "tw-client",
            "https://app.jbsaas.com.au/cb",
            "s0s0s0",
            Some("challenge-value"),
        );

        assert!(url.contains("code_challenge=challenge-value"));
        assert!(url.contains("code_challenge_method=S256"));
    }

    #[test]
    fn test_invalid_state_error_message() {
        // This exact string is part of the API contract
        assert_eq!(
            HandshakeError::InvalidState.to_string(),
            "Invalid or expired OAuth state"
        );
    }
}
