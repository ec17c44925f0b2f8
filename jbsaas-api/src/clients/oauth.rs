/// HTTP token exchanger for the OAuth handshake
///
/// Implements the code-for-token exchange leg against each platform's token
/// endpoint. Providers differ in field naming at the edges but all accept
/// the standard form-encoded grant; responses are parsed leniently so a
/// missing optional field never fails the exchange.

use async_trait::async_trait;
use serde::Deserialize;

use jbsaas_shared::oauth::{HandshakeError, Platform, PlatformCredentials, TokenExchanger, TokenResponse};

/// Exchanges authorization codes over HTTPS
pub struct HttpTokenExchanger {
    client: reqwest::Client,
}

impl HttpTokenExchanger {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTokenExchanger {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard token endpoint response shape
///
/// Every supported platform returns at least `access_token`; the rest is
/// optional and provider-dependent.
#[derive(Debug, Deserialize)]
struct WireTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange_code(
        &self,
        platform: Platform,
        credentials: &PlatformCredentials,
        code: &str,
        redirect_uri: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenResponse, HandshakeError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier));
        }

        let response = self
            .client
            .post(platform.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| HandshakeError::Provider(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HandshakeError::Provider(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let wire: WireTokenResponse = response
            .json()
            .await
            .map_err(|e| HandshakeError::Provider(format!("malformed token response: {}", e)))?;

        Ok(TokenResponse {
            access_token: wire.access_token,
            refresh_token: wire.refresh_token,
            expires_in: wire.expires_in,
            account_name: None,
        })
    }
}
