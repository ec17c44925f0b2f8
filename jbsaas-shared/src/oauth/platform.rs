/// Supported social platforms and their OAuth2 endpoints
///
/// Each platform carries its authorize/token URLs, default scopes, and
/// whether it requires PKCE. Credentials (client ID/secret) come from the
/// environment and live in a `PlatformRegistry` on the application state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A social platform users can connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Facebook Pages
    Facebook,

    /// Instagram Business (via the Facebook Graph API)
    Instagram,

    /// LinkedIn company/member posts
    Linkedin,

    /// Twitter/X
    Twitter,
}

impl Platform {
    /// All supported platforms
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Twitter,
    ];

    /// Platform identifier as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
        }
    }

    /// Whether the platform's token endpoint requires PKCE
    ///
    /// Twitter's OAuth2 flow mandates PKCE; the others accept the plain
    /// authorization-code flow with a client secret.
    pub fn requires_pkce(&self) -> bool {
        matches!(self, Platform::Twitter)
    }

    /// Authorization endpoint
    pub fn authorize_url(&self) -> &'static str {
        match self {
            Platform::Facebook => "https://www.facebook.com/v19.0/dialog/oauth",
            Platform::Instagram => "https://www.facebook.com/v19.0/dialog/oauth",
            Platform::Linkedin => "https://www.linkedin.com/oauth/v2/authorization",
            Platform::Twitter => "https://twitter.com/i/oauth2/authorize",
        }
    }

    /// Token exchange endpoint
    pub fn token_url(&self) -> &'static str {
        match self {
            Platform::Facebook => "https://graph.facebook.com/v19.0/oauth/access_token",
            Platform::Instagram => "https://graph.facebook.com/v19.0/oauth/access_token",
            Platform::Linkedin => "https://www.linkedin.com/oauth/v2/accessToken",
            Platform::Twitter => "https://api.twitter.com/2/oauth2/token",
        }
    }

    /// Default scopes requested at authorization
    pub fn scopes(&self) -> &'static str {
        match self {
            Platform::Facebook => "pages_manage_posts,pages_read_engagement",
            Platform::Instagram => "instagram_basic,instagram_content_publish",
            Platform::Linkedin => "w_member_social openid profile",
            Platform::Twitter => "tweet.read tweet.write users.read offline.access",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" => Ok(Platform::Twitter),
            other => Err(format!("Unsupported platform: {other}")),
        }
    }
}

/// OAuth client credentials for one platform
#[derive(Debug, Clone)]
pub struct PlatformCredentials {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,
}

/// Credentials for every configured platform
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    credentials: HashMap<Platform, PlatformCredentials>,
}

impl PlatformRegistry {
    /// Builds an empty registry (useful in tests)
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads credentials from `<PLATFORM>_CLIENT_ID` / `<PLATFORM>_CLIENT_SECRET`
    ///
    /// Platforms without both variables set are simply absent; initiating a
    /// handshake for them fails with a configuration error rather than at
    /// startup.
    pub fn from_env() -> Self {
        let mut credentials = HashMap::new();

        for platform in Platform::ALL {
            let prefix = platform.as_str().to_ascii_uppercase();
            let id = std::env::var(format!("{prefix}_CLIENT_ID")).ok();
            let secret = std::env::var(format!("{prefix}_CLIENT_SECRET")).ok();

            if let (Some(client_id), Some(client_secret)) = (id, secret) {
                credentials.insert(
                    platform,
                    PlatformCredentials {
                        client_id,
                        client_secret,
                    },
                );
            }
        }

        Self { credentials }
    }

    /// Registers credentials for a platform
    pub fn insert(&mut self, platform: Platform, creds: PlatformCredentials) {
        self.credentials.insert(platform, creds);
    }

    /// Looks up credentials for a platform
    pub fn get(&self, platform: Platform) -> Option<&PlatformCredentials> {
        self.credentials.get(&platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_roundtrip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("LinkedIn".parse::<Platform>().unwrap(), Platform::Linkedin);
    }

    #[test]
    fn test_unknown_platform_rejected() {
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_only_twitter_requires_pkce() {
        assert!(Platform::Twitter.requires_pkce());
        assert!(!Platform::Facebook.requires_pkce());
        assert!(!Platform::Instagram.requires_pkce());
        assert!(!Platform::Linkedin.requires_pkce());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = PlatformRegistry::new();
        assert!(registry.get(Platform::Facebook).is_none());

        registry.insert(
            Platform::Facebook,
            PlatformCredentials {
                client_id: "fb-id".to_string(),
                client_secret: "fb-secret".to_string(),
            },
        );
        assert_eq!(registry.get(Platform::Facebook).unwrap().client_id, "fb-id");
    }
}
