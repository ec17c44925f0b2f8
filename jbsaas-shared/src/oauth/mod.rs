/// Social platform OAuth2 handshake
///
/// Implements the authorization-code flow used to link external social
/// accounts to a tenant without the server ever seeing the user's platform
/// password.
///
/// # State Machine
///
/// ```text
/// NotStarted ──initiate──> PendingAuthorization ──callback──> Consumed
///                                │
///                                └──(10 minutes elapse)──> Expired
/// ```
///
/// The one real invariant: a state token may be redeemed at most once, and
/// only before its expiry. A missing, consumed, or expired token fails
/// closed: no token exchange is attempted.
///
/// - `platform`: supported providers, their endpoints, and credentials
/// - `pkce`: code verifier/challenge generation (S256)
/// - `handshake`: initiation and callback, backed by `oauth_states` rows

pub mod handshake;
pub mod pkce;
pub mod platform;

pub use handshake::{
    complete, initiate, CompletedConnection, HandshakeError, InitiatedHandshake, TokenExchanger,
    TokenResponse,
};
pub use pkce::PkcePair;
pub use platform::{Platform, PlatformCredentials, PlatformRegistry};
