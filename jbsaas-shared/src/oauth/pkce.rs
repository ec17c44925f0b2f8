/// PKCE code verifier and challenge generation
///
/// Proof Key for Code Exchange (RFC 7636) prevents authorization-code
/// interception: the authorization request carries a SHA-256 challenge and
/// the token exchange must present the original verifier. Only the S256
/// method is implemented; no supported platform accepts `plain`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// A PKCE verifier and its derived challenge
#[derive(Debug, Clone)]
pub struct PkcePair {
    /// The secret verifier, stored server-side until the callback
    pub verifier: String,

    /// base64url(SHA-256(verifier)), embedded in the authorization URL
    pub challenge: String,
}

impl PkcePair {
    /// Generates a fresh verifier from 32 random bytes and derives its challenge
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let verifier = URL_SAFE_NO_PAD.encode(bytes);
        let challenge = Self::challenge_for(&verifier);

        Self {
            verifier,
            challenge,
        }
    }

    /// Derives the S256 challenge for a verifier
    pub fn challenge_for(verifier: &str) -> String {
        let digest = Sha256::digest(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }
}

/// Generates an opaque random state token (32 bytes, hex)
pub fn generate_state_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_is_base64url_43_chars() {
        let pair = PkcePair::generate();
        // 32 bytes in base64url without padding
        assert_eq!(pair.verifier.len(), 43);
        assert!(!pair.verifier.contains('='));
        assert!(!pair.verifier.contains('+'));
        assert!(!pair.verifier.contains('/'));
    }

    #[test]
    fn test_challenge_matches_rfc_7636_appendix_b() {
        // Worked example from RFC 7636 Appendix B
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let challenge = PkcePair::challenge_for(verifier);
        assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_challenge_is_deterministic() {
        let pair = PkcePair::generate();
        assert_eq!(pair.challenge, PkcePair::challenge_for(&pair.verifier));
    }

    #[test]
    fn test_pairs_are_unique() {
        let a = PkcePair::generate();
        let b = PkcePair::generate();
        assert_ne!(a.verifier, b.verifier);
    }

    #[test]
    fn test_state_token_is_64_hex_chars() {
        let token = generate_state_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_state_tokens_are_unique() {
        assert_ne!(generate_state_token(), generate_state_token());
    }
}
