/// Authentication and session utilities
///
/// - `jwt`: HS256 access/refresh token creation and validation
/// - `password`: Argon2id hashing and strength checks
/// - `middleware`: bearer-token session resolution for axum

pub mod jwt;
pub mod middleware;
pub mod password;
