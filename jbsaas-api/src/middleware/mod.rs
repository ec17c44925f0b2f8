/// API server middleware
///
/// - `security`: security-related HTTP response headers

pub mod security;
