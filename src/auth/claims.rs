use serde::{Deserialize, Serialize};

/// JWT payload carried by access tokens.
///
/// Refresh tokens are opaque random strings stored server-side, so this is
/// the only claim set the service signs or verifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i64,           // user ID
    pub name: String,       // username
    pub email: String,
    pub role: String,
    pub first_name: String, // empty string when unset
    pub last_name: String,  // empty string when unset
    pub iat: usize,         // issued at (unix timestamp)
    pub exp: usize,         // expires at (unix timestamp)
    pub iss: String,        // issuer
    pub aud: String,        // audience
}
