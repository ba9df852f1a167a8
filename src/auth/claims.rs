use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims carried by a verified access token.
///
/// Derived per request and dropped when the request completes; never
/// persisted. `aud` is kept as a raw value since issuers emit either a
/// single string or an array of audiences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Value,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Permission strings granted to the principal. Absence of the claim
    /// itself is distinct from an empty set and is rejected by the checker.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}
