//! Bearer-token verification against a remotely published key set.
//!
//! Layout:
//! - `claims.rs`: verified claims payload handed to handlers
//! - `verifier.rs`: key-set fetch/cache and token verification

pub mod claims;
pub mod verifier;

pub use claims::AuthClaims;
pub use verifier::Authenticator;
