use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::error::BaristaError;

/// Runtime configuration, read once at startup and passed down explicitly.
///
/// Every field can be overridden through the environment with a `BARISTA_`
/// prefix, e.g. `BARISTA_AUTH_DOMAIN`, `BARISTA_DATABASE_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Domain that publishes the signing key set and acts as token issuer.
    pub auth_domain: String,
    /// Expected `aud` claim of inbound tokens.
    pub auth_audience: String,
    /// Token signing algorithm, e.g. `RS256`.
    pub auth_algorithm: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:barista.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            auth_domain: "example.auth0.com".to_string(),
            auth_audience: "drinks".to_string(),
            auth_algorithm: "RS256".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, BaristaError> {
        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("BARISTA_"))
            .extract()?;
        Ok(cfg)
    }
}
