use std::str::FromStr;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use crate::auth::claims::AuthClaims;
use crate::config::Config;
use crate::error::{AuthError, BaristaError};

/// Verifies bearer tokens against the issuer's published key set.
///
/// The key set is fetched lazily from the configured domain and cached for
/// the lifetime of the process. Caching is an optimization only; every
/// verification works the same against a freshly fetched set.
#[derive(Debug)]
pub struct Authenticator {
    client: reqwest::Client,
    jwks_url: Url,
    issuer: String,
    audience: String,
    algorithm: Algorithm,
    keys: RwLock<Option<JwkSet>>,
}

impl Authenticator {
    pub fn new(cfg: &Config, client: reqwest::Client) -> Result<Self, BaristaError> {
        Self::build(cfg, client, None)
    }

    /// Construct with a pre-loaded key set, skipping the network fetch.
    pub fn with_key_set(cfg: &Config, keys: JwkSet) -> Result<Self, BaristaError> {
        Self::build(cfg, reqwest::Client::new(), Some(keys))
    }

    fn build(
        cfg: &Config,
        client: reqwest::Client,
        keys: Option<JwkSet>,
    ) -> Result<Self, BaristaError> {
        let algorithm = Algorithm::from_str(&cfg.auth_algorithm)
            .map_err(|_| BaristaError::UnsupportedAlgorithm(cfg.auth_algorithm.clone()))?;
        let jwks_url = Url::parse(&format!(
            "https://{}/.well-known/jwks.json",
            cfg.auth_domain
        ))?;
        let issuer = format!("https://{}/", cfg.auth_domain);
        Ok(Self {
            client,
            jwks_url,
            issuer,
            audience: cfg.auth_audience.clone(),
            algorithm,
            keys: RwLock::new(keys),
        })
    }

    async fn key_set(&self) -> Result<JwkSet, BaristaError> {
        if let Some(keys) = self.keys.read().await.as_ref() {
            return Ok(keys.clone());
        }
        debug!(url = %self.jwks_url, "fetching signing key set");
        let fetched: JwkSet = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        *self.keys.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    /// Verify signature, expiry, audience and issuer, yielding the claims.
    pub async fn verify(&self, token: &str) -> Result<AuthClaims, BaristaError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::invalid_header("Unable to parse authentication token."))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Unable to find the appropriate key."))?;

        let keys = self.key_set().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::invalid_header("Unable to find the appropriate key."))?;
        let decoding_key = DecodingKey::from_jwk(jwk)
            .map_err(|_| AuthError::invalid_header("Unable to find the appropriate key."))?;

        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<AuthClaims>(token, &decoding_key, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::token_expired(),
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                    AuthError::invalid_claims("Incorrect claims. Please, check the audience and issuer.")
                }
                _ => AuthError::invalid_header("Unable to parse authentication token."),
            }
        })?;
        Ok(data.claims)
    }

    /// Check that the verified claims grant `required`.
    pub fn check_permission(claims: &AuthClaims, required: &str) -> Result<(), AuthError> {
        match claims.permissions.as_deref() {
            None => Err(AuthError::permissions_not_included()),
            Some(granted) if !granted.iter().any(|p| p == required) => {
                Err(AuthError::permission_not_found())
            }
            Some(_) => Ok(()),
        }
    }
}
