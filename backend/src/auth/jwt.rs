//! JWT access token issuance and verification
//!
//! Tokens carry the username as `sub` and an absolute expiry `exp`. They are
//! signed with an HMAC key derived once from the configured secret.
//!
//! Both operations take the current time explicitly. `jsonwebtoken` checks
//! the signature, the algorithm and the presence of `sub`/`exp`; the expiry
//! comparison against `now` is done here, after the signature is accepted.

use crate::config::JwtConfig;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use job_tracker_shared::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Algorithms accepted for a shared-secret signing key
const SUPPORTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp); optional on incoming tokens
    #[serde(default)]
    pub iat: i64,
}

/// Pre-computed JWT keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Parse an algorithm name, accepting only HMAC variants
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    let algorithm: Algorithm = name
        .trim()
        .to_uppercase()
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown signing algorithm: {}", name))?;

    if !SUPPORTED_ALGORITHMS.contains(&algorithm) {
        anyhow::bail!(
            "Signing algorithm {:?} needs a key pair; use HS256, HS384 or HS512",
            algorithm
        );
    }
    Ok(algorithm)
}

/// JWT service for token operations
///
/// Created once at startup and shared through `AppState`; cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    algorithm: Algorithm,
    ttl: Duration,
    validation: Arc<Validation>,
}

impl JwtService {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is compared against the caller's clock in `verify`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            algorithm,
            ttl,
            validation: Arc::new(validation),
        }
    }

    /// Build the service from configuration
    pub fn from_config(config: &JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }
        if config.access_token_expire_minutes <= 0 {
            anyhow::bail!("Access token lifetime must be positive");
        }
        let ttl = Duration::try_minutes(config.access_token_expire_minutes).ok_or_else(|| {
            anyhow::anyhow!(
                "Access token lifetime of {} minutes is out of range",
                config.access_token_expire_minutes
            )
        })?;
        let algorithm = parse_algorithm(&config.algorithm)?;
        Ok(Self::new(&config.secret, algorithm, ttl))
    }

    /// Issue a token for `username`, valid until `now + ttl`
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<String> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| anyhow::anyhow!("Token expiry is out of range"))?;
        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign access token: {}", e))
    }

    /// Issue a token at the current time
    #[inline]
    pub fn issue_access_token(&self, username: &str) -> Result<String> {
        self.issue(username, Utc::now())
    }

    /// Verify a token and return the username it was issued for
    ///
    /// Succeeds only if the signature is valid and `now < exp`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= now.timestamp() {
            debug!(sub = %claims.sub, "Rejected expired access token");
            return Err(AuthError::InvalidToken);
        }
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims.sub)
    }

    /// Verify a token against the current time
    #[inline]
    pub fn verify_access_token(&self, token: &str) -> Result<String, AuthError> {
        self.verify(token, Utc::now())
    }

    /// Token lifetime
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}
