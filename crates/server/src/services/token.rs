//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs naming the authenticated principal in `sub`
//! and expiring a fixed interval after issuance.

use std::time::Duration;

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT issuer claim value.
const ISSUER: &str = "customers";

/// Default token lifetime (30 minutes).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer.
    pub iss: String,
    /// Subject (login name).
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// JWT ID (unique per token).
    pub jti: String,
}

/// Body returned by `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    /// Create a new token service with HMAC-SHA256 signing.
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// Token lifetime in whole seconds.
    pub fn lifetime_secs(&self) -> i64 {
        i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX)
    }

    /// Issue a token for `name`.
    pub fn issue(&self, name: &str) -> Result<TokenResponse> {
        let now = chrono::Utc::now().timestamp();
        let expires_in = self.lifetime_secs();

        let claims = TokenClaims {
            iss: ISSUER.to_string(),
            sub: name.to_string(),
            iat: now,
            exp: now.saturating_add(expires_in),
            jti: Uuid::now_v7().to_string(),
        };

        let access_token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
                .context("failed to encode access token")?;

        Ok(TokenResponse {
            token_type: "Bearer".to_string(),
            access_token,
            expires_in,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Rejects bad signatures, foreign issuers and expired tokens. Expiry is
    /// checked without leeway.
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation())
            .context("invalid token")?;
        Ok(data.claims)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
