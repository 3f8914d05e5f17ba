//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Minimum accepted length of `JWT_SECRET` in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Where the login name→password mapping comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsConfig {
    /// Fetch a JSON object over HTTP.
    Http {
        url: String,
        api_key: Option<String>,
    },
    /// Read a JSON object from a local file.
    File(PathBuf),
    /// No source configured; every login is rejected.
    Empty,
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    /// Bearer token lifetime (default: 30 minutes).
    pub token_expiration: Duration,

    /// Requests allowed per client per window (default: 5).
    pub rate_limit_permits: u32,

    /// Rate limit window length (default: 1 second).
    pub rate_limit_window: Duration,

    /// Derive the client identity from `X-Forwarded-For` / `X-Real-IP`
    /// instead of the peer address (default: false).
    pub trust_forwarded_for: bool,

    /// Secret source for credential checks.
    pub secrets: SecretsConfig,

    /// Upper bound on a single credential fetch (default: 5 seconds).
    pub secrets_timeout: Duration,

    /// How long a fetched mapping is reused. `None` fetches on every login.
    pub secrets_cache_ttl: Option<Duration>,

    /// Start with the demo customer list (default: true).
    pub seed_demo_customers: bool,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let jwt_secret =
            env::var("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET is too short ({} bytes, need at least {MIN_JWT_SECRET_LEN})",
                jwt_secret.len()
            );
        }

        let token_expiration = env::var("TOKEN_EXPIRATION_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("TOKEN_EXPIRATION_SECS must be a valid u64")?;

        let rate_limit_permits = env::var("RATE_LIMIT_PERMITS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .context("RATE_LIMIT_PERMITS must be a valid u32")?;

        let rate_limit_window = env::var("RATE_LIMIT_WINDOW_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map(Duration::from_millis)
            .context("RATE_LIMIT_WINDOW_MS must be a valid u64")?;
        if rate_limit_window.is_zero() {
            anyhow::bail!("RATE_LIMIT_WINDOW_MS must be greater than zero");
        }

        let trust_forwarded_for = parse_flag(env::var("TRUST_FORWARDED_FOR").ok(), false)
            .context("TRUST_FORWARDED_FOR must be a boolean")?;

        let secrets = secrets_from_parts(
            env::var("SECRETS_URL").ok(),
            env::var("SECRETS_API_KEY").ok(),
            env::var("SECRETS_FILE").ok(),
        );

        let secrets_timeout = env::var("SECRETS_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map(Duration::from_millis)
            .context("SECRETS_TIMEOUT_MS must be a valid u64")?;

        let secrets_cache_ttl = env::var("SECRETS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u64>()
            .context("SECRETS_CACHE_TTL_SECS must be a valid u64")
            .map(|secs| (secs > 0).then(|| Duration::from_secs(secs)))?;

        let seed_demo_customers = parse_flag(env::var("SEED_DEMO_CUSTOMERS").ok(), true)
            .context("SEED_DEMO_CUSTOMERS must be a boolean")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            jwt_secret,
            token_expiration,
            rate_limit_permits,
            rate_limit_window,
            trust_forwarded_for,
            secrets,
            secrets_timeout,
            secrets_cache_ttl,
            seed_demo_customers,
            cors_allowed_origins,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_expiration", &self.token_expiration)
            .field("rate_limit_permits", &self.rate_limit_permits)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("secrets", &self.secrets)
            .field("secrets_timeout", &self.secrets_timeout)
            .field("secrets_cache_ttl", &self.secrets_cache_ttl)
            .field("seed_demo_customers", &self.seed_demo_customers)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

/// Pick the secret source. A URL wins over a file.
fn secrets_from_parts(
    url: Option<String>,
    api_key: Option<String>,
    file: Option<String>,
) -> SecretsConfig {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    if let Some(url) = non_empty(url) {
        SecretsConfig::Http {
            url,
            api_key: non_empty(api_key),
        }
    } else if let Some(path) = non_empty(file) {
        SecretsConfig::File(PathBuf::from(path))
    } else {
        SecretsConfig::Empty
    }
}

fn parse_flag(value: Option<String>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean value: {other}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag(Some("TRUE".into()), false).unwrap());
        assert!(parse_flag(Some("1".into()), false).unwrap());
        assert!(!parse_flag(Some("off".into()), true).unwrap());
        assert!(parse_flag(None, true).unwrap());
        assert!(parse_flag(Some("maybe".into()), true).is_err());
    }

    #[test]
    fn url_takes_precedence_over_file() {
        let secrets = secrets_from_parts(
            Some("http://secrets.local/customer.api".into()),
            Some("key".into()),
            Some("/etc/customers/secrets.json".into()),
        );
        assert_eq!(
            secrets,
            SecretsConfig::Http {
                url: "http://secrets.local/customer.api".into(),
                api_key: Some("key".into()),
            }
        );
    }

    #[test]
    fn blank_values_mean_unset() {
        assert_eq!(
            secrets_from_parts(Some("  ".into()), None, Some("secrets.json".into())),
            SecretsConfig::File(PathBuf::from("secrets.json"))
        );
        assert_eq!(
            secrets_from_parts(None, None, Some(String::new())),
            SecretsConfig::Empty
        );
    }
}
