//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{Config, SecretsConfig};
use crate::middleware::{RateLimitConfig, RateLimiter};
use crate::models::DEMO_CUSTOMER_NAMES;
use crate::services::{
    CachedSecretSource, CustomerService, FileSecretSource, HttpSecretSource, SecretSource,
    StaticSecretSource, TokenService, UserService,
};
use crate::store::{CustomerRepository, InMemoryCustomerStore};

/// How often idle rate-limit windows are purged.
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Customer service over the record store.
    customers: CustomerService,

    /// Credential verifier.
    users: UserService,

    /// Bearer token issuer/verifier.
    tokens: TokenService,

    /// Per-client rate limiter.
    rate_limiter: Arc<RateLimiter>,

    /// Whether proxy headers identify the client.
    trust_forwarded_for: bool,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Builds the in-memory store and the configured secret source, and
    /// starts the rate limiter's cleanup task.
    pub async fn new(config: &Config) -> Result<Self> {
        let store = if config.seed_demo_customers {
            InMemoryCustomerStore::seeded(DEMO_CUSTOMER_NAMES)
        } else {
            InMemoryCustomerStore::new()
        };
        info!(customers = store.len(), "customer store initialised");

        let secrets = build_secret_source(config);
        info!(source = secrets.kind(), "secret source configured");

        let state = Self::with_components(Arc::new(store), secrets, config);
        state
            .rate_limiter()
            .start_cleanup_task(RATE_LIMIT_CLEANUP_INTERVAL);

        Ok(state)
    }

    /// Assemble state from explicit collaborators.
    pub fn with_components(
        repository: Arc<dyn CustomerRepository>,
        secrets: Arc<dyn SecretSource>,
        config: &Config,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
            permit_limit: config.rate_limit_permits,
            window: config.rate_limit_window,
        }));

        Self {
            inner: Arc::new(AppStateInner {
                customers: CustomerService::new(repository),
                users: UserService::new(secrets, config.secrets_timeout),
                tokens: TokenService::new(config.jwt_secret.as_bytes(), config.token_expiration),
                rate_limiter,
                trust_forwarded_for: config.trust_forwarded_for,
            }),
        }
    }

    /// Get the customer service.
    pub fn customers(&self) -> &CustomerService {
        &self.inner.customers
    }

    /// Get the user (credential) service.
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }

    /// Get the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get the rate limiter.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.inner.rate_limiter
    }

    /// Whether `X-Forwarded-For` / `X-Real-IP` identify the client.
    pub fn trust_forwarded_for(&self) -> bool {
        self.inner.trust_forwarded_for
    }
}

fn build_secret_source(config: &Config) -> Arc<dyn SecretSource> {
    let source: Arc<dyn SecretSource> = match &config.secrets {
        SecretsConfig::Http { url, api_key } => Arc::new(HttpSecretSource::new(
            url.clone(),
            api_key.clone(),
            config.secrets_timeout,
        )),
        SecretsConfig::File(path) => Arc::new(FileSecretSource::new(path.clone())),
        SecretsConfig::Empty => {
            warn!("neither SECRETS_URL nor SECRETS_FILE is set; every login will be rejected");
            Arc::new(StaticSecretSource::default())
        }
    };

    match config.secrets_cache_ttl {
        Some(ttl) => Arc::new(CachedSecretSource::new(source, ttl)),
        None => source,
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("customers", &self.inner.customers)
            .field("users", &self.inner.users)
            .field("tokens", &self.inner.tokens)
            .field("rate_limiter", &self.inner.rate_limiter)
            .finish()
    }
}
