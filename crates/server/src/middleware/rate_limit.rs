//! Per-client fixed-window rate limiting.
//!
//! Every client (keyed by IP) gets a counter and a window start. A request
//! landing at or past the end of the current window opens a new one; a
//! request that pushes the counter past the permit limit is rejected with
//! 429 before it reaches any handler.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Rate limit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window.
    pub permit_limit: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            permit_limit: 5,                 // 5 per second
            window: Duration::from_secs(1),
        }
    }
}

/// Counter state for one client.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: Instant,
    count: u32,
}

/// In-memory fixed-window rate limiter.
///
/// Each client's window is updated under its `DashMap` shard lock, so
/// concurrent requests from the same client are counted exactly.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            config,
        }
    }

    /// Count a request from `client`.
    ///
    /// Returns Ok(()) if allowed, Err with retry-after seconds if limited.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        self.check_at(client, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(&self, client: &str, now: Instant) -> Result<(), u64> {
        let window_len = self.config.window;
        let mut entry = self
            .windows
            .entry(client.to_string())
            .or_insert(Window { start: now, count: 0 });

        if now.saturating_duration_since(entry.start) >= window_len {
            entry.start = now;
            entry.count = 0;
        }

        entry.count = entry.count.saturating_add(1);

        if entry.count > self.config.permit_limit {
            let remaining = (entry.start + window_len).saturating_duration_since(now);
            let retry_after = retry_after_secs(remaining);
            debug!(
                client = client,
                count = entry.count,
                limit = self.config.permit_limit,
                "rate limit exceeded"
            );
            Err(retry_after)
        } else {
            Ok(())
        }
    }

    /// Requests counted for `client` in its current window.
    #[cfg(test)]
    fn get_count(&self, client: &str) -> u32 {
        self.windows.get(client).map(|w| w.count).unwrap_or(0)
    }

    /// Forget a client's window.
    #[cfg(test)]
    fn reset(&self, client: &str) {
        self.windows.remove(client);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Drop windows that ended before `now`.
    pub fn purge_expired(&self, now: Instant) {
        let window_len = self.config.window;
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.start) < window_len);
    }

    /// Start a background task that periodically purges expired windows,
    /// keeping memory bounded by the number of recently active clients.
    pub fn start_cleanup_task(self: &Arc<Self>, interval: Duration) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            loop {
                timer.tick().await;
                limiter.purge_expired(Instant::now());
                debug!(tracked = limiter.tracked_clients(), "rate limit windows purged");
            }
        });
    }
}

/// Whole seconds a rejected client should wait, at least 1.
fn retry_after_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

/// Get the client identifier (IP address) for rate limiting.
///
/// Proxy headers are only consulted when `trust_forwarded` is set; otherwise
/// any client could pick its own bucket.
pub fn get_client_id(addr: Option<SocketAddr>, headers: &HeaderMap, trust_forwarded: bool) -> String {
    if trust_forwarded {
        // Take the first IP in the chain
        if let Some(forwarded) = headers.get("x-forwarded-for")
            && let Ok(value) = forwarded.to_str()
            && let Some(ip) = value.split(',').next()
            && !ip.trim().is_empty()
        {
            return ip.trim().to_string();
        }

        if let Some(real_ip) = headers.get("x-real-ip")
            && let Ok(value) = real_ip.to_str()
        {
            return value.trim().to_string();
        }
    }

    addr.map(|a| a.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware that rejects requests over the per-client budget.
///
/// Runs ahead of authentication, so it covers login as well.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = get_client_id(addr, request.headers(), state.trust_forwarded_for());

    if let Err(retry_after) = state.rate_limiter().check(&client) {
        return AppError::RateLimited { retry_after }.into_response();
    }

    next.run(request).await
}
