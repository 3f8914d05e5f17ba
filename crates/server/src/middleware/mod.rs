//! HTTP middleware components.
//!
//! Provides rate limiting and bearer token authentication.

pub mod bearer_auth;
pub mod rate_limit;

pub use bearer_auth::{BearerAuth, require_bearer_token};
pub use rate_limit::{RateLimitConfig, RateLimiter, enforce_rate_limit, get_client_id};
