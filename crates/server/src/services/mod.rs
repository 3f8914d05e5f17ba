//! Application services.
//!
//! Handlers call these rather than touching storage or secret sources
//! directly.

pub mod customer;
pub mod secrets;
pub mod token;
pub mod user;

pub use customer::CustomerService;
pub use secrets::{
    CachedSecretSource, FileSecretSource, HttpSecretSource, SecretMap, SecretSource,
    StaticSecretSource,
};
pub use token::{TokenClaims, TokenResponse, TokenService};
pub use user::UserService;
