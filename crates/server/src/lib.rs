//! Customers service library.
//!
//! Authenticated customer CRUD over HTTP, backed by an in-memory record
//! store. The `customers` binary wires these pieces together; integration
//! tests drive the same router.

pub mod config;
pub mod cpf;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
