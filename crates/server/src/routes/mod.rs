//! HTTP route handlers.

pub mod auth;
pub mod customer;

use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::middleware::{enforce_rate_limit, require_bearer_token};
use crate::state::AppState;

/// Build the application router.
///
/// Layer order (outermost first): rate limit → bearer gate → handler.
/// The bearer gate wraps only the customer routes, so `/login` stays open.
pub fn app(state: AppState) -> Router {
    let customers = customer::router()
        .route_layer(from_fn_with_state(state.clone(), require_bearer_token));

    Router::new()
        .merge(auth::router())
        .merge(customers)
        .layer(from_fn_with_state(state.clone(), enforce_rate_limit))
        .with_state(state)
}
