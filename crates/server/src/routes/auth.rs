//! Authentication route (login).

use axum::extract::State;
use axum::routing::post;
use axum::{Form, Json, Router};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::services::TokenResponse;
use crate::state::AppState;

/// Login handler.
///
/// POST /login (form data: `name`, `password`)
/// - Empty name or password → 401 without consulting the secret source
/// - Valid credentials → 200 with a bearer token
/// - Invalid credentials or an unreachable secret source → 401
async fn login(
    State(state): State<AppState>,
    Form(user): Form<User>,
) -> AppResult<Json<TokenResponse>> {
    if user.is_incomplete() {
        return Err(AppError::Unauthorized);
    }

    let valid = state
        .users()
        .is_valid_user(&user)
        .await
        .map_err(AppError::ExternalDependency)?;

    if !valid {
        warn!(name = %user.name, "login rejected");
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens().issue(&user.name)?;
    info!(name = %user.name, "user logged in");
    Ok(Json(token))
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
