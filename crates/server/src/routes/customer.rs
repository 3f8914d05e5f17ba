//! Customer CRUD route handlers.
//!
//! Every route here sits behind the bearer token gate.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::middleware::BearerAuth;
use crate::models::{Customer, CustomerId, CustomerInput};
use crate::state::AppState;

/// Response for a successful insert.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: CustomerId,
}

/// GET /customer
async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers().select().await?))
}

/// GET /customer/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> AppResult<Json<Customer>> {
    state
        .customers()
        .select_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// POST /customer
async fn create_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<BearerAuth>,
    Json(input): Json<CustomerInput>,
) -> AppResult<impl IntoResponse> {
    let id = state.customers().insert(input).await?;
    info!(customer_id = id, by = %auth.name, token_id = %auth.jti, "customer created");

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/customer/{id}"))],
        Json(CreatedResponse { id }),
    ))
}

/// PUT /customer/{id} and PATCH /customer/{id}
///
/// Both replace the name wholesale; there is no partial merge.
async fn update_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<BearerAuth>,
    Path(id): Path<CustomerId>,
    Json(input): Json<CustomerInput>,
) -> AppResult<StatusCode> {
    if !state.customers().update(id, input).await? {
        return Err(AppError::NotFound);
    }
    info!(customer_id = id, by = %auth.name, token_id = %auth.jti, "customer updated");
    Ok(StatusCode::OK)
}

/// DELETE /customer/{id}
async fn delete_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<BearerAuth>,
    Path(id): Path<CustomerId>,
) -> AppResult<StatusCode> {
    if !state.customers().delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(customer_id = id, by = %auth.name, token_id = %auth.jti, "customer deleted");
    Ok(StatusCode::OK)
}

/// Create the customer router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customer", get(list_customers).post(create_customer))
        .route(
            "/customer/{id}",
            get(get_customer)
                .put(update_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
}
