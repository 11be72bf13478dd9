use super::AppState;
use super::extract::JsonObject;
use crate::address::NewAddress;
use crate::errors::ApiError;
use crate::models::Address;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// GET /
pub async fn root() -> &'static str {
    "Hello, world!"
}

/// GET /address: every stored address, oldest first
pub async fn list_addresses(State(state): State<AppState>) -> Result<Json<Vec<Address>>, ApiError> {
    let addresses = state.store.list().await?;
    Ok(Json(addresses))
}

/// POST /address: validates the body and appends a new record.
/// Responds 200 with the stored record, including its generated id.
pub async fn create_address(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> Result<Json<Address>, ApiError> {
    let new_address = NewAddress::from_payload(&body)?;
    let address = state.store.insert(new_address).await?;

    tracing::info!(id = %address.id, "address created");
    Ok(Json(address))
}

/// DELETE /address/{id}
pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.store.remove(&id).await? {
        Some(_) => {
            tracing::info!(%id, "address deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound),
    }
}
