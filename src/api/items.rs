//! Inventory read endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::item::Availability};

/// Get copy counts for an item
#[utoipa::path(
    get,
    path = "/items/{id}/availability",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Copy counts for the item", body = Availability),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<Availability>> {
    let availability = state.services.loans.availability(item_id).await?;
    Ok(Json(availability))
}
