use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::auth::Credentials;
use crate::dashboard::devices::DevicesView;
use crate::dashboard::{DeviceDetails, DevicesPage};
use crate::errors::AppError;
use crate::routes::SearchQuery;
use crate::state::AppState;

/// GET /api/v1/dashboard/devices?search=<term>
pub async fn handle_devices(
    State(state): State<AppState>,
    credentials: Credentials,
    Query(query): Query<SearchQuery>,
) -> Result<Json<DevicesView>, AppError> {
    let mut page = DevicesPage::load(state.client(credentials)).await;
    page.set_search(query.search);
    Ok(Json(page.snapshot(Utc::now())))
}

/// GET /api/v1/dashboard/devices/:id
///
/// 404 only when the list loaded and has no such device; a failed list read is 502.
pub async fn handle_device_details(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceDetails>, AppError> {
    let page = DevicesPage::fetch(state.client(credentials)).await?;
    page.find(&device_id)
        .map(|device| Json(DeviceDetails::from_device(device, Utc::now())))
        .ok_or_else(|| AppError::NotFound(format!("Device {device_id} not found")))
}
