use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api_client::BiometricApi;
use crate::auth::Credentials;
use crate::dashboard::biometrics::BiometricView;
use crate::dashboard::group_assignment::GroupAssignmentView;
use crate::dashboard::user_groups::UserGroupsView;
use crate::dashboard::{BiometricTab, GroupAssignmentEditor, TimeRange, UserGroupsTab};
use crate::errors::AppError;
use crate::models::risk_group::{GroupId, UserId};
use crate::routes::ActionResponse;
use crate::state::AppState;

pub const DEFAULT_ACTIVITY_HOURS: i64 = 24;
pub const MAX_ACTIVITY_HOURS: i64 = 24 * 365;

/// `groupId: null` takes the user out of every group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BiometricsQuery {
    pub range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub hours: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub user_id: UserId,
    pub hours: i64,
    pub active: bool,
}

/// GET /api/v1/dashboard/users/:id/risk-groups
pub async fn handle_user_groups(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserGroupsView>, AppError> {
    let tab = UserGroupsTab::load(state.client(credentials), user_id).await;
    Ok(Json(tab.snapshot()))
}

/// GET /api/v1/dashboard/users/:id/risk-group
pub async fn handle_group_assignment(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(user_id): Path<UserId>,
) -> Result<Json<GroupAssignmentView>, AppError> {
    let editor = GroupAssignmentEditor::load(state.client(credentials), user_id).await;
    Ok(Json(editor.snapshot()))
}

/// PUT /api/v1/dashboard/users/:id/risk-group
pub async fn handle_change_group_assignment(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(user_id): Path<UserId>,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<ActionResponse<GroupAssignmentView>>, AppError> {
    let _ticket = state.actions.begin(format!("assign:{user_id}"))?;

    let mut editor = GroupAssignmentEditor::load(state.client(credentials), user_id).await;
    let succeeded = editor.change(request.group_id).await;
    Ok(Json(ActionResponse::new(succeeded, editor.snapshot())))
}

/// GET /api/v1/dashboard/users/:id/biometrics?range=7|30|90
///
/// The aggregate endpoints are not scoped by user; the backend resolves the
/// subject from the caller's token.
pub async fn handle_biometrics(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(user_id): Path<UserId>,
    Query(query): Query<BiometricsQuery>,
) -> Result<Json<BiometricView>, AppError> {
    let range = match query.range.as_deref() {
        Some(raw) => raw.parse::<TimeRange>().map_err(AppError::Validation)?,
        None => TimeRange::default(),
    };
    debug!("biometric overview for user {user_id} over {}", range.label());

    let tab = BiometricTab::new(state.client(credentials), range);
    Ok(Json(tab.refresh(Utc::now()).await))
}

/// GET /api/v1/dashboard/users/:id/activity?hours=<n>
pub async fn handle_recent_activity(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(user_id): Path<UserId>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivityResponse>, AppError> {
    let hours = query.hours.unwrap_or(DEFAULT_ACTIVITY_HOURS);
    if !(1..=MAX_ACTIVITY_HOURS).contains(&hours) {
        return Err(AppError::Validation(format!(
            "hours must be between 1 and {MAX_ACTIVITY_HOURS}"
        )));
    }

    let active = state
        .client(credentials)
        .has_recent_activity(hours, Utc::now())
        .await?;
    Ok(Json(ActivityResponse {
        user_id,
        hours,
        active,
    }))
}
