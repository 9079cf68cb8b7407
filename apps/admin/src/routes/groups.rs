use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api_client::RiskGroupApi;
use crate::auth::Credentials;
use crate::dashboard::add_user::AddUserView;
use crate::dashboard::groups_page::GroupsPageView;
use crate::dashboard::{AddUserModal, CreateGroupForm, GroupsPage};
use crate::errors::AppError;
use crate::models::risk_group::{GroupId, UserId};
use crate::models::UpdateRiskGroupRequest;
use crate::routes::{ActionResponse, SearchQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GroupsPageQuery {
    pub selected: Option<GroupId>,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
    pub selected: Option<GroupId>,
}

impl ConfirmQuery {
    fn require(&self, prompt: &str) -> Result<(), AppError> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::ConfirmationRequired(prompt.to_string()))
        }
    }
}

/// GET /api/v1/dashboard/groups
pub async fn handle_groups_page(
    State(state): State<AppState>,
    credentials: Credentials,
    Query(query): Query<GroupsPageQuery>,
) -> Result<Json<GroupsPageView>, AppError> {
    let mut page = GroupsPage::new(state.client(credentials));
    page.load(query.selected).await;
    page.set_search(query.search);
    Ok(Json(page.snapshot()))
}

/// POST /api/v1/dashboard/groups
pub async fn handle_create_group(
    State(state): State<AppState>,
    credentials: Credentials,
    Json(mut form): Json<CreateGroupForm>,
) -> Result<Json<ActionResponse<GroupsPageView>>, AppError> {
    let Some(request) = form.request() else {
        return Err(AppError::Validation("Group name is required".to_string()));
    };
    let _ticket = state.actions.begin(format!("create:{}", request.name))?;

    let mut page = GroupsPage::new(state.client(credentials));
    let succeeded = page.create_group(&mut form).await;
    Ok(Json(ActionResponse::new(succeeded, page.snapshot())))
}

/// PUT /api/v1/dashboard/groups/:id
pub async fn handle_update_group(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(group_id): Path<GroupId>,
    Json(request): Json<UpdateRiskGroupRequest>,
) -> Result<Json<ActionResponse<GroupsPageView>>, AppError> {
    let _ticket = state.actions.begin(format!("update:{group_id}"))?;

    let mut page = GroupsPage::new(state.client(credentials));
    page.load(Some(group_id)).await;
    let succeeded = page.update_group(group_id, request).await;
    Ok(Json(ActionResponse::new(succeeded, page.snapshot())))
}

/// DELETE /api/v1/dashboard/groups/:id?confirm=true&selected=<id>
///
/// `selected` is the group the caller has open; deleting it moves the
/// selection to the first remaining group.
pub async fn handle_delete_group(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(group_id): Path<GroupId>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<ActionResponse<GroupsPageView>>, AppError> {
    query.require("Are you sure you want to delete this risk group?")?;
    let _ticket = state.actions.begin(format!("delete:{group_id}"))?;

    let mut page = GroupsPage::new(state.client(credentials));
    page.load(query.selected).await;
    let succeeded = page.delete_group(group_id, true).await;
    Ok(Json(ActionResponse::new(succeeded, page.snapshot())))
}

/// DELETE /api/v1/dashboard/groups/:id/members/:user_id?confirm=true
pub async fn handle_remove_member(
    State(state): State<AppState>,
    credentials: Credentials,
    Path((group_id, user_id)): Path<(GroupId, UserId)>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<ActionResponse<GroupsPageView>>, AppError> {
    query.require("Are you sure you want to remove this user from the group?")?;
    let _ticket = state.actions.begin(format!("remove:{group_id}:{user_id}"))?;

    let mut page = GroupsPage::new(state.client(credentials));
    page.load(Some(group_id)).await;
    let succeeded = page.remove_member(group_id, user_id, true).await;
    Ok(Json(ActionResponse::new(succeeded, page.snapshot())))
}

/// GET /api/v1/dashboard/groups/:id/available-users
pub async fn handle_available_users(
    State(state): State<AppState>,
    credentials: Credentials,
    Path(group_id): Path<GroupId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<AddUserView>, AppError> {
    let client = state.client(credentials);
    let group = client.get_risk_group(group_id).await?;

    let mut modal = AddUserModal::open(client.clone(), client, &group).await;
    modal.set_search(query.search);
    Ok(Json(modal.snapshot()))
}

/// POST /api/v1/dashboard/groups/:id/members/:user_id
pub async fn handle_add_member(
    State(state): State<AppState>,
    credentials: Credentials,
    Path((group_id, user_id)): Path<(GroupId, UserId)>,
) -> Result<Json<ActionResponse<AddUserView>>, AppError> {
    let _ticket = state.actions.begin(format!("add:{group_id}:{user_id}"))?;

    let client = state.client(credentials);
    let group = client.get_risk_group(group_id).await?;

    let mut modal = AddUserModal::open(client.clone(), client, &group).await;
    let succeeded = modal.add_user(user_id).await;
    Ok(Json(ActionResponse::new(succeeded, modal.snapshot())))
}
