pub mod devices;
pub mod groups;
pub mod health;
pub mod session;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body of every mutating dashboard route: whether the server accepted the
/// change, plus the refreshed view the change was made from.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub succeeded: bool,
    #[serde(flatten)]
    pub view: T,
}

impl<T> ActionResponse<T> {
    pub fn new(succeeded: bool, view: T) -> Self {
        Self { succeeded, view }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(session::handle_session))
        // Risk groups
        .route(
            "/api/v1/dashboard/groups",
            get(groups::handle_groups_page).post(groups::handle_create_group),
        )
        .route(
            "/api/v1/dashboard/groups/:id",
            put(groups::handle_update_group).delete(groups::handle_delete_group),
        )
        .route(
            "/api/v1/dashboard/groups/:id/available-users",
            get(groups::handle_available_users),
        )
        .route(
            "/api/v1/dashboard/groups/:id/members/:user_id",
            post(groups::handle_add_member).delete(groups::handle_remove_member),
        )
        // User health profile
        .route(
            "/api/v1/dashboard/users/:id/risk-groups",
            get(users::handle_user_groups),
        )
        .route(
            "/api/v1/dashboard/users/:id/risk-group",
            get(users::handle_group_assignment).put(users::handle_change_group_assignment),
        )
        .route(
            "/api/v1/dashboard/users/:id/biometrics",
            get(users::handle_biometrics),
        )
        .route(
            "/api/v1/dashboard/users/:id/activity",
            get(users::handle_recent_activity),
        )
        // Devices
        .route("/api/v1/dashboard/devices", get(devices::handle_devices))
        .route(
            "/api/v1/dashboard/devices/:id",
            get(devices::handle_device_details),
        )
        .with_state(state)
}
