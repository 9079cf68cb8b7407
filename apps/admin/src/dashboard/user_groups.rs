use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::api_client::RiskGroupApi;
use crate::dashboard::display::format_date_time;
use crate::models::risk_group::{GroupId, UserId};
use crate::models::{RiskGroup, UserGroupEntry};

/// Read-only list of every group a user belongs to. Both reads degrade to empty.
pub struct UserGroupsTab {
    user_id: UserId,
    groups: Vec<UserGroupEntry>,
    available: Vec<RiskGroup>,
}

impl UserGroupsTab {
    pub async fn load(api: Arc<dyn RiskGroupApi>, user_id: UserId) -> Self {
        let (user_groups, available) =
            tokio::join!(api.get_user_risk_groups(user_id), api.get_all_risk_groups());

        let groups = user_groups.map(|u| u.groups).unwrap_or_else(|e| {
            warn!("failed to fetch risk groups for user {user_id}: {e}");
            Vec::new()
        });
        let available = available.unwrap_or_else(|e| {
            warn!("failed to fetch available risk groups: {e}");
            Vec::new()
        });

        Self {
            user_id,
            groups,
            available,
        }
    }

    pub fn snapshot(&self) -> UserGroupsView {
        UserGroupsView {
            user_id: self.user_id,
            groups: self
                .groups
                .iter()
                .map(|g| AssignedGroup {
                    group_id: g.group_id,
                    group_name: g.group_name.clone(),
                    added: format_date_time(&g.created_at),
                    added_by: g
                        .added_by
                        .map(|id| format!("User #{id}"))
                        .unwrap_or_else(|| "Unknown".to_string()),
                })
                .collect(),
            available_group_count: self.available.len(),
            empty_message: self
                .groups
                .is_empty()
                .then_some("This user is not assigned to any risk groups"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedGroup {
    pub group_id: GroupId,
    pub group_name: String,
    pub added: String,
    pub added_by: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupsView {
    pub user_id: UserId,
    pub groups: Vec<AssignedGroup>,
    pub available_group_count: usize,
    pub empty_message: Option<&'static str>,
}
