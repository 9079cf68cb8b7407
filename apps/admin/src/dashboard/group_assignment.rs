//! Risk-group assignment editor on a user's health profile.
//!
//! The editor presents a single-select control: the first entry of the user's
//! group list is "the" current group and any further entries are ignored.
//! Switching removes the old membership before adding the new one. The two
//! calls are sequential and not transactional; after any failure the current
//! group is re-read from the server instead of being reverted locally.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::api_client::{ApiError, RiskGroupApi};
use crate::dashboard::notifications::Notifications;
use crate::models::risk_group::{GroupId, UserId};
use crate::models::RiskGroup;

pub struct GroupAssignmentEditor {
    api: Arc<dyn RiskGroupApi>,
    user_id: UserId,
    available_groups: Vec<RiskGroup>,
    current_group_id: Option<GroupId>,
    notifications: Notifications,
}

impl GroupAssignmentEditor {
    pub async fn load(api: Arc<dyn RiskGroupApi>, user_id: UserId) -> Self {
        let mut editor = Self {
            api,
            user_id,
            available_groups: Vec::new(),
            current_group_id: None,
            notifications: Notifications::default(),
        };
        editor.fetch_groups().await;
        editor.fetch_current_group().await;
        editor
    }

    async fn fetch_groups(&mut self) {
        self.available_groups = match self.api.get_all_risk_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                warn!("failed to fetch risk groups: {e}");
                Vec::new()
            }
        };
    }

    pub async fn fetch_current_group(&mut self) {
        self.current_group_id = match self.api.get_user_risk_groups(self.user_id).await {
            Ok(user_groups) => user_groups.groups.first().map(|g| g.group_id),
            Err(e) => {
                warn!("failed to fetch risk groups for user {}: {e}", self.user_id);
                None
            }
        };
    }

    /// Moves the user to `new_group` (or out of every group with `None`).
    pub async fn change(&mut self, new_group: Option<GroupId>) -> bool {
        if new_group == self.current_group_id {
            return true;
        }

        match self.reassign(new_group).await {
            Ok(()) => {
                self.current_group_id = new_group;
                let group_name = match new_group {
                    Some(id) => self
                        .available_groups
                        .iter()
                        .find(|g| g.id == id)
                        .map(|g| g.name.clone())
                        .unwrap_or_else(|| "Selected Group".to_string()),
                    None => "No Group".to_string(),
                };
                self.notifications
                    .success("Risk group updated", format!("User assigned to: {group_name}"));
                true
            }
            Err(e) => {
                self.notifications.error("Failed to update risk group", &e);
                self.fetch_current_group().await;
                false
            }
        }
    }

    async fn reassign(&self, new_group: Option<GroupId>) -> Result<(), ApiError> {
        if let Some(current) = self.current_group_id {
            self.api.remove_user_from_group(current, self.user_id).await?;
        }
        if let Some(target) = new_group {
            self.api.add_user_to_group(target, self.user_id).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn current_group_id(&self) -> Option<GroupId> {
        self.current_group_id
    }

    #[cfg(test)]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn snapshot(&self) -> GroupAssignmentView {
        GroupAssignmentView {
            user_id: self.user_id,
            current_group_id: self.current_group_id,
            options: self
                .available_groups
                .iter()
                .map(|g| GroupOption {
                    id: g.id,
                    name: g.name.clone(),
                    selected: Some(g.id) == self.current_group_id,
                })
                .collect(),
            notifications: self.notifications.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOption {
    pub id: GroupId,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAssignmentView {
    pub user_id: UserId,
    pub current_group_id: Option<GroupId>,
    pub options: Vec<GroupOption>,
    pub notifications: Notifications,
}
