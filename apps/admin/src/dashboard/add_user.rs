//! Add-user-to-group modal.
//!
//! Available users are the directory minus the group's current members, by id.
//! A user leaves the local list only after the server confirms the add; nothing
//! is refetched.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::api_client::{RiskGroupApi, UserDirectoryApi};
use crate::dashboard::display::{display_name, initials, matches_search};
use crate::dashboard::notifications::Notifications;
use crate::models::risk_group::{GroupId, UserId};
use crate::models::{RiskGroup, RiskGroupMembersParams, UserProfile};

/// Directory and membership are read in one page each; no pagination.
pub const MEMBERSHIP_SCAN_LIMIT: u32 = 1000;

pub fn user_display_name(user: &UserProfile) -> String {
    display_name(&user.first_name, &user.last_name, &user.email)
}

pub struct AddUserModal {
    risk_groups: Arc<dyn RiskGroupApi>,
    group_id: GroupId,
    group_name: String,
    available: Vec<UserProfile>,
    search_term: String,
    notifications: Notifications,
}

impl AddUserModal {
    pub async fn open(
        risk_groups: Arc<dyn RiskGroupApi>,
        directory: Arc<dyn UserDirectoryApi>,
        group: &RiskGroup,
    ) -> Self {
        let mut modal = Self {
            risk_groups,
            group_id: group.id,
            group_name: group.name.clone(),
            available: Vec::new(),
            search_term: String::new(),
            notifications: Notifications::default(),
        };
        modal.fetch_available_users(directory.as_ref()).await;
        modal
    }

    async fn fetch_available_users(&mut self, directory: &dyn UserDirectoryApi) {
        let users = match directory.get_user_profiles().await {
            Ok(users) => users,
            Err(e) => {
                self.notifications.error("Failed to load users", &e);
                return;
            }
        };

        let params = RiskGroupMembersParams {
            limit: Some(MEMBERSHIP_SCAN_LIMIT),
            ..Default::default()
        };
        let members = match self
            .risk_groups
            .get_risk_group_members(self.group_id, &params)
            .await
        {
            Ok(page) => page.data,
            Err(e) => {
                self.notifications.error("Failed to load users", &e);
                return;
            }
        };

        let member_ids: HashSet<UserId> = members.iter().map(|m| m.id).collect();
        self.available = users
            .into_iter()
            .filter(|u| !member_ids.contains(&u.id))
            .collect();
    }

    /// On failure the user stays available for another attempt.
    pub async fn add_user(&mut self, user_id: UserId) -> bool {
        let name = self
            .available
            .iter()
            .find(|u| u.id == user_id)
            .map(user_display_name)
            .unwrap_or_else(|| format!("User #{user_id}"));

        match self.risk_groups.add_user_to_group(self.group_id, user_id).await {
            Ok(_) => {
                self.notifications.success(
                    "User added",
                    format!("{name} has been added to {}", self.group_name),
                );
                self.available.retain(|u| u.id != user_id);
                true
            }
            Err(e) => {
                self.notifications.error("Failed to add user", &e);
                false
            }
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn filtered_users(&self) -> Vec<&UserProfile> {
        self.available
            .iter()
            .filter(|u| {
                let name = user_display_name(u);
                matches_search([name.as_str(), u.email.as_str()], &self.search_term)
            })
            .collect()
    }

    #[cfg(test)]
    pub fn available_ids(&self) -> Vec<UserId> {
        self.available.iter().map(|u| u.id).collect()
    }

    #[cfg(test)]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn snapshot(&self) -> AddUserView {
        let users: Vec<AvailableUser> = self
            .filtered_users()
            .into_iter()
            .map(|u| {
                let name = user_display_name(u);
                AvailableUser {
                    id: u.id,
                    initials: initials(&name),
                    display_name: name,
                    email: u.email.clone(),
                }
            })
            .collect();
        let empty_message = users.is_empty().then(|| {
            if self.search_term.is_empty() {
                "All users are already in this group"
            } else {
                "No users found matching your search"
            }
        });

        AddUserView {
            group_id: self.group_id,
            group_name: self.group_name.clone(),
            users,
            search_term: self.search_term.clone(),
            empty_message,
            notifications: self.notifications.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableUser {
    pub id: UserId,
    pub display_name: String,
    pub initials: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserView {
    pub group_id: GroupId,
    pub group_name: String,
    pub users: Vec<AvailableUser>,
    pub search_term: String,
    pub empty_message: Option<&'static str>,
    pub notifications: Notifications,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fake::{group, user, FakeBackend};

    fn backend() -> Arc<FakeBackend> {
        let backend = FakeBackend::with_groups(vec![group(7, "Cardiac")]);
        backend.add_users(vec![
            user(1, "Ana", "Li", "ana@example.com"),
            user(2, "Bo", "Chen", "bo@example.com"),
            user(3, "Cy", "Diaz", "cy@example.com"),
        ]);
        backend.set_members(7, &[1, 2]);
        Arc::new(backend)
    }

    #[tokio::test]
    async fn test_available_is_directory_minus_members() {
        let backend = backend();
        let modal = AddUserModal::open(backend.clone(), backend.clone(), &group(7, "Cardiac")).await;
        assert_eq!(modal.available_ids(), vec![3]);
        assert_eq!(backend.calls(), vec!["users", "members 7"]);
    }

    #[tokio::test]
    async fn test_add_removes_locally_without_refetch() {
        let backend = backend();
        let mut modal =
            AddUserModal::open(backend.clone(), backend.clone(), &group(7, "Cardiac")).await;
        backend.clear_calls();

        assert!(modal.add_user(3).await);
        assert!(modal.available_ids().is_empty());
        assert_eq!(backend.calls(), vec!["add 3 to 7"]);
        assert_eq!(
            modal.notifications().last().unwrap().message,
            "Cy Diaz has been added to Cardiac"
        );
        assert_eq!(
            modal.snapshot().empty_message,
            Some("All users are already in this group")
        );
    }

    #[tokio::test]
    async fn test_failed_add_keeps_user_available() {
        let backend = backend();
        let mut modal =
            AddUserModal::open(backend.clone(), backend.clone(), &group(7, "Cardiac")).await;
        backend.fail("add");

        assert!(!modal.add_user(3).await);
        assert_eq!(modal.available_ids(), vec![3]);
        assert!(modal.notifications().has_errors());

        backend.recover("add");
        assert!(modal.add_user(3).await);
        assert!(modal.available_ids().is_empty());
    }

    #[tokio::test]
    async fn test_directory_failure_leaves_list_empty() {
        let backend = backend();
        backend.fail("users");
        let modal = AddUserModal::open(backend.clone(), backend.clone(), &group(7, "Cardiac")).await;
        assert!(modal.available_ids().is_empty());
        assert_eq!(modal.notifications().last().unwrap().title, "Failed to load users");
        // Members are never requested once the directory read fails.
        assert_eq!(backend.calls(), vec!["users"]);
    }

    #[tokio::test]
    async fn test_search_over_available_users() {
        let backend = backend();
        backend.set_members(7, &[]);
        let mut modal =
            AddUserModal::open(backend.clone(), backend.clone(), &group(7, "Cardiac")).await;

        modal.set_search("CHEN");
        let ids: Vec<_> = modal.filtered_users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2]);

        modal.set_search("zzz");
        assert_eq!(
            modal.snapshot().empty_message,
            Some("No users found matching your search")
        );
    }
}
