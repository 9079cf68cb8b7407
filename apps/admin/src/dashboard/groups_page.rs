//! Groups page: the list of risk groups, the selected group and its members.
//!
//! Member counts are a local cache. Each group's `member_count` is refreshed
//! only when that group is selected, so counts across groups can disagree
//! until each one has been visited.

use std::sync::Arc;

use serde::Serialize;

use crate::api_client::RiskGroupApi;
use crate::dashboard::create_group::CreateGroupForm;
use crate::dashboard::display::{display_name, format_date, initials, matches_search};
use crate::dashboard::notifications::Notifications;
use crate::models::risk_group::{GroupId, UserId};
use crate::models::{
    MemberSortField, RiskGroup, RiskGroupMember, RiskGroupMembersParams, SortOrder,
    UpdateRiskGroupRequest,
};

pub const MEMBER_PAGE_LIMIT: u32 = 100;

pub fn member_display_name(member: &RiskGroupMember) -> String {
    display_name(&member.first_name, &member.last_name, &member.email)
}

pub struct GroupsPage {
    api: Arc<dyn RiskGroupApi>,
    groups: Vec<RiskGroup>,
    selected: Option<GroupId>,
    members: Vec<RiskGroupMember>,
    search_term: String,
    notifications: Notifications,
}

impl GroupsPage {
    pub fn new(api: Arc<dyn RiskGroupApi>) -> Self {
        Self {
            api,
            groups: Vec::new(),
            selected: None,
            members: Vec::new(),
            search_term: String::new(),
            notifications: Notifications::default(),
        }
    }

    /// Fetches all groups. Selects `preferred` when it exists, otherwise keeps the
    /// current selection, otherwise falls back to the first group.
    pub async fn load(&mut self, preferred: Option<GroupId>) {
        match self.api.get_all_risk_groups().await {
            Ok(groups) => self.groups = groups,
            Err(e) => self.notifications.error("Failed to load risk groups", &e),
        }

        let target = preferred
            .filter(|id| self.contains(*id))
            .or_else(|| self.selected.filter(|id| self.contains(*id)))
            .or_else(|| self.groups.first().map(|g| g.id));

        match target {
            Some(id) => {
                self.select(id).await;
            }
            None => {
                self.selected = None;
                self.members.clear();
            }
        }
    }

    /// Returns false without any call when the group is not in the list.
    pub async fn select(&mut self, group_id: GroupId) -> bool {
        if !self.contains(group_id) {
            return false;
        }
        self.selected = Some(group_id);
        self.refresh_members().await;
        true
    }

    /// Fetches the selected group's members (first name ascending, capped at 100)
    /// and writes the reported total into that group's cached member count.
    pub async fn refresh_members(&mut self) {
        let Some(group_id) = self.selected else {
            return;
        };
        let params = RiskGroupMembersParams {
            sort_by: Some(MemberSortField::FirstName),
            sort_order: Some(SortOrder::Asc),
            limit: Some(MEMBER_PAGE_LIMIT),
            ..Default::default()
        };
        match self.api.get_risk_group_members(group_id, &params).await {
            Ok(page) => {
                self.members = page.data;
                if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
                    group.member_count = Some(page.total);
                }
            }
            Err(e) => {
                self.notifications.error("Failed to load group members", &e);
                self.members.clear();
            }
        }
    }

    pub async fn create_group(&mut self, form: &mut CreateGroupForm) -> bool {
        let Some(request) = form.request() else {
            self.notifications
                .error("Failed to create group", &"Group name is required");
            return false;
        };
        match self.api.create_risk_group(&request).await {
            Ok(_) => {
                self.notifications
                    .success("Group created", "Risk group created successfully");
                form.reset();
                self.load(None).await;
                true
            }
            Err(e) => {
                self.notifications.error("Failed to create group", &e);
                false
            }
        }
    }

    pub async fn update_group(&mut self, group_id: GroupId, request: UpdateRiskGroupRequest) -> bool {
        match self.api.update_risk_group(group_id, &request).await {
            Ok(_) => {
                self.notifications
                    .success("Group updated", "Risk group updated successfully");
                self.load(None).await;
                true
            }
            Err(e) => {
                self.notifications.error("Failed to update group", &e);
                false
            }
        }
    }

    /// Nothing is sent unless `confirmed`. On success the group leaves the local
    /// list; a deleted selection falls back to the new first group, or to none.
    pub async fn delete_group(&mut self, group_id: GroupId, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        match self.api.delete_risk_group(group_id).await {
            Ok(_) => {
                self.notifications
                    .success("Group deleted", "Risk group deleted successfully");
                self.groups.retain(|g| g.id != group_id);
                if self.selected == Some(group_id) {
                    self.members.clear();
                    self.selected = self.groups.first().map(|g| g.id);
                    self.refresh_members().await;
                }
                true
            }
            Err(e) => {
                self.notifications.error("Failed to delete group", &e);
                false
            }
        }
    }

    pub async fn remove_member(&mut self, group_id: GroupId, user_id: UserId, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        match self.api.remove_user_from_group(group_id, user_id).await {
            Ok(_) => {
                self.notifications
                    .success("User removed", "User removed from group successfully");
                self.refresh_members().await;
                true
            }
            Err(e) => {
                self.notifications.error("Failed to remove user", &e);
                false
            }
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Recomputed on every call; no server-side search.
    pub fn filtered_members(&self) -> Vec<&RiskGroupMember> {
        self.members
            .iter()
            .filter(|m| {
                let name = member_display_name(m);
                matches_search([name.as_str(), m.email.as_str()], &self.search_term)
            })
            .collect()
    }

    #[cfg(test)]
    pub fn groups(&self) -> &[RiskGroup] {
        &self.groups
    }

    pub fn selected_group(&self) -> Option<&RiskGroup> {
        self.selected
            .and_then(|id| self.groups.iter().find(|g| g.id == id))
    }

    #[cfg(test)]
    pub fn members(&self) -> &[RiskGroupMember] {
        &self.members
    }

    #[cfg(test)]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    fn contains(&self, group_id: GroupId) -> bool {
        self.groups.iter().any(|g| g.id == group_id)
    }

    pub fn snapshot(&self) -> GroupsPageView {
        let members: Vec<MemberRow> = self
            .filtered_members()
            .into_iter()
            .map(MemberRow::from_member)
            .collect();

        let empty_message = match (self.selected_group(), members.is_empty()) {
            (Some(_), true) if !self.search_term.is_empty() => {
                Some("No members found matching your search")
            }
            (Some(_), true) => Some("No members in this group"),
            (None, _) if self.groups.is_empty() => Some("No risk groups found"),
            _ => None,
        };

        GroupsPageView {
            groups: self.groups.iter().map(GroupSummary::from_group).collect(),
            selected: self.selected_group().map(GroupSummary::from_group),
            members,
            search_term: self.search_term.clone(),
            empty_message,
            notifications: self.notifications.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub member_count: u64,
    pub created_at: String,
}

impl GroupSummary {
    fn from_group(group: &RiskGroup) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            description: group.description.clone(),
            member_count: group.member_count.unwrap_or(0),
            created_at: format_date(&group.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRow {
    pub id: UserId,
    pub display_name: String,
    pub initials: String,
    pub email: String,
    pub age: Option<u32>,
    pub added_at: String,
    pub added_by: Option<UserId>,
    pub is_active: bool,
}

impl MemberRow {
    fn from_member(member: &RiskGroupMember) -> Self {
        let name = member_display_name(member);
        Self {
            id: member.id,
            initials: initials(&name),
            display_name: name,
            email: member.email.clone(),
            age: member.age,
            added_at: format_date(&member.added_at),
            added_by: member.added_by,
            is_active: member.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsPageView {
    pub groups: Vec<GroupSummary>,
    pub selected: Option<GroupSummary>,
    pub members: Vec<MemberRow>,
    pub search_term: String,
    pub empty_message: Option<&'static str>,
    pub notifications: Notifications,
}
