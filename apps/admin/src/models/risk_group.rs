use serde::{Deserialize, Serialize};

pub type GroupId = i64;
pub type UserId = i64;

/// Default page size the server assumes when a member query sets no limit.
pub const DEFAULT_MEMBER_LIMIT: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Cached locally once the group's members have been fetched; stale until reselected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskGroupMember {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub added_at: String,
    /// User id of whoever added the member; never resolved to a name.
    #[serde(default)]
    pub added_by: Option<UserId>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskGroupMembersResponse {
    pub data: Vec<RiskGroupMember>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl RiskGroupMembersResponse {
    /// Zeroed envelope substituted when the member list cannot be read.
    pub fn empty(requested_limit: Option<u32>) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            offset: 0,
            limit: requested_limit.unwrap_or(DEFAULT_MEMBER_LIMIT),
            total_pages: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupEntry {
    pub group_id: GroupId,
    pub group_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub added_by: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRiskGroups {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub groups: Vec<UserGroupEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRiskGroupRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRiskGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Acknowledgement body returned by every mutating endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MemberSortField {
    FirstName,
    LastName,
    Email,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for the paginated member list. Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskGroupMembersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<MemberSortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl RiskGroupMembersParams {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_members_params_omit_unset_fields() {
        let params = RiskGroupMembersParams {
            sort_by: Some(MemberSortField::FirstName),
            sort_order: Some(SortOrder::Asc),
            limit: Some(100),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"sortBy": "firstName", "sortOrder": "asc", "limit": 100})
        );
        assert!(RiskGroupMembersParams::default().is_empty());
    }

    #[test]
    fn test_empty_envelope_uses_requested_limit_or_default() {
        assert_eq!(RiskGroupMembersResponse::empty(Some(1000)).limit, 1000);
        let fallback = RiskGroupMembersResponse::empty(None);
        assert_eq!(fallback.limit, 100);
        assert_eq!(fallback.total, 0);
        assert_eq!(fallback.total_pages, 0);
        assert!(fallback.data.is_empty());
    }

    #[test]
    fn test_group_without_member_count_deserializes() {
        let group: RiskGroup = serde_json::from_value(json!({
            "id": 4,
            "name": "Cardiac",
            "description": "Elevated resting HR",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(group.member_count, None);
        assert_eq!(group.name, "Cardiac");
    }
}
