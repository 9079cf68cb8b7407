use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::api_client::envelope::{decode_list, decode_members};
use crate::api_client::{ApiError, AuthorizedClient};
use crate::models::risk_group::{GroupId, UserId};
use crate::models::{
    CreateRiskGroupRequest, MessageResponse, RiskGroup, RiskGroupMembersParams,
    RiskGroupMembersResponse, UpdateRiskGroupRequest, UserRiskGroups,
};

const RISK_GROUPS_PATH: &str = "/api/v1/risk-group/risk-groups";

fn group_path(id: GroupId) -> String {
    format!("{RISK_GROUPS_PATH}/{id}")
}

fn member_path(group_id: GroupId, user_id: UserId) -> String {
    format!("{RISK_GROUPS_PATH}/{group_id}/members/{user_id}")
}

/// Risk-group endpoints. Only the two list reads are lenient; every mutation
/// propagates its error to the caller.
#[async_trait]
pub trait RiskGroupApi: Send + Sync {
    async fn create_risk_group(
        &self,
        request: &CreateRiskGroupRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn get_all_risk_groups(&self) -> Result<Vec<RiskGroup>, ApiError>;

    async fn get_risk_group(&self, id: GroupId) -> Result<RiskGroup, ApiError>;

    async fn update_risk_group(
        &self,
        id: GroupId,
        request: &UpdateRiskGroupRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn delete_risk_group(&self, id: GroupId) -> Result<MessageResponse, ApiError>;

    async fn add_user_to_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError>;

    async fn remove_user_from_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError>;

    async fn get_risk_group_members(
        &self,
        group_id: GroupId,
        params: &RiskGroupMembersParams,
    ) -> Result<RiskGroupMembersResponse, ApiError>;

    async fn get_user_risk_groups(&self, user_id: UserId) -> Result<UserRiskGroups, ApiError>;
}

#[async_trait]
impl RiskGroupApi for AuthorizedClient {
    async fn create_risk_group(
        &self,
        request: &CreateRiskGroupRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.mutate_json(Method::POST, RISK_GROUPS_PATH, "create risk group", request)
            .await
    }

    async fn get_all_risk_groups(&self) -> Result<Vec<RiskGroup>, ApiError> {
        const OPERATION: &str = "fetch risk groups";
        let result = match self.get_json::<Value>(RISK_GROUPS_PATH, OPERATION).await {
            Ok(value) => decode_list(value, OPERATION),
            Err(e) => Err(e),
        };
        self.policy().recover(OPERATION, result, Vec::new)
    }

    async fn get_risk_group(&self, id: GroupId) -> Result<RiskGroup, ApiError> {
        self.get_json(&group_path(id), "fetch risk group").await
    }

    async fn update_risk_group(
        &self,
        id: GroupId,
        request: &UpdateRiskGroupRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.mutate_json(Method::PUT, &group_path(id), "update risk group", request)
            .await
    }

    async fn delete_risk_group(&self, id: GroupId) -> Result<MessageResponse, ApiError> {
        self.mutate(Method::DELETE, &group_path(id), "delete risk group")
            .await
    }

    async fn add_user_to_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError> {
        self.mutate(
            Method::POST,
            &member_path(group_id, user_id),
            "add user to group",
        )
        .await
    }

    async fn remove_user_from_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError> {
        self.mutate(
            Method::DELETE,
            &member_path(group_id, user_id),
            "remove user from group",
        )
        .await
    }

    async fn get_risk_group_members(
        &self,
        group_id: GroupId,
        params: &RiskGroupMembersParams,
    ) -> Result<RiskGroupMembersResponse, ApiError> {
        const OPERATION: &str = "fetch risk group members";
        let path = format!("{}/members", group_path(group_id));
        let fetched = if params.is_empty() {
            self.get_json::<Value>(&path, OPERATION).await
        } else {
            self.get_json_with_query::<Value, _>(&path, OPERATION, params)
                .await
        };
        let result = fetched.and_then(|value| decode_members(value, OPERATION));
        self.policy().recover(OPERATION, result, || {
            RiskGroupMembersResponse::empty(params.limit)
        })
    }

    async fn get_user_risk_groups(&self, user_id: UserId) -> Result<UserRiskGroups, ApiError> {
        self.get_json(
            &format!("/api/v1/risk-group/users/{user_id}/risk-groups"),
            "fetch user risk groups",
        )
        .await
    }
}
