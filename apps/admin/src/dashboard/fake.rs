//! In-memory backend used by the view-model tests. Records every call in order
//! and lets a test make individual operations fail.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api_client::{ApiError, BiometricApi, DeviceApi, Metric, RiskGroupApi, UserDirectoryApi};
use crate::models::risk_group::{GroupId, UserId};
use crate::models::{
    BiometricParams, BiometricResponse, CreateRiskGroupRequest, Device, MessageResponse,
    RiskGroup, RiskGroupMember, RiskGroupMembersParams, RiskGroupMembersResponse,
    UpdateRiskGroupRequest, UserGroupEntry, UserProfile, UserRiskGroups,
};

#[derive(Default)]
struct Inner {
    groups: Vec<RiskGroup>,
    members: HashMap<GroupId, Vec<UserId>>,
    users: Vec<UserProfile>,
    devices: Vec<Device>,
    metrics: HashMap<Metric, BiometricResponse>,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
    next_id: GroupId,
}

#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

pub fn group(id: GroupId, name: &str) -> RiskGroup {
    RiskGroup {
        id,
        name: name.to_string(),
        description: format!("{name} cohort"),
        created_at: "2026-01-05T10:00:00Z".to_string(),
        updated_at: "2026-01-05T10:00:00Z".to_string(),
        member_count: None,
    }
}

pub fn user(id: UserId, first: &str, last: &str, email: &str) -> UserProfile {
    UserProfile {
        id,
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
    }
}

pub fn stats(mean: f64) -> BiometricResponse {
    BiometricResponse {
        mean,
        min: mean - 10.0,
        max: mean + 10.0,
        count: 24,
        std_dev: Some(2.5),
    }
}

impl FakeBackend {
    pub fn with_groups(groups: Vec<RiskGroup>) -> Self {
        let backend = Self::default();
        {
            let mut inner = backend.inner.lock().unwrap();
            inner.next_id = groups.iter().map(|g| g.id).max().unwrap_or(0) + 1;
            inner.groups = groups;
        }
        backend
    }

    pub fn add_users(&self, users: Vec<UserProfile>) {
        self.inner.lock().unwrap().users.extend(users);
    }

    pub fn set_members(&self, group_id: GroupId, user_ids: &[UserId]) {
        self.inner
            .lock()
            .unwrap()
            .members
            .insert(group_id, user_ids.to_vec());
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        self.inner.lock().unwrap().devices = devices;
    }

    pub fn set_metric(&self, metric: Metric, response: BiometricResponse) {
        self.inner.lock().unwrap().metrics.insert(metric, response);
    }

    /// Makes every call whose log entry starts with `operation` fail.
    pub fn fail(&self, operation: &'static str) {
        self.inner.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.inner.lock().unwrap().failing.remove(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn members_of(&self, group_id: GroupId) -> Vec<UserId> {
        self.inner
            .lock()
            .unwrap()
            .members
            .get(&group_id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let failing = inner.failing.iter().find(|op| call.starts_with(*op)).copied();
        inner.calls.push(call);
        match failing {
            Some(operation) => Err(ApiError::RequestFailed {
                operation,
                status: 500,
            }),
            None => Ok(inner),
        }
    }

    fn member_record(inner: &Inner, user_id: UserId) -> RiskGroupMember {
        let profile = inner.users.iter().find(|u| u.id == user_id);
        RiskGroupMember {
            id: user_id,
            email: profile.map(|p| p.email.clone()).unwrap_or_default(),
            first_name: profile.map(|p| p.first_name.clone()).unwrap_or_default(),
            last_name: profile.map(|p| p.last_name.clone()).unwrap_or_default(),
            age: Some(40),
            added_at: "2026-02-01T08:00:00Z".to_string(),
            added_by: Some(1),
            is_active: true,
        }
    }

    fn ok() -> MessageResponse {
        MessageResponse {
            message: "ok".to_string(),
        }
    }
}

#[async_trait]
impl RiskGroupApi for FakeBackend {
    async fn create_risk_group(
        &self,
        request: &CreateRiskGroupRequest,
    ) -> Result<MessageResponse, ApiError> {
        let mut inner = self.record(format!("create {}", request.name))?;
        let id = inner.next_id;
        inner.next_id += 1;
        let mut created = group(id, &request.name);
        created.description = request.description.clone();
        inner.groups.push(created);
        Ok(Self::ok())
    }

    async fn get_all_risk_groups(&self) -> Result<Vec<RiskGroup>, ApiError> {
        let inner = self.record("list groups".to_string())?;
        Ok(inner.groups.clone())
    }

    async fn get_risk_group(&self, id: GroupId) -> Result<RiskGroup, ApiError> {
        let inner = self.record(format!("get group {id}"))?;
        inner
            .groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(ApiError::RequestFailed {
                operation: "fetch risk group",
                status: 404,
            })
    }

    async fn update_risk_group(
        &self,
        id: GroupId,
        request: &UpdateRiskGroupRequest,
    ) -> Result<MessageResponse, ApiError> {
        let mut inner = self.record(format!("update {id}"))?;
        if let Some(g) = inner.groups.iter_mut().find(|g| g.id == id) {
            if let Some(name) = &request.name {
                g.name = name.clone();
            }
            if let Some(description) = &request.description {
                g.description = description.clone();
            }
        }
        Ok(Self::ok())
    }

    async fn delete_risk_group(&self, id: GroupId) -> Result<MessageResponse, ApiError> {
        let mut inner = self.record(format!("delete {id}"))?;
        inner.groups.retain(|g| g.id != id);
        inner.members.remove(&id);
        Ok(Self::ok())
    }

    async fn add_user_to_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError> {
        let mut inner = self.record(format!("add {user_id} to {group_id}"))?;
        inner.members.entry(group_id).or_default().push(user_id);
        Ok(Self::ok())
    }

    async fn remove_user_from_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError> {
        let mut inner = self.record(format!("remove {user_id} from {group_id}"))?;
        if let Some(members) = inner.members.get_mut(&group_id) {
            members.retain(|id| *id != user_id);
        }
        Ok(Self::ok())
    }

    async fn get_risk_group_members(
        &self,
        group_id: GroupId,
        params: &RiskGroupMembersParams,
    ) -> Result<RiskGroupMembersResponse, ApiError> {
        let inner = self.record(format!("members {group_id}"))?;
        let ids = inner.members.get(&group_id).cloned().unwrap_or_default();
        let limit = params.limit.unwrap_or(100);
        let data: Vec<_> = ids
            .iter()
            .take(limit as usize)
            .map(|id| Self::member_record(&inner, *id))
            .collect();
        Ok(RiskGroupMembersResponse {
            total: ids.len() as u64,
            offset: 0,
            limit,
            total_pages: if ids.is_empty() { 0 } else { 1 },
            data,
        })
    }

    async fn get_user_risk_groups(&self, user_id: UserId) -> Result<UserRiskGroups, ApiError> {
        let inner = self.record(format!("user groups {user_id}"))?;
        let groups = inner
            .groups
            .iter()
            .filter(|g| {
                inner
                    .members
                    .get(&g.id)
                    .is_some_and(|members| members.contains(&user_id))
            })
            .map(|g| UserGroupEntry {
                group_id: g.id,
                group_name: g.name.clone(),
                created_at: "2026-03-04T10:00:00Z".to_string(),
                added_by: Some(1),
            })
            .collect();
        Ok(UserRiskGroups {
            id: user_id,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            groups,
        })
    }
}

#[async_trait]
impl UserDirectoryApi for FakeBackend {
    async fn get_user_profiles(&self) -> Result<Vec<UserProfile>, ApiError> {
        let inner = self.record("users".to_string())?;
        Ok(inner.users.clone())
    }

    async fn get_current_profile(&self) -> Result<Value, ApiError> {
        self.record("profile".to_string())?;
        Ok(json!({"id": 1}))
    }
}

#[async_trait]
impl DeviceApi for FakeBackend {
    async fn get_all_devices(&self) -> Result<Vec<Device>, ApiError> {
        let inner = self.record("devices".to_string())?;
        Ok(inner.devices.clone())
    }
}

#[async_trait]
impl BiometricApi for FakeBackend {
    async fn get_metric(
        &self,
        metric: Metric,
        _params: &BiometricParams,
    ) -> Result<BiometricResponse, ApiError> {
        let inner = self.record(format!("metric {}", metric.path()))?;
        inner
            .metrics
            .get(&metric)
            .cloned()
            .ok_or(ApiError::RequestFailed {
                operation: "fetch metric",
                status: 404,
            })
    }
}
