//! Response schemas for list endpoints, validated once at the client boundary.
//!
//! The group list arrives either as a bare JSON array or wrapped as `{"data": [...]}`.
//! The member list is always the paging envelope `{data, total, offset, limit, totalPages}`.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::api_client::ApiError;
use crate::models::RiskGroupMembersResponse;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

pub fn decode_list<T: DeserializeOwned>(
    value: Value,
    operation: &'static str,
) -> Result<Vec<T>, ApiError> {
    serde_json::from_value::<ListEnvelope<T>>(value)
        .map(ListEnvelope::into_vec)
        .map_err(|_| ApiError::Decode {
            operation,
            detail: "expected an array or an object with a 'data' array".to_string(),
        })
}

pub fn decode_members(
    value: Value,
    operation: &'static str,
) -> Result<RiskGroupMembersResponse, ApiError> {
    if !value.get("data").is_some_and(Value::is_array) {
        return Err(ApiError::Decode {
            operation,
            detail: "missing 'data' array".to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        operation,
        detail: e.to_string(),
    })
}
