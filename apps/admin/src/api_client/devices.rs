use async_trait::async_trait;

use crate::api_client::{ApiError, AuthorizedClient};
use crate::models::Device;

const DEVICES_PATH: &str = "/api/v1/biometric/devices";

#[async_trait]
pub trait DeviceApi: Send + Sync {
    async fn get_all_devices(&self) -> Result<Vec<Device>, ApiError>;
}

#[async_trait]
impl DeviceApi for AuthorizedClient {
    async fn get_all_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.get_json(DEVICES_PATH, "fetch devices").await
    }
}
