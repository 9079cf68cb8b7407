use serde::{Deserialize, Serialize};

/// Last known advertisement/connection snapshot of a BLE peripheral. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub manufacturer_data: Option<String>,
    pub rssi: i32,
    #[serde(default)]
    pub mtu: u32,
    #[serde(default)]
    pub is_connectable: bool,
    #[serde(default, rename = "serviceUUIDs")]
    pub service_uuids: Option<Vec<String>>,
    #[serde(default, rename = "overflowServiceUUIDs")]
    pub overflow_service_uuids: Option<Vec<String>>,
    #[serde(default, rename = "solicitedServiceUUIDs")]
    pub solicited_service_uuids: Option<Vec<String>>,
    #[serde(default)]
    pub raw_scan_record: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub last_sync_at: String,
}
