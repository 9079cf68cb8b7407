use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api_client::{ApiError, DeviceApi};
use crate::dashboard::display::{
    format_date, matches_search, signal_quality, signal_strength, time_since, SignalQuality,
};
use crate::dashboard::notifications::Notifications;
use crate::models::Device;

const DEFAULT_MODEL: &str = "EEG-2000";

pub struct DevicesPage {
    devices: Vec<Device>,
    search_term: String,
    notifications: Notifications,
}

impl DevicesPage {
    pub async fn load(api: Arc<dyn DeviceApi>) -> Self {
        let mut notifications = Notifications::default();
        let devices = match api.get_all_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                notifications.error("Failed to load devices", &e);
                Vec::new()
            }
        };
        Self {
            devices,
            search_term: String::new(),
            notifications,
        }
    }

    /// Like `load`, but a failed fetch is returned instead of read as an empty list.
    pub async fn fetch(api: Arc<dyn DeviceApi>) -> Result<Self, ApiError> {
        Ok(Self {
            devices: api.get_all_devices().await?,
            search_term: String::new(),
            notifications: Notifications::default(),
        })
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Matches name, local name or id.
    pub fn filtered(&self) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|d| {
                matches_search(
                    [
                        d.name.as_str(),
                        d.local_name.as_deref().unwrap_or_default(),
                        d.id.as_str(),
                    ],
                    &self.search_term,
                )
            })
            .collect()
    }

    pub fn find(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> DevicesView {
        DevicesView {
            devices: self
                .filtered()
                .into_iter()
                .map(|d| DeviceRow::from_device(d, now))
                .collect(),
            search_term: self.search_term.clone(),
            notifications: self.notifications.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRow {
    pub id: String,
    pub name: String,
    pub local_name: Option<String>,
    pub rssi: i32,
    pub signal: &'static str,
    pub is_connectable: bool,
    pub last_sync: String,
    pub registered: String,
}

impl DeviceRow {
    fn from_device(device: &Device, now: DateTime<Utc>) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            local_name: device.local_name.clone(),
            rssi: device.rssi,
            signal: signal_strength(device.rssi),
            is_connectable: device.is_connectable,
            last_sync: time_since(&device.last_sync_at, now),
            registered: format_date(&device.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesView {
    pub devices: Vec<DeviceRow>,
    pub search_term: String,
    pub notifications: Notifications,
}

/// Detail card for one device.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    pub id: String,
    pub model: String,
    pub local_name: Option<String>,
    pub status: &'static str,
    pub signal: SignalQuality,
    pub rssi: i32,
    pub mtu: u32,
    pub manufacturer_data: Option<String>,
    pub service_uuids: Vec<String>,
    pub overflow_service_uuids: Vec<String>,
    pub solicited_service_uuids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub last_sync: String,
}

impl DeviceDetails {
    pub fn from_device(device: &Device, now: DateTime<Utc>) -> Self {
        Self {
            id: device.id.clone(),
            model: device_model(&device.name),
            local_name: device.local_name.clone(),
            status: if device.is_connectable {
                "Connected"
            } else {
                "Disconnected"
            },
            signal: signal_quality(device.rssi),
            rssi: device.rssi,
            mtu: device.mtu,
            manufacturer_data: device.manufacturer_data.clone(),
            service_uuids: device.service_uuids.clone().unwrap_or_default(),
            overflow_service_uuids: device.overflow_service_uuids.clone().unwrap_or_default(),
            solicited_service_uuids: device.solicited_service_uuids.clone().unwrap_or_default(),
            created_at: format_date(&device.created_at),
            updated_at: format_date(&device.updated_at),
            last_sync: time_since(&device.last_sync_at, now),
        }
    }
}

/// Devices advertising an EEG name keep it; everything else is the stock headset.
pub fn device_model(name: &str) -> String {
    if name.contains("EEG") {
        name.to_string()
    } else {
        DEFAULT_MODEL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fake::FakeBackend;
    use chrono::TimeZone;

    fn device(id: &str, name: &str, local_name: Option<&str>, rssi: i32) -> Device {
        Device {
            id: id.to_string(),
            name: name.to_string(),
            local_name: local_name.map(str::to_string),
            manufacturer_data: None,
            rssi,
            mtu: 185,
            is_connectable: rssi > -70,
            service_uuids: Some(vec!["180d".to_string()]),
            overflow_service_uuids: None,
            solicited_service_uuids: None,
            raw_scan_record: None,
            created_at: "2026-01-10T00:00:00Z".to_string(),
            updated_at: "2026-10-01T00:00:00Z".to_string(),
            last_sync_at: "2026-10-18T09:00:00Z".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn backend() -> Arc<FakeBackend> {
        let backend = FakeBackend::default();
        backend.set_devices(vec![
            device("AA:01", "EEG Band", Some("wrist-left"), -45),
            device("BB:02", "Headset", None, -80),
        ]);
        Arc::new(backend)
    }

    #[tokio::test]
    async fn test_search_matches_name_local_name_and_id() {
        let mut page = DevicesPage::load(backend()).await;

        page.set_search("WRIST");
        assert_eq!(page.filtered()[0].id, "AA:01");
        page.set_search("bb:");
        assert_eq!(page.filtered()[0].id, "BB:02");
        page.set_search("");
        assert_eq!(page.filtered().len(), 2);
    }

    #[tokio::test]
    async fn test_rows_carry_signal_and_sync_age() {
        let page = DevicesPage::load(backend()).await;
        let view = page.snapshot(now());
        assert_eq!(view.devices[0].signal, "Excellent");
        assert_eq!(view.devices[0].last_sync, "3h ago");
        assert_eq!(view.devices[1].signal, "Poor");
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let backend = backend();
        backend.fail("devices");
        let page = DevicesPage::load(backend).await;
        assert!(page.filtered().is_empty());
        assert_eq!(
            page.snapshot(now()).notifications.last().unwrap().title,
            "Failed to load devices"
        );
    }

    #[tokio::test]
    async fn test_fetch_propagates_failure() {
        let backend = backend();
        backend.fail("devices");
        assert!(DevicesPage::fetch(backend.clone()).await.is_err());

        backend.recover("devices");
        let page = DevicesPage::fetch(backend).await.unwrap();
        assert!(page.find("AA:01").is_some());
        assert!(page.find("CC:03").is_none());
    }

    #[test]
    fn test_details() {
        let details = DeviceDetails::from_device(&device("BB:02", "Headset", None, -80), now());
        assert_eq!(details.model, "EEG-2000");
        assert_eq!(details.status, "Disconnected");
        assert_eq!(details.signal.percentage, 29);
        assert_eq!(details.signal.quality, "Fair");
        assert_eq!(details.service_uuids, vec!["180d".to_string()]);
        assert!(details.overflow_service_uuids.is_empty());
        assert_eq!(details.created_at, "Jan 10, 2026");
    }

    #[test]
    fn test_eeg_names_are_kept_as_model() {
        assert_eq!(device_model("EEG Band"), "EEG Band");
        assert_eq!(device_model("Pulse"), "EEG-2000");
    }
}
