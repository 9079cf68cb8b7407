use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::api_client::{ApiError, AuthorizedClient};
use crate::models::{BiometricParams, BiometricResponse};

/// Aggregated metrics exposed under `/api/v1/biometric/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Hrv,
    Bpm,
    Spo2,
    BatteryLevel,
}

impl Metric {
    #[cfg(test)]
    pub const ALL: [Metric; 4] = [Metric::Hrv, Metric::Bpm, Metric::Spo2, Metric::BatteryLevel];

    pub fn path(self) -> &'static str {
        match self {
            Metric::Hrv => "/api/v1/biometric/hrv",
            Metric::Bpm => "/api/v1/biometric/bpm",
            Metric::Spo2 => "/api/v1/biometric/spo2",
            Metric::BatteryLevel => "/api/v1/biometric/battery-level",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            Metric::Hrv => "fetch HRV data",
            Metric::Bpm => "fetch BPM data",
            Metric::Spo2 => "fetch SPO2 data",
            Metric::BatteryLevel => "fetch battery level data",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Hrv => "Heart Rate Variability",
            Metric::Bpm => "Heart Rate",
            Metric::Spo2 => "Blood Oxygen",
            Metric::BatteryLevel => "Device Battery",
        }
    }
}

#[async_trait]
pub trait BiometricApi: Send + Sync {
    async fn get_metric(
        &self,
        metric: Metric,
        params: &BiometricParams,
    ) -> Result<BiometricResponse, ApiError>;

    async fn get_hrv(&self, params: &BiometricParams) -> Result<BiometricResponse, ApiError> {
        self.get_metric(Metric::Hrv, params).await
    }

    async fn get_bpm(&self, params: &BiometricParams) -> Result<BiometricResponse, ApiError> {
        self.get_metric(Metric::Bpm, params).await
    }

    async fn get_spo2(&self, params: &BiometricParams) -> Result<BiometricResponse, ApiError> {
        self.get_metric(Metric::Spo2, params).await
    }

    async fn get_battery_level(
        &self,
        params: &BiometricParams,
    ) -> Result<BiometricResponse, ApiError> {
        self.get_metric(Metric::BatteryLevel, params).await
    }

    /// True when any HRV sample exists in the last `hours`. Every failure other
    /// than missing credentials reads as "no activity", as does a window that
    /// falls outside the representable time range.
    async fn has_recent_activity(&self, hours: i64, now: DateTime<Utc>) -> Result<bool, ApiError> {
        let Some(start) = Duration::try_hours(hours).and_then(|span| now.checked_sub_signed(span))
        else {
            debug!("recent activity window of {hours}h is out of range");
            return Ok(false);
        };
        let params = BiometricParams::window(start, now, Some(1));
        match self.get_hrv(&params).await {
            Ok(stats) => Ok(stats.count > 0),
            Err(ApiError::MissingCredentials) => Err(ApiError::MissingCredentials),
            Err(e) => {
                debug!("recent activity check failed: {e}");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl BiometricApi for AuthorizedClient {
    async fn get_metric(
        &self,
        metric: Metric,
        params: &BiometricParams,
    ) -> Result<BiometricResponse, ApiError> {
        self.get_json_with_query(metric.path(), metric.operation(), params)
            .await
    }
}
