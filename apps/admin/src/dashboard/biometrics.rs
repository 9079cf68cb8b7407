//! Biometric tab: four aggregate queries over a trailing window.
//!
//! The queries run concurrently and settle independently. A rejected query
//! leaves its card empty ("No data available") without failing the others.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api_client::{ApiError, BiometricApi, Metric};
use crate::models::{BiometricParams, BiometricResponse};

pub const SAMPLE_LIMIT: u32 = 1000;
pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7")]
    Week,
    #[serde(rename = "30")]
    Month,
    #[serde(rename = "90")]
    Quarter,
}

impl TimeRange {
    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Week => "7 Days",
            TimeRange::Month => "30 Days",
            TimeRange::Quarter => "90 Days",
        }
    }

    pub fn params(self, now: DateTime<Utc>) -> BiometricParams {
        BiometricParams::window(now - Duration::days(self.days()), now, Some(SAMPLE_LIMIT))
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7" => Ok(TimeRange::Week),
            "30" => Ok(TimeRange::Month),
            "90" => Ok(TimeRange::Quarter),
            other => Err(format!("range must be 7, 30 or 90 days, got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub metric: Metric,
    pub title: &'static str,
    pub stats: Option<BiometricResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl MetricCard {
    fn settle(metric: Metric, result: Result<BiometricResponse, ApiError>) -> Self {
        let stats = result
            .map_err(|e| warn!("{} query failed: {e}", metric.title()))
            .ok();
        Self {
            metric,
            title: metric.title(),
            placeholder: stats.is_none().then_some(NO_DATA),
            stats,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricView {
    pub range: TimeRange,
    pub range_label: &'static str,
    pub start_date: String,
    pub end_date: String,
    pub cards: Vec<MetricCard>,
}

pub struct BiometricTab {
    api: Arc<dyn BiometricApi>,
    range: TimeRange,
}

impl BiometricTab {
    pub fn new(api: Arc<dyn BiometricApi>, range: TimeRange) -> Self {
        Self { api, range }
    }

    /// Issues all four queries over the window ending at `now`. No retry, no backoff.
    pub async fn refresh(&self, now: DateTime<Utc>) -> BiometricView {
        let params = self.range.params(now);
        let api = self.api.as_ref();
        let (hrv, bpm, spo2, battery) = tokio::join!(
            api.get_hrv(&params),
            api.get_bpm(&params),
            api.get_spo2(&params),
            api.get_battery_level(&params),
        );

        BiometricView {
            range: self.range,
            range_label: self.range.label(),
            start_date: params.start_date,
            end_date: params.end_date,
            cards: vec![
                MetricCard::settle(Metric::Hrv, hrv),
                MetricCard::settle(Metric::Bpm, bpm),
                MetricCard::settle(Metric::Spo2, spo2),
                MetricCard::settle(Metric::BatteryLevel, battery),
            ],
        }
    }
}
