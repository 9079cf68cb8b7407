use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Server-computed aggregate over one metric within a date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BiometricResponse {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BiometricParams {
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl BiometricParams {
    pub fn window(start: DateTime<Utc>, end: DateTime<Utc>, limit: Option<u32>) -> Self {
        Self {
            start_date: iso_timestamp(start),
            end_date: iso_timestamp(end),
            limit,
            offset: None,
        }
    }
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_formats_dates_with_millis() {
        let end = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let start = end - chrono::Duration::days(7);
        let params = BiometricParams::window(start, end, Some(1000));
        assert_eq!(params.start_date, "2026-10-11T12:00:00.000Z");
        assert_eq!(params.end_date, "2026-10-18T12:00:00.000Z");
    }

    #[test]
    fn test_std_dev_is_optional() {
        let stats: BiometricResponse =
            serde_json::from_str(r#"{"mean": 61.5, "min": 40, "max": 90, "count": 12}"#).unwrap();
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.count, 12);
    }
}
