//! Display formatting shared by the dashboard views. Nothing here touches the network.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

pub const INVALID_DATE: &str = "Invalid Date";

/// "First Last", whichever name is present, or the local part of the email.
pub fn display_name(first_name: &str, last_name: &str, email: &str) -> String {
    match (first_name.is_empty(), last_name.is_empty()) {
        (false, false) => format!("{first_name} {last_name}"),
        (false, true) => first_name.to_string(),
        (true, false) => last_name.to_string(),
        (true, true) => email.split('@').next().unwrap_or_default().to_string(),
    }
}

/// Up to two uppercase initials, one per word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Case-insensitive substring match against any of the fields.
pub fn matches_search<'a>(fields: impl IntoIterator<Item = &'a str>, term: &str) -> bool {
    let term = term.to_lowercase();
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// "Oct 18, 2026"
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// "October 18, 2026 at 09:05 AM"
pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%B %-d, %Y at %I:%M %p").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

pub fn time_since(raw: &str, now: DateTime<Utc>) -> String {
    let Some(ts) = parse_timestamp(raw) else {
        return INVALID_DATE.to_string();
    };
    let hours = (now - ts).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days}d ago");
    }
    format_date(raw)
}

/// Coarse RSSI label used in the device table.
pub fn signal_strength(rssi: i32) -> &'static str {
    match rssi {
        r if r > -50 => "Excellent",
        r if r > -60 => "Good",
        r if r > -70 => "Fair",
        _ => "Poor",
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignalQuality {
    pub percentage: u8,
    pub quality: &'static str,
}

/// RSSI mapped onto 0..=100 from the usual -100..-30 dBm range.
pub fn signal_quality(rssi: i32) -> SignalQuality {
    let percentage = ((f64::from(rssi) + 100.0) * 1.43).clamp(0.0, 100.0);
    let quality = if percentage > 75.0 {
        "Excellent"
    } else if percentage > 50.0 {
        "Good"
    } else if percentage > 25.0 {
        "Fair"
    } else {
        "Poor"
    };
    SignalQuality {
        percentage: percentage.round() as u8,
        quality,
    }
}
