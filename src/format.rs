//! Compact relative ages for post timestamps (`45s`, `3m`, `2h`, `5d`, `4mo`, `2y`).

use chrono::{DateTime, Utc};

const MINUTES_IN_HOUR: f64 = 60.0;
const MINUTES_IN_DAY: f64 = 1_440.0;
const MINUTES_IN_MONTH: f64 = 43_200.0;
const MINUTES_IN_YEAR: f64 = 525_600.0;

/// Age of `created_at` as seen at `now`, in the largest whole unit.
///
/// Values are rounded to the nearest unit; timestamps in the future are
/// measured by their absolute distance.
pub fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = (now - created_at).num_milliseconds().unsigned_abs() as f64;
    let minutes = millis / 60_000.0;

    if minutes < 1.0 {
        return format!("{}s", (millis / 1_000.0).round());
    }
    if minutes < MINUTES_IN_HOUR {
        return format!("{}m", minutes.round());
    }
    if minutes < MINUTES_IN_DAY {
        return format!("{}h", (minutes / MINUTES_IN_HOUR).round());
    }
    if minutes < MINUTES_IN_MONTH {
        return format!("{}d", (minutes / MINUTES_IN_DAY).round());
    }
    if minutes < MINUTES_IN_YEAR {
        let months = (minutes / MINUTES_IN_MONTH).round();
        if months >= 12.0 {
            return "1y".to_string();
        }
        return format!("{months}mo");
    }
    format!("{}y", (minutes / MINUTES_IN_YEAR).round())
}

/// [`format_age`] relative to the current time.
pub fn age_now(created_at: DateTime<Utc>) -> String {
    format_age(created_at, Utc::now())
}
