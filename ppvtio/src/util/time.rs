use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Largest absolute millisecond offset a JavaScript `Date` accepts.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Get the current time as a UTC datetime.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert epoch seconds into a UTC datetime with millisecond precision.
///
/// Fractional milliseconds are truncated toward zero. Returns `None` for
/// non-finite or out-of-range input.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    let millis = (secs * 1000.0).trunc();
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Format as ISO 8601 with milliseconds and a `Z` suffix
/// (e.g. `"2023-11-14T22:13:20.000Z"`).
pub fn to_iso_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Epoch seconds straight to an ISO 8601 string.
pub fn epoch_seconds_to_iso(secs: f64) -> Option<String> {
    from_epoch_seconds(secs).map(|dt| to_iso_millis(&dt))
}
