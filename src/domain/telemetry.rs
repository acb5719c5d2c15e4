// Raw sample and per-minute aggregate domain models
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

const SECONDS_PER_MINUTE: i64 = 60;

/// A single reading as returned by the history source.
///
/// Raw states that could not be parsed as a number are carried as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub series_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(series_id: String, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            series_id,
            timestamp,
            value,
        }
    }
}

/// Timestamp truncated to whole minutes since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MinuteKey(i64);

impl MinuteKey {
    pub fn from_datetime(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp.timestamp().div_euclid(SECONDS_PER_MINUTE))
    }

    /// The key `minutes` minutes before this one.
    pub fn minus(self, minutes: i64) -> Self {
        Self(self.0 - minutes)
    }

    /// Start of the minute as a timestamp.
    pub fn start(self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.0 * SECONDS_PER_MINUTE, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    pub minute: MinuteKey,
    /// Mean value for the minute; degrees in `[0, 360)` for the direction series.
    pub value: f64,
}

impl AggregatedPoint {
    pub fn new(minute: MinuteKey, value: f64) -> Self {
        Self { minute, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_key_truncates_seconds() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 59).unwrap();
        let c = Utc.with_ymd_and_hms(2026, 3, 1, 12, 31, 0).unwrap();

        assert_eq!(MinuteKey::from_datetime(a), MinuteKey::from_datetime(b));
        assert!(MinuteKey::from_datetime(b) < MinuteKey::from_datetime(c));
        assert_eq!(MinuteKey::from_datetime(c).minus(1), MinuteKey::from_datetime(a));
        assert_eq!(MinuteKey::from_datetime(b).start(), a);
    }

    #[test]
    fn test_minute_key_before_epoch() {
        let t = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 30).unwrap();
        assert_eq!(MinuteKey::from_datetime(t), MinuteKey(-1));
    }
}
