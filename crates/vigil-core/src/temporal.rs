//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision. Case ages, SLA deadlines, and escalation dates are all
//! derived from this type, so the whole workspace shares one clock
//! discipline: UTC in, UTC out, no sub-second noise in audit rows.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating.
/// - [`Timestamp::parse()`] — from an RFC 3339 string; offsets are
///   normalized to UTC (ingest path is lenient, output is always UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate(dt))
    }

    /// Parse an RFC 3339 string, converting any offset to UTC.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| CoreError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate(dt.with_timezone(&Utc))))
    }

    /// From a Unix epoch timestamp in seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp {
                value: secs.to_string(),
                reason: "out of range for Unix timestamp".into(),
            })
    }

    /// The Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Whole hours elapsed from `earlier` to `self`.
    ///
    /// Negative when `earlier` is actually later — callers comparing
    /// against thresholds get the arithmetic they expect either way.
    pub fn hours_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_hours()
    }

    /// A timestamp `hours` hours after this one.
    pub fn plus_hours(&self, hours: u32) -> Self {
        Self(self.0 + Duration::hours(i64::from(hours)))
    }

    /// A timestamp `hours` hours before this one.
    pub fn minus_hours(&self, hours: u32) -> Self {
        Self(self.0 - Duration::hours(i64::from(hours)))
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2026-03-01T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Discard sub-second components.
fn truncate(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn parse_normalizes_offset_to_utc() {
        let ts = Timestamp::parse("2026-03-01T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn parse_truncates_subseconds() {
        let ts = Timestamp::parse("2026-03-01T12:00:00.987654Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-03-01").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn hours_since_is_signed() {
        let earlier = at(2026, 3, 1, 0, 0, 0);
        let later = at(2026, 3, 2, 6, 0, 0);
        assert_eq!(later.hours_since(earlier), 30);
        assert_eq!(earlier.hours_since(later), -30);
    }

    #[test]
    fn hours_since_truncates_partial_hours() {
        let earlier = at(2026, 3, 1, 0, 0, 0);
        let later = at(2026, 3, 1, 1, 59, 59);
        assert_eq!(later.hours_since(earlier), 1);
    }

    #[test]
    fn plus_minus_hours_roundtrip() {
        let ts = at(2026, 3, 1, 12, 0, 0);
        assert_eq!(ts.plus_hours(48).minus_hours(48), ts);
        assert_eq!(ts.plus_hours(24).to_iso8601(), "2026-03-02T12:00:00Z");
    }

    #[test]
    fn epoch_roundtrip() {
        let ts = at(2026, 3, 1, 12, 0, 0);
        let back = Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn ordering_follows_time() {
        assert!(at(2026, 3, 1, 0, 0, 0) < at(2026, 3, 1, 0, 0, 1));
    }

    #[test]
    fn display_matches_iso8601() {
        let ts = at(2026, 12, 31, 23, 59, 59);
        assert_eq!(format!("{ts}"), "2026-12-31T23:59:59Z");
    }

    #[test]
    fn serde_roundtrip() {
        let ts = at(2026, 3, 1, 12, 0, 0);
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }

    proptest::proptest! {
        // Any epoch second in a sane range survives the round trip, and
        // hour arithmetic agrees with raw second arithmetic.
        #[test]
        fn epoch_roundtrip_holds(secs in 0i64..4_102_444_800) {
            let ts = Timestamp::from_epoch_secs(secs).unwrap();
            proptest::prop_assert_eq!(ts.epoch_secs(), secs);
        }

        #[test]
        fn plus_hours_adds_whole_hours(secs in 0i64..4_000_000_000, hours in 0u32..10_000) {
            let ts = Timestamp::from_epoch_secs(secs).unwrap();
            let later = ts.plus_hours(hours);
            proptest::prop_assert_eq!(later.epoch_secs() - ts.epoch_secs(), i64::from(hours) * 3600);
            proptest::prop_assert_eq!(later.hours_since(ts), i64::from(hours));
        }
    }
}
