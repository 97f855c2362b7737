//! Pending booking draft handed from a quick-book entry point to a
//! category booking page.

use crate::cart::ServiceCategory;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// How long a draft stays readable after it was written.
pub const DEFAULT_DRAFT_TTL_MINUTES: i64 = 10;

/// How far in the future a draft's timestamp may lie before it is treated
/// as expired.
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 60;

/// Short-lived cross-page booking context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingBooking {
    pub category: ServiceCategory,
    pub pickup_date: NaiveDate,
    pub phone_number: String,
    pub address: String,
    /// Write time, stored as Unix milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl PendingBooking {
    /// Create a draft stamped with the current time, to the millisecond.
    pub fn new(
        category: ServiceCategory,
        pickup_date: NaiveDate,
        phone_number: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            category,
            pickup_date,
            phone_number: phone_number.into(),
            address: address.into(),
            timestamp: now_millis(),
        }
    }

    /// Override the write time.
    pub fn stamped_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// `now − timestamp > ttl`. A draft read exactly at the limit is still live.
    /// A timestamp more than [`MAX_CLOCK_SKEW_SECONDS`] ahead of `now` also
    /// counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        age > ttl || age < -Duration::seconds(MAX_CLOCK_SKEW_SECONDS)
    }
}

fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_at(ts: DateTime<Utc>) -> PendingBooking {
        PendingBooking::new(
            ServiceCategory::Laundry,
            NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
            "+91 98450 12345",
            "12 MG Road, Bengaluru",
        )
        .stamped_at(ts)
    }

    #[test]
    fn test_expiry_boundary() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let ttl = Duration::minutes(DEFAULT_DRAFT_TTL_MINUTES);
        let draft = draft_at(ts);

        assert!(!draft.is_expired_at(ts + Duration::minutes(9), ttl));
        assert!(!draft.is_expired_at(ts + Duration::minutes(10), ttl));
        assert!(draft.is_expired_at(ts + Duration::minutes(10) + Duration::seconds(1), ttl));
    }

    #[test]
    fn test_future_timestamp_expires() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let ttl = Duration::minutes(DEFAULT_DRAFT_TTL_MINUTES);

        assert!(!draft_at(now + Duration::seconds(MAX_CLOCK_SKEW_SECONDS)).is_expired_at(now, ttl));
        assert!(draft_at(now + Duration::seconds(MAX_CLOCK_SKEW_SECONDS + 1)).is_expired_at(now, ttl));
        assert!(draft_at(now + Duration::days(365)).is_expired_at(now, ttl));
    }

    #[test]
    fn test_wire_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let json = serde_json::to_value(draft_at(ts)).unwrap();
        assert_eq!(json["category"], "Laundry");
        assert_eq!(json["pickupDate"], "2026-10-21");
        assert_eq!(json["phoneNumber"], "+91 98450 12345");
        assert_eq!(json["timestamp"], ts.timestamp_millis());
    }
}
