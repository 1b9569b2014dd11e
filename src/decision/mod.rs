/// Decision layer: everything that turns fetched data into judgment.
///
/// Submodules are pure functions over already-fetched values so they can be
/// tested without network access:
///   - `grades`: pollutant value-to-grade breakpoints
///   - `signals`: risk adjustment, policy overrides and the signal record
///   - `reliability`: trust-tier classification of one fetch
///   - `freshness`: age classification of a reading's timestamp
///
/// Time-dependent entry points come in pairs, a `*_at` variant taking the
/// clock value and a convenience wrapper reading the system clock, so tests
/// can pin the hour.

pub mod freshness;
pub mod grades;
pub mod reliability;
pub mod signals;

use chrono::{DateTime, FixedOffset, Timelike, Utc};

/// Korea Standard Time. A fixed offset is enough; Korea has not observed
/// DST since 1988.
pub fn kst_offset() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("+09:00 is a valid offset")
}

/// Hour of day in Seoul, for policy windows keyed to local afternoon.
pub fn seoul_hour_at(now: DateTime<Utc>) -> u32 {
    now.with_timezone(&kst_offset()).hour()
}

pub fn seoul_hour_now() -> u32 {
    seoul_hour_at(Utc::now())
}
