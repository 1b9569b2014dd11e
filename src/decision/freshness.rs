/// Age classification for air readings.
///
/// The upstream stamps readings with a KST wall-clock time like
/// "2024-05-01 13:00" and publishes hourly. A reading within the hour is
/// fresh; past one publication cycle it is delayed; past ninety minutes the
/// caller should be told the numbers are old.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::decision::kst_offset;

pub const DELAYED_AFTER_MINUTES: i64 = 60;
pub const STALE_AFTER_MINUTES: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingAge {
    Fresh,
    Delayed,
    Stale,
    /// Timestamp missing or unparseable; age cannot be judged.
    Unknown,
}

/// Parses an upstream "YYYY-MM-DD HH:MM" timestamp as KST wall-clock time.
pub fn parse_kst_data_time(text: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M").ok()?;
    let local = kst_offset().from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

/// Classifies a reading's age at the given instant. A timestamp in the
/// future counts as age zero rather than an error; station clocks drift.
pub fn classify_reading_age_at(data_time: Option<&str>, now: DateTime<Utc>) -> ReadingAge {
    let Some(measured) = data_time.and_then(parse_kst_data_time) else {
        return ReadingAge::Unknown;
    };

    let age_minutes = (now - measured).num_minutes().max(0);
    if age_minutes >= STALE_AFTER_MINUTES {
        ReadingAge::Stale
    } else if age_minutes >= DELAYED_AFTER_MINUTES {
        ReadingAge::Delayed
    } else {
        ReadingAge::Fresh
    }
}

/// Like [`classify_reading_age_at`] with the current time.
pub fn classify_reading_age(data_time: Option<&str>) -> ReadingAge {
    classify_reading_age_at(data_time, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
