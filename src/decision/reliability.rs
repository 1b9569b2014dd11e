/// Trust-tier classification for one air-data fetch.
///
/// Every response tells the caller how much to trust the numbers in it.
/// Substitute data always outranks a mere station swap: a response built
/// from the unknown-station placeholder is DEGRADED even when a neighbor
/// station was also involved. The advice outcome is reported in the same
/// record but never changes the air-data tier.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{AiStatus, AirFetchResult, ReliabilityMeta, ReliabilityStatus};

const LIVE_LABEL: &str = "최근 1시간 기준 실측 데이터";
const LIVE_DESCRIPTION: &str = "현재 선택한 지역 측정소의 최근 1시간 기준 실측값을 반영했어요.";
const FALLBACK_LABEL: &str = "인근 측정소 자동 보정";
const FALLBACK_DESCRIPTION: &str =
    "입력 주소와 인접한 유효 측정소의 최근 1시간 기준 실측값으로 자동 보정했어요.";
const DEGRADED_LABEL: &str = "주변 평균 대체 데이터";
const DEGRADED_DESCRIPTION: &str =
    "실측 매칭에 실패해 주변 평균 대체 데이터를 안내하고 있어요.";

/// Classifies a fetch at the given instant. `updated_at` records the
/// classification time in RFC 3339 with millisecond precision.
pub fn build_reliability_meta_at(
    requested_station: &str,
    fetch: &AirFetchResult,
    ai_ok: bool,
    now: DateTime<Utc>,
) -> ReliabilityMeta {
    let (status, label, description) = if fetch.used_fallback_data || fetch.data.is_none() {
        (ReliabilityStatus::Degraded, DEGRADED_LABEL, DEGRADED_DESCRIPTION)
    } else if fetch.used_fallback_candidate {
        (ReliabilityStatus::StationFallback, FALLBACK_LABEL, FALLBACK_DESCRIPTION)
    } else {
        (ReliabilityStatus::Live, LIVE_LABEL, LIVE_DESCRIPTION)
    };

    ReliabilityMeta {
        status,
        label: label.to_string(),
        description: description.to_string(),
        requested_station: requested_station.to_string(),
        resolved_station: fetch.resolved_station.clone(),
        tried_stations: fetch.tried_stations.clone(),
        updated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        ai_status: if ai_ok { AiStatus::Ok } else { AiStatus::Failed },
    }
}

/// Like [`build_reliability_meta_at`] with the current time.
pub fn build_reliability_meta(
    requested_station: &str,
    fetch: &AirFetchResult,
    ai_ok: bool,
) -> ReliabilityMeta {
    build_reliability_meta_at(requested_station, fetch, ai_ok, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
