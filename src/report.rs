/// Report orchestration: one entry point per response shape.
///
/// `build_daily_report` runs the full pipeline for a place name: both
/// upstream fetches in parallel, the advice retry ladder, view projection,
/// backfill, signal derivation and reliability classification. It never
/// fails; every upstream problem degrades into substitute content that the
/// reliability record discloses. `build_air_snapshot` is the cheaper
/// air-only variant for refresh polling.
///
/// The advice retry ladder caps at two extra requests per report:
/// one when the air fetch resolved to a different station than requested,
/// and one when the advice payload itself echoes the unknown-station
/// signature. Both retries target the resolved station.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, error, warn};

use crate::decision::reliability::build_reliability_meta_at;
use crate::decision::seoul_hour_now;
use crate::decision::signals::derive_decision_signals_at;
use crate::ingest::advice::{AdviceApi, unavailable_guide};
use crate::ingest::air::{AirQualityApi, fetch_air_with_station_fallback};
use crate::model::{AiGuideView, AirQualityView, AirSnapshot, DailyReport, ProfileInput};
use crate::sentinel::is_unknown_station_signature;
use crate::stations::StationHints;
use crate::view::to_air_quality_view;

#[derive(Debug)]
enum AdviceRetryStage {
    Initial,
    StationRetried,
    SentinelRetried,
}

/// Copies pollutant values the advice upstream echoed into air-view slots
/// the air upstream left empty. A present reading is kept even when it is
/// zero.
fn backfill_pollutants_from_guide(air: &mut AirQualityView, guide: &AiGuideView) {
    if air.pm25_value.is_none() {
        air.pm25_value = guide.pm25_value;
    }
    if air.o3_value.is_none() {
        air.o3_value = guide.o3_value;
    }
    if air.pm10_value.is_none() {
        air.pm10_value = guide.pm10_value;
    }
    if air.no2_value.is_none() {
        air.no2_value = guide.no2_value;
    }
}

/// Builds the full report with an explicit Seoul hour and clock value.
pub async fn build_daily_report_at(
    air_api: &dyn AirQualityApi,
    advice_api: &dyn AdviceApi,
    hints: &StationHints,
    station_name: &str,
    profile: &ProfileInput,
    seoul_hour: u32,
    now: DateTime<Utc>,
) -> DailyReport {
    let (fetch, mut advice) = tokio::join!(
        fetch_air_with_station_fallback(air_api, station_name, hints),
        advice_api.fetch_guide(station_name, profile),
    );

    let mut stage = AdviceRetryStage::Initial;

    if fetch.resolved_station != station_name {
        stage = AdviceRetryStage::StationRetried;
        debug!(
            "requested station \"{station_name}\" resolved to \"{}\", refetching advice",
            fetch.resolved_station
        );
        match advice_api.fetch_guide(&fetch.resolved_station, profile).await {
            Ok(guide) => advice = Ok(guide),
            Err(err) => {
                warn!("advice retry against \"{}\" failed: {err}", fetch.resolved_station);
            }
        }
    }

    if advice.as_ref().is_ok_and(|guide| is_unknown_station_signature(guide)) {
        stage = AdviceRetryStage::SentinelRetried;
        warn!(
            "advice payload echoes the unknown-station signature, retrying against \"{}\"",
            fetch.resolved_station
        );
        match advice_api.fetch_guide(&fetch.resolved_station, profile).await {
            Ok(guide) if !is_unknown_station_signature(&guide) => advice = Ok(guide),
            Ok(_) => warn!("advice retry still echoes the unknown-station signature, keeping it"),
            Err(err) => warn!("advice signature retry failed: {err}"),
        }
    }

    debug!("advice ladder finished at stage {stage:?}");

    let ai_ok = advice.is_ok();
    let guide = match advice {
        Ok(guide) => guide,
        Err(err) => {
            error!("advice unavailable: {err}");
            unavailable_guide()
        }
    };

    let mut air_view = to_air_quality_view(fetch.data.as_ref(), &fetch.resolved_station);
    backfill_pollutants_from_guide(&mut air_view, &guide);

    let outcome = derive_decision_signals_at(air_view, guide, profile, seoul_hour);
    let reliability = build_reliability_meta_at(station_name, &fetch, ai_ok, now);

    DailyReport {
        air_quality: outcome.air,
        ai_guide: outcome.guide,
        decision_signals: outcome.signals,
        reliability,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Builds the full report against the system clock.
pub async fn build_daily_report(
    air_api: &dyn AirQualityApi,
    advice_api: &dyn AdviceApi,
    hints: &StationHints,
    station_name: &str,
    profile: &ProfileInput,
) -> DailyReport {
    build_daily_report_at(
        air_api,
        advice_api,
        hints,
        station_name,
        profile,
        seoul_hour_now(),
        Utc::now(),
    )
    .await
}

/// Air-only refresh at an explicit clock value. No advice request is made
/// on this path, so the advice channel reports ok.
pub async fn build_air_snapshot_at(
    air_api: &dyn AirQualityApi,
    hints: &StationHints,
    station_name: &str,
    now: DateTime<Utc>,
) -> AirSnapshot {
    let fetch = fetch_air_with_station_fallback(air_api, station_name, hints).await;
    let air_quality = to_air_quality_view(fetch.data.as_ref(), &fetch.resolved_station);
    let reliability = build_reliability_meta_at(station_name, &fetch, true, now);

    AirSnapshot {
        air_quality,
        reliability,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Air-only refresh against the system clock.
pub async fn build_air_snapshot(
    air_api: &dyn AirQualityApi,
    hints: &StationHints,
    station_name: &str,
) -> AirSnapshot {
    build_air_snapshot_at(air_api, hints, station_name, Utc::now()).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
