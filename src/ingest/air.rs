/// Air-quality upstream client and the station-fallback fetch.
///
/// The upstream answers for exact station names only, and answers with a
/// fixed placeholder reading (see `sentinel`) instead of an error when the
/// name is unknown. The fallback fetch walks the candidate list for a
/// request until it finds a genuine reading, remembering the first response
/// of any kind so total misses can still show the caller something.

use async_trait::async_trait;
use tracing::warn;

use crate::ingest::join_url;
use crate::model::{AirFetchResult, RawAirReading, UpstreamError};
use crate::sentinel::is_unknown_station_signature;
use crate::stations::{StationHints, build_station_candidates};

#[async_trait]
pub trait AirQualityApi: Send + Sync {
    async fn fetch_reading(&self, station: &str) -> Result<RawAirReading, UpstreamError>;
}

pub struct HttpAirQualityApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAirQualityApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> HttpAirQualityApi {
        HttpAirQualityApi { client, base_url: base_url.into() }
    }
}

#[async_trait]
impl AirQualityApi for HttpAirQualityApi {
    async fn fetch_reading(&self, station: &str) -> Result<RawAirReading, UpstreamError> {
        let response = self
            .client
            .get(join_url(&self.base_url, "/api/air-quality"))
            .query(&[("stationName", station)])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Http(response.status().as_u16()));
        }

        Ok(response.json::<RawAirReading>().await?)
    }
}

/// Tries every candidate for `station_name` in order and returns the first
/// genuine reading. Failed candidates are logged and skipped; placeholder
/// readings are recorded and skipped. When no candidate yields a genuine
/// reading, the first response of any kind (usually a placeholder) is
/// returned with `used_fallback_data` set, and with no response at all the
/// result is empty but still carries the audit trail.
///
/// `resolved_station` trusts the station name echoed by the upstream over
/// the candidate we asked for; a response attributed to a different station
/// counts as a fallback even when the first candidate produced it.
pub async fn fetch_air_with_station_fallback(
    api: &dyn AirQualityApi,
    station_name: &str,
    hints: &StationHints,
) -> AirFetchResult {
    let candidates = build_station_candidates(station_name, hints);
    let first_candidate = candidates.first().cloned().unwrap_or_default();
    let mut fallback: Option<(RawAirReading, String)> = None;
    let mut unknown_signature_candidates: Vec<String> = Vec::new();

    for candidate in &candidates {
        let parsed = match api.fetch_reading(candidate).await {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("air fetch failed for candidate \"{candidate}\": {err}");
                continue;
            }
        };

        let resolved_station = parsed
            .station_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| candidate.clone());

        if fallback.is_none() {
            fallback = Some((parsed.clone(), resolved_station.clone()));
        }

        if is_unknown_station_signature(&parsed) {
            warn!("unknown-station signature for candidate \"{candidate}\", trying next");
            unknown_signature_candidates.push(candidate.clone());
            continue;
        }

        let used_fallback_candidate =
            *candidate != first_candidate || resolved_station != first_candidate;
        return AirFetchResult {
            data: Some(parsed),
            resolved_station,
            tried_stations: candidates.clone(),
            used_fallback_candidate,
            used_fallback_data: false,
            unknown_signature_candidates,
        };
    }

    let (data, resolved_station) = match fallback {
        Some((data, resolved)) => (Some(data), resolved),
        None => (None, station_name.to_string()),
    };
    let used_fallback_data = data.is_some();
    let used_fallback_candidate = used_fallback_data && resolved_station != first_candidate;

    AirFetchResult {
        data,
        resolved_station,
        tried_stations: candidates,
        used_fallback_candidate,
        used_fallback_data,
        unknown_signature_candidates,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed station-to-response table and records every
    /// request. Stations outside the table answer HTTP 404.
    struct ScriptedAirApi {
        responses: HashMap<String, Result<RawAirReading, UpstreamError>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedAirApi {
        fn new(
            entries: impl IntoIterator<Item = (&'static str, Result<RawAirReading, UpstreamError>)>,
        ) -> ScriptedAirApi {
            ScriptedAirApi {
                responses: entries
                    .into_iter()
                    .map(|(station, response)| (station.to_string(), response))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AirQualityApi for ScriptedAirApi {
        async fn fetch_reading(&self, station: &str) -> Result<RawAirReading, UpstreamError> {
            self.calls.lock().unwrap().push(station.to_string());
            self.responses
                .get(station)
                .cloned()
                .unwrap_or(Err(UpstreamError::Http(404)))
        }
    }

    fn genuine_reading(station: &str) -> RawAirReading {
        RawAirReading {
            station_name: Some(station.to_string()),
            pm25_value: Some(12.0),
            pm10_value: Some(30.0),
            o3_value: Some(0.02),
            no2_value: Some(0.01),
            ..RawAirReading::default()
        }
    }

    fn sentinel_reading() -> RawAirReading {
        RawAirReading {
            pm25_value: Some(65.0),
            pm10_value: Some(85.0),
            o3_value: Some(0.065),
            no2_value: Some(0.025),
            ..RawAirReading::default()
        }
    }

    #[tokio::test]
    async fn test_first_candidate_hit_is_not_a_fallback() {
        let api = ScriptedAirApi::new([("분당구", Ok(genuine_reading("분당구")))]);
        let result =
            fetch_air_with_station_fallback(&api, "분당구", &StationHints::builtin()).await;

        assert_eq!(result.resolved_station, "분당구");
        assert!(result.data.is_some());
        assert!(!result.used_fallback_candidate);
        assert!(!result.used_fallback_data);
        assert!(result.unknown_signature_candidates.is_empty());
        assert_eq!(api.calls(), vec!["분당구"]);
        assert_eq!(result.tried_stations, vec!["분당구", "정자동", "수내동", "운중동"]);
    }

    #[tokio::test]
    async fn test_upstream_echoing_other_station_counts_as_fallback() {
        // The first candidate answers, but attributes the reading to a
        // different station.
        let api = ScriptedAirApi::new([("분당구", Ok(genuine_reading("수내동")))]);
        let result =
            fetch_air_with_station_fallback(&api, "분당구", &StationHints::builtin()).await;

        assert_eq!(result.resolved_station, "수내동");
        assert!(result.used_fallback_candidate);
        assert!(!result.used_fallback_data);
    }

    #[tokio::test]
    async fn test_sentinel_candidates_are_skipped_and_recorded() {
        let api = ScriptedAirApi::new([
            ("분당구", Ok(sentinel_reading())),
            ("정자동", Ok(genuine_reading("정자동"))),
        ]);
        let result =
            fetch_air_with_station_fallback(&api, "분당구", &StationHints::builtin()).await;

        assert_eq!(result.unknown_signature_candidates, vec!["분당구"]);
        assert_eq!(result.resolved_station, "정자동");
        assert!(result.used_fallback_candidate);
        assert!(!result.used_fallback_data, "a genuine reading was found");
        assert_eq!(api.calls(), vec!["분당구", "정자동"]);
    }

    #[tokio::test]
    async fn test_errors_are_skipped_until_a_candidate_answers() {
        let api = ScriptedAirApi::new([
            ("분당구", Err(UpstreamError::Http(500))),
            ("정자동", Err(UpstreamError::Request("timeout".to_string()))),
            ("수내동", Ok(genuine_reading("수내동"))),
        ]);
        let result =
            fetch_air_with_station_fallback(&api, "분당구", &StationHints::builtin()).await;

        assert_eq!(result.resolved_station, "수내동");
        assert!(result.used_fallback_candidate);
        assert!(result.unknown_signature_candidates.is_empty());
        assert_eq!(api.calls(), vec!["분당구", "정자동", "수내동"]);
    }

    #[tokio::test]
    async fn test_every_candidate_sentinel_returns_first_response_as_substitute() {
        let api = ScriptedAirApi::new([
            ("분당구", Ok(sentinel_reading())),
            ("정자동", Ok(sentinel_reading())),
            ("수내동", Ok(sentinel_reading())),
            ("운중동", Ok(sentinel_reading())),
        ]);
        let result =
            fetch_air_with_station_fallback(&api, "분당구", &StationHints::builtin()).await;

        assert!(result.data.is_some(), "the substitute reading is still returned");
        assert!(result.used_fallback_data);
        // The sentinel carries no station name, so the reading stays
        // attributed to the first candidate.
        assert_eq!(result.resolved_station, "분당구");
        assert!(!result.used_fallback_candidate);
        assert_eq!(
            result.unknown_signature_candidates,
            vec!["분당구", "정자동", "수내동", "운중동"]
        );
    }

    #[tokio::test]
    async fn test_every_candidate_failing_returns_empty_result() {
        let api = ScriptedAirApi::new([]);
        let result =
            fetch_air_with_station_fallback(&api, "분당구", &StationHints::builtin()).await;

        assert!(result.data.is_none());
        assert_eq!(result.resolved_station, "분당구", "falls back to the requested name");
        assert!(!result.used_fallback_candidate);
        assert!(!result.used_fallback_data);
        assert_eq!(result.tried_stations.len(), 4, "all candidates were tried");
    }

    #[tokio::test]
    async fn test_empty_station_name_makes_no_requests() {
        let api = ScriptedAirApi::new([]);
        let result = fetch_air_with_station_fallback(&api, "  ", &StationHints::builtin()).await;

        assert!(api.calls().is_empty());
        assert!(result.data.is_none());
        assert_eq!(result.resolved_station, "  ", "raw input is echoed back");
        assert!(result.tried_stations.is_empty());
    }
}
