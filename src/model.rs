/// Core data types for the air-quality daily report service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no orchestration logic, only types, their serde
/// wire mappings, and small conversions. Field renames mirror the upstream
/// JSON contracts exactly, which mix camelCase metadata fields with
/// snake_case pollutant fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// Four-tier severity grade used for individual pollutants and for the
/// overall decision. Serialized in the upstream's SCREAMING_SNAKE_CASE
/// spelling (`GOOD` / `NORMAL` / `BAD` / `VERY_BAD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    Good,
    Normal,
    Bad,
    VeryBad,
}

impl Grade {
    /// Maps a numeric grade (1-4) to its tier, clamping out-of-range input.
    pub fn from_numeric(grade: u8) -> Grade {
        match grade {
            0 | 1 => Grade::Good,
            2 => Grade::Normal,
            3 => Grade::Bad,
            _ => Grade::VeryBad,
        }
    }

    pub fn as_number(self) -> u8 {
        match self {
            Grade::Good => 1,
            Grade::Normal => 2,
            Grade::Bad => 3,
            Grade::VeryBad => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// Age band of the child the report is for. Wire values are snake_case
/// (`infant`, `toddler`, `elementary_low`, `elementary_high`, `teen_adult`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Infant,
    Toddler,
    #[default]
    ElementaryLow,
    ElementaryHigh,
    TeenAdult,
}

impl AgeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            AgeGroup::Infant => "infant",
            AgeGroup::Toddler => "toddler",
            AgeGroup::ElementaryLow => "elementary_low",
            AgeGroup::ElementaryHigh => "elementary_high",
            AgeGroup::TeenAdult => "teen_adult",
        }
    }
}

/// Reported respiratory/skin condition. `None` is the caller-facing spelling;
/// the advice API spells the no-condition case `general` (see
/// [`Condition::as_advice_str`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    None,
    Rhinitis,
    Asthma,
    Atopy,
}

impl Condition {
    /// Wire value for the advice API request payload.
    pub fn as_advice_str(self) -> &'static str {
        match self {
            Condition::None => "general",
            Condition::Rhinitis => "rhinitis",
            Condition::Asthma => "asthma",
            Condition::Atopy => "atopy",
        }
    }
}

/// Caller-supplied profile. Missing fields default to the most common
/// profile (elementary-low age, no condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(rename = "ageGroup", default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub condition: Condition,
}

// ---------------------------------------------------------------------------
// Raw upstream reading
// ---------------------------------------------------------------------------

/// One raw response from the air-quality upstream, taken as-is. Every field
/// is optional: the upstream omits whatever it does not know, and the grade
/// fields carry Korean words ("좋음" / "보통" / "나쁨" / "매우나쁨") rather
/// than numbers. Temperature arrives under either `temp` or `temperature`
/// depending on the upstream data path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAirReading {
    #[serde(rename = "sidoName")]
    pub sido_name: Option<String>,
    #[serde(rename = "stationName")]
    pub station_name: Option<String>,
    #[serde(rename = "dataTime")]
    pub data_time: Option<String>,
    pub pm25_grade: Option<String>,
    pub pm25_value: Option<f64>,
    pub pm10_grade: Option<String>,
    pub pm10_value: Option<f64>,
    pub o3_grade: Option<String>,
    pub o3_value: Option<f64>,
    pub no2_grade: Option<String>,
    pub no2_value: Option<f64>,
    pub co_grade: Option<String>,
    pub co_value: Option<f64>,
    pub so2_grade: Option<String>,
    pub so2_value: Option<f64>,
    pub temp: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

// ---------------------------------------------------------------------------
// Fetch audit trail
// ---------------------------------------------------------------------------

/// Full audit trail of one station-resolving fetch across candidates.
/// Request-scoped, never persisted; the reliability classifier reads it to
/// label the response.
#[derive(Debug, Clone, PartialEq)]
pub struct AirFetchResult {
    /// First usable reading, or the first response of any kind when every
    /// candidate returned the unknown-station signature. `None` when all
    /// candidates errored out.
    pub data: Option<RawAirReading>,
    /// Station name the data actually belongs to. Falls back to the
    /// requested name on total failure.
    pub resolved_station: String,
    /// Every candidate generated for this request, in try order.
    pub tried_stations: Vec<String>,
    pub used_fallback_candidate: bool,
    pub used_fallback_data: bool,
    /// Candidates that answered with the unknown-station signature.
    pub unknown_signature_candidates: Vec<String>,
}

// ---------------------------------------------------------------------------
// Normalized views
// ---------------------------------------------------------------------------

/// Per-pollutant entry in the view's `detail` block: numeric grade plus the
/// raw measured value (absent when the upstream omitted it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantDetail {
    pub grade: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Value-only entry for gases that carry no word grade in the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirDetail {
    pub pm10: PollutantDetail,
    pub pm25: PollutantDetail,
    pub o3: PollutantValue,
    pub no2: PollutantValue,
}

/// Normalized projection of a raw reading for the caller. `sido_name` and
/// `data_time` serialize as explicit nulls when unknown; pollutant values
/// are dropped from the JSON instead, matching the upstream contract the
/// frontend was built against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityView {
    #[serde(rename = "sidoName")]
    pub sido_name: Option<String>,
    #[serde(rename = "stationName")]
    pub station_name: String,
    #[serde(rename = "dataTime")]
    pub data_time: Option<String>,
    /// Worst of the PM10/PM2.5 word grades at view-build time; overwritten
    /// with the final decision grade during signal derivation.
    pub grade: Grade,
    /// Headline value shown next to the grade (the PM10 reading).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o3_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no2_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so2_value: Option<f64>,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub humidity: f64,
    pub detail: Option<AirDetail>,
}

/// Normalized advice payload. Reasons and action items are append-only
/// during signal derivation; the summary and mask recommendation may be
/// overwritten by policy overrides. The trailing pollutant fields echo the
/// advice upstream's own readings and back-fill gaps in the air view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiGuideView {
    pub summary: String,
    pub detail: String,
    #[serde(rename = "threeReason", default)]
    pub three_reason: Vec<String>,
    #[serde(rename = "detailAnswer", skip_serializing_if = "Option::is_none")]
    pub detail_answer: Option<String>,
    #[serde(rename = "actionItems", default)]
    pub action_items: Vec<String>,
    #[serde(rename = "activityRecommendation", skip_serializing_if = "Option::is_none")]
    pub activity_recommendation: Option<String>,
    #[serde(rename = "maskRecommendation", skip_serializing_if = "Option::is_none")]
    pub mask_recommendation: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o3_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no2_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Decision signals
// ---------------------------------------------------------------------------

/// Signal record emitted alongside the adjusted views so the caller can see
/// which rules fired. Pure function output; immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSignals {
    pub pm25_grade: u8,
    pub o3_grade: u8,
    pub adjusted_risk_grade: u8,
    pub final_grade: Grade,
    pub o3_is_dominant_risk: bool,
    pub o3_outing_ban_forced: bool,
    pub infant_mask_ban_applied: bool,
    pub weather_adjusted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_adjustment_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Reliability
// ---------------------------------------------------------------------------

/// Trust tier of the air data behind one response, from a direct station hit
/// down to a generic substitute reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReliabilityStatus {
    Live,
    StationFallback,
    Degraded,
}

/// Whether the advice upstream produced a guide for this response. Reported
/// orthogonally to the air-data tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityMeta {
    pub status: ReliabilityStatus,
    /// Short Korean label for the tier, shown as a badge.
    pub label: String,
    /// One-sentence Korean explanation of what the tier means.
    pub description: String,
    pub requested_station: String,
    pub resolved_station: String,
    pub tried_stations: Vec<String>,
    /// Classification time (not measurement time), RFC 3339 with
    /// millisecond precision.
    pub updated_at: String,
    pub ai_status: AiStatus,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// The merged per-request result: one air view, one guide, the signal record
/// and the reliability label. Always structurally complete, even on total
/// upstream failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub air_quality: AirQualityView,
    pub ai_guide: AiGuideView,
    pub decision_signals: DecisionSignals,
    pub reliability: ReliabilityMeta,
    pub timestamp: String,
}

/// Air-only refresh result for callers polling for a newer reading without
/// re-requesting advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirSnapshot {
    pub air_quality: AirQualityView,
    pub reliability: ReliabilityMeta,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from either upstream API. These never escape the orchestration
/// layer: fetch failures degrade into fallback candidates or placeholder
/// guides, and the caller always receives a complete response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpstreamError {
    /// The request could not be sent or no response arrived.
    #[error("upstream request failed: {0}")]
    Request(String),
    /// Non-2xx HTTP response.
    #[error("upstream returned HTTP {0}")]
    Http(u16),
    /// The response body could not be deserialized.
    #[error("upstream response could not be parsed: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
