/// AI advice upstream client and payload normalization.
///
/// The advice service takes a station and a user profile and returns a
/// decision payload in its own mixed-convention schema. Normalization maps
/// it onto [`AiGuideView`] and swaps two canned guides in for the two
/// failure shapes: a transport-level failure (no usable response) and a
/// business-level error the upstream reports inside an HTTP 200.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ingest::join_url;
use crate::model::{AiGuideView, ProfileInput, UpstreamError};

pub const SUMMARY_PLACEHOLDER: &str = "오늘의 가이드를 준비 중이에요.";
pub const DETAIL_PLACEHOLDER: &str = "잠시 후 다시 확인해 주세요.";
const DEFAULT_MASK_RECOMMENDATION: &str = "KF80 권장";

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

/// Advice payload exactly as the upstream sends it. Field naming is the
/// upstream's own mix of snake_case and camelCase.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdvicePayload {
    pub decision: Option<String>,
    pub reason: Option<String>,
    #[serde(default)]
    pub three_reason: Vec<String>,
    pub detail_answer: Option<String>,
    #[serde(rename = "actionItems", default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    pub pm25_value: Option<f64>,
    pub o3_value: Option<f64>,
    pub pm10_value: Option<f64>,
    pub no2_value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct AdviceRequest<'a> {
    #[serde(rename = "stationName")]
    station_name: &'a str,
    #[serde(rename = "userProfile")]
    user_profile: AdviceUserProfile<'a>,
}

#[derive(Debug, Serialize)]
struct AdviceUserProfile<'a> {
    #[serde(rename = "ageGroup")]
    age_group: &'a str,
    condition: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AdviceApi: Send + Sync {
    async fn fetch_guide(
        &self,
        station: &str,
        profile: &ProfileInput,
    ) -> Result<AiGuideView, UpstreamError>;
}

pub struct HttpAdviceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAdviceApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> HttpAdviceApi {
        HttpAdviceApi { client, base_url: base_url.into() }
    }
}

#[async_trait]
impl AdviceApi for HttpAdviceApi {
    async fn fetch_guide(
        &self,
        station: &str,
        profile: &ProfileInput,
    ) -> Result<AiGuideView, UpstreamError> {
        let request = AdviceRequest {
            station_name: station,
            user_profile: AdviceUserProfile {
                age_group: profile.age_group.as_str(),
                condition: profile.condition.as_advice_str(),
            },
        };

        let response = self
            .client
            .post(join_url(&self.base_url, "/api/advice"))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Http(response.status().as_u16()));
        }

        let raw = response.json::<RawAdvicePayload>().await?;
        Ok(map_advice_payload(raw))
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

// The upstream wraps its own backend failures in an HTTP 200 with either a
// literal "Error" decision or a provider error string in the reason.
fn is_business_error(raw: &RawAdvicePayload) -> bool {
    raw.decision.as_deref() == Some("Error")
        || raw.reason.as_deref().is_some_and(|reason| reason.contains("Error code:"))
}

/// Maps a raw payload onto the guide view. Business errors become the
/// maintenance guide; otherwise the decision doubles as summary and
/// activity recommendation, missing headline text gets placeholders, and
/// the mask recommendation defaults to the KF80 baseline.
pub fn map_advice_payload(raw: RawAdvicePayload) -> AiGuideView {
    if is_business_error(&raw) {
        warn!("advice upstream reported a business error: {:?}", raw.reason);
        return maintenance_guide();
    }

    let decision = raw.decision.filter(|text| !text.is_empty());
    AiGuideView {
        summary: decision.clone().unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string()),
        detail: raw
            .reason
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DETAIL_PLACEHOLDER.to_string()),
        three_reason: raw.three_reason,
        detail_answer: raw.detail_answer,
        action_items: raw.action_items,
        activity_recommendation: decision,
        mask_recommendation: Some(DEFAULT_MASK_RECOMMENDATION.to_string()),
        references: raw.references,
        pm25_value: raw.pm25_value,
        o3_value: raw.o3_value,
        pm10_value: raw.pm10_value,
        no2_value: raw.no2_value,
    }
}

/// Guide shown when the upstream answered but reported its own backend
/// misconfiguration.
pub fn maintenance_guide() -> AiGuideView {
    AiGuideView {
        summary: "AI 서버 설정 오류가 발생했어요 😅".to_string(),
        detail: "백엔드 OpenAI 모델 설정(Temperature)을 확인해주세요.".to_string(),
        mask_recommendation: Some("확인 필요".to_string()),
        activity_recommendation: Some("확인 필요".to_string()),
        ..AiGuideView::default()
    }
}

/// Guide shown when no usable advice response arrived at all.
pub fn unavailable_guide() -> AiGuideView {
    AiGuideView {
        summary: "지금은 정보를 가져올 수 없어요 🥲\n잠시 후 다시 시도해주세요!".to_string(),
        detail: "AI 선생님이 잠시 쉬고 있어요. 연결을 확인해주세요.".to_string(),
        ..AiGuideView::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
