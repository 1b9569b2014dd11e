/// Risk adjustment and policy overrides for the daily report.
///
/// Takes the normalized air view and AI guide and derives the decision
/// signals: pollutant grades, a weather- and profile-adjusted risk grade
/// and the override flags. Overrides also edit the guide itself, in a fixed
/// order (ozone guard, infant mask ban, weather reason, ozone-window
/// summary), so safety rules beat whatever the AI produced. Reasons and
/// action items are appended, never removed; only the summary and the mask
/// recommendation may be replaced outright.

use crate::decision::grades::{clamp_grade, o3_grade_from_value, pm25_grade_from_value};
use crate::decision::seoul_hour_now;
use crate::model::{
    AgeGroup, AiGuideView, AirQualityView, Condition, DecisionSignals, Grade, ProfileInput,
};

// Korean copy appended or substituted by the override rules. The frontend
// renders these verbatim.
const OZONE_OUTING_BAN_ACTION: &str = "오후 2~5시 외출 금지";
const OZONE_MASK_NOTE: &str = "오존은 가스성 오염물질이라 마스크로 충분히 걸러지지 않아요.";
const OZONE_REASON: &str = "오존 농도가 높아 실외 활동 제한이 필요해요.";
const OZONE_WINDOW_SUMMARY: &str = "오후 2~5시는 실내 활동이 더 안전해요";
const INFANT_MASK_BAN: &str = "마스크 착용 금지(영아)";
const INFANT_ACTION: &str = "영아는 마스크 대신 실내 공기질 관리에 집중";
const INFANT_REASON: &str = "영아는 마스크 착용 시 질식 위험이 있어요.";

const REASON_YOUNG_LOW_HUMIDITY: &str = "영유아 + 저습도(35% 미만)로 위험도를 1단계 상향했어요.";
const REASON_ELEMENTARY_EXTREME_TEMP: &str =
    "초등 저학년 + 극단 기온으로 위험도를 1단계 상향했어요.";
const REASON_ASTHMA_COLD: &str = "천식 + 저온(5°C 미만)으로 위험도를 1단계 상향했어요.";
const REASON_RHINITIS_DRY: &str = "비염 + 건조(30% 미만)로 위험도를 1단계 상향했어요.";
const REASON_ATOPY_HOT: &str = "아토피 + 고온(30°C 초과)로 위험도를 1단계 상향했어요.";

// Seoul-local afternoon hours [14, 17) when ground-level ozone peaks.
const OZONE_WINDOW_START_HOUR: u32 = 14;
const OZONE_WINDOW_END_HOUR: u32 = 17;

// ---------------------------------------------------------------------------
// Weather adjustment
// ---------------------------------------------------------------------------

pub struct WeatherAdjustment {
    pub adjusted: u8,
    pub reason: Option<&'static str>,
}

/// Raises the base risk grade for weather that hits the given profile
/// harder. Two independent rule chains, one keyed on age and one on
/// condition, each add at most one step; when both fire, the condition
/// reason replaces the age reason in the report. The result is clamped to
/// the 1..=4 scale.
pub fn apply_weather_adjustment(
    base_risk: u8,
    profile: &ProfileInput,
    temp: f64,
    humidity: f64,
) -> WeatherAdjustment {
    let mut adjusted = base_risk;
    let mut reason = None;

    match profile.age_group {
        AgeGroup::Infant | AgeGroup::Toddler if humidity < 35.0 => {
            adjusted += 1;
            reason = Some(REASON_YOUNG_LOW_HUMIDITY);
        }
        AgeGroup::ElementaryLow if temp >= 30.0 || temp <= 2.0 => {
            adjusted += 1;
            reason = Some(REASON_ELEMENTARY_EXTREME_TEMP);
        }
        _ => {}
    }

    match profile.condition {
        Condition::Asthma if temp < 5.0 => {
            adjusted += 1;
            reason = Some(REASON_ASTHMA_COLD);
        }
        Condition::Rhinitis if humidity < 30.0 => {
            adjusted += 1;
            reason = Some(REASON_RHINITIS_DRY);
        }
        Condition::Atopy if temp > 30.0 => {
            adjusted += 1;
            reason = Some(REASON_ATOPY_HOT);
        }
        _ => {}
    }

    WeatherAdjustment { adjusted: clamp_grade(adjusted), reason }
}

// ---------------------------------------------------------------------------
// Signal derivation
// ---------------------------------------------------------------------------

fn append_unique(items: &mut Vec<String>, next: &str) {
    if items.iter().any(|item| item == next) {
        return;
    }
    items.push(next.to_string());
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The adjusted views plus the signal record explaining them.
pub struct DecisionOutcome {
    pub air: AirQualityView,
    pub guide: AiGuideView,
    pub signals: DecisionSignals,
}

/// Derives decision signals with an explicit Seoul hour. The hour only
/// gates the ozone-window summary replacement; everything else is a pure
/// function of the inputs.
pub fn derive_decision_signals_at(
    mut air: AirQualityView,
    mut guide: AiGuideView,
    profile: &ProfileInput,
    seoul_hour: u32,
) -> DecisionOutcome {
    let pm25_grade = pm25_grade_from_value(air.pm25_value);
    let o3_grade = o3_grade_from_value(air.o3_value);
    let base_risk = pm25_grade.max(o3_grade);
    let weather = apply_weather_adjustment(base_risk, profile, air.temperature, air.humidity);

    let mut final_numeric_grade = weather.adjusted;

    // Bad particulates and bad ozone at the same time outrank any
    // single-pollutant grade.
    if pm25_grade >= 3 && o3_grade >= 3 {
        final_numeric_grade = 4;
    }

    let final_grade = Grade::from_numeric(final_numeric_grade);
    let o3_is_high = o3_grade >= 3;
    let o3_is_dominant_risk = o3_is_high && o3_grade >= pm25_grade;
    let in_o3_risk_window =
        seoul_hour >= OZONE_WINDOW_START_HOUR && seoul_hour < OZONE_WINDOW_END_HOUR;

    if o3_is_high {
        append_unique(&mut guide.action_items, OZONE_OUTING_BAN_ACTION);
        // Masks do not help against ozone; make sure the answer says so
        // even when the AI's answer did not.
        let base = guide
            .detail_answer
            .take()
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| guide.detail.clone());
        guide.detail_answer = Some(join_nonempty(&[&base, OZONE_MASK_NOTE]));
        append_unique(&mut guide.three_reason, OZONE_REASON);
    }

    let infant_mask_ban = profile.age_group == AgeGroup::Infant;
    if infant_mask_ban {
        guide.mask_recommendation = Some(INFANT_MASK_BAN.to_string());
        append_unique(&mut guide.action_items, INFANT_ACTION);
        append_unique(&mut guide.three_reason, INFANT_REASON);
    }

    if let Some(reason) = weather.reason {
        append_unique(&mut guide.three_reason, reason);
    }

    if o3_is_dominant_risk && in_o3_risk_window {
        guide.summary = OZONE_WINDOW_SUMMARY.to_string();
    }

    air.grade = final_grade;

    DecisionOutcome {
        air,
        guide,
        signals: DecisionSignals {
            pm25_grade,
            o3_grade,
            adjusted_risk_grade: final_numeric_grade,
            final_grade,
            o3_is_dominant_risk,
            o3_outing_ban_forced: o3_is_high,
            infant_mask_ban_applied: infant_mask_ban,
            weather_adjusted: weather.reason.is_some(),
            weather_adjustment_reason: weather.reason.map(|reason| reason.to_string()),
        },
    }
}

/// Like [`derive_decision_signals_at`] with the current Seoul hour.
pub fn derive_decision_signals(
    air: AirQualityView,
    guide: AiGuideView,
    profile: &ProfileInput,
) -> DecisionOutcome {
    derive_decision_signals_at(air, guide, profile, seoul_hour_now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawAirReading;
    use crate::view::to_air_quality_view;

    fn view_with(pm25: Option<f64>, o3: Option<f64>, temp: f64, humidity: f64) -> AirQualityView {
        let raw = RawAirReading {
            station_name: Some("정자동".to_string()),
            pm25_value: pm25,
            o3_value: o3,
            temp: Some(temp),
            humidity: Some(humidity),
            ..RawAirReading::default()
        };
        to_air_quality_view(Some(&raw), "정자동")
    }

    fn guide_with_detail(detail: &str) -> AiGuideView {
        AiGuideView {
            summary: "실외 활동 가능".to_string(),
            detail: detail.to_string(),
            ..AiGuideView::default()
        }
    }

    const MORNING_HOUR: u32 = 10;
    const AFTERNOON_HOUR: u32 = 15;

    #[test]
    fn test_clean_air_leaves_guide_untouched() {
        let air = view_with(Some(10.0), Some(0.02), 22.0, 45.0);
        let guide = guide_with_detail("공기가 깨끗해요.");
        let outcome =
            derive_decision_signals_at(air, guide.clone(), &ProfileInput::default(), MORNING_HOUR);

        assert_eq!(outcome.signals.pm25_grade, 1);
        assert_eq!(outcome.signals.o3_grade, 1);
        assert_eq!(outcome.signals.final_grade, Grade::Good);
        assert_eq!(outcome.air.grade, Grade::Good);
        assert!(!outcome.signals.o3_outing_ban_forced);
        assert!(!outcome.signals.weather_adjusted);
        assert_eq!(outcome.guide, guide, "no override rule should have fired");
    }

    #[test]
    fn test_missing_values_grade_as_normal() {
        let air = view_with(None, None, 22.0, 45.0);
        let outcome = derive_decision_signals_at(
            air,
            AiGuideView::default(),
            &ProfileInput::default(),
            MORNING_HOUR,
        );
        assert_eq!(outcome.signals.pm25_grade, 2);
        assert_eq!(outcome.signals.o3_grade, 2);
        assert_eq!(outcome.signals.final_grade, Grade::Normal);
    }

    #[test]
    fn test_high_ozone_forces_ban_note_and_reason() {
        let air = view_with(Some(10.0), Some(0.12), 22.0, 45.0);
        let outcome = derive_decision_signals_at(
            air,
            guide_with_detail("오늘은 오존이 높아요."),
            &ProfileInput::default(),
            MORNING_HOUR,
        );

        assert!(outcome.signals.o3_outing_ban_forced);
        assert!(outcome.signals.o3_is_dominant_risk);
        assert!(outcome.guide.action_items.contains(&"오후 2~5시 외출 금지".to_string()));
        assert_eq!(
            outcome.guide.detail_answer.as_deref(),
            Some("오늘은 오존이 높아요. 오존은 가스성 오염물질이라 마스크로 충분히 걸러지지 않아요.")
        );
        assert!(
            outcome
                .guide
                .three_reason
                .contains(&"오존 농도가 높아 실외 활동 제한이 필요해요.".to_string())
        );
        // Morning request: the afternoon-window summary stays as the AI wrote it.
        assert_eq!(outcome.guide.summary, "실외 활동 가능");
    }

    #[test]
    fn test_ozone_summary_replacement_honors_window_bounds() {
        for (hour, replaced) in [(13, false), (14, true), (16, true), (17, false)] {
            let air = view_with(Some(10.0), Some(0.12), 22.0, 45.0);
            let outcome = derive_decision_signals_at(
                air,
                guide_with_detail("상세"),
                &ProfileInput::default(),
                hour,
            );
            assert_eq!(
                outcome.guide.summary == "오후 2~5시는 실내 활동이 더 안전해요",
                replaced,
                "hour {hour} should {}replace the summary",
                if replaced { "" } else { "not " }
            );
        }
    }

    #[test]
    fn test_existing_detail_answer_is_extended_not_replaced() {
        let air = view_with(Some(10.0), Some(0.12), 22.0, 45.0);
        let guide = AiGuideView {
            detail: "상세".to_string(),
            detail_answer: Some("이미 있는 답변".to_string()),
            ..AiGuideView::default()
        };
        let outcome =
            derive_decision_signals_at(air, guide, &ProfileInput::default(), MORNING_HOUR);
        assert_eq!(
            outcome.guide.detail_answer.as_deref(),
            Some("이미 있는 답변 오존은 가스성 오염물질이라 마스크로 충분히 걸러지지 않아요.")
        );
    }

    #[test]
    fn test_empty_detail_and_answer_leave_only_the_note() {
        let air = view_with(Some(10.0), Some(0.12), 22.0, 45.0);
        let outcome = derive_decision_signals_at(
            air,
            AiGuideView::default(),
            &ProfileInput::default(),
            MORNING_HOUR,
        );
        assert_eq!(
            outcome.guide.detail_answer.as_deref(),
            Some("오존은 가스성 오염물질이라 마스크로 충분히 걸러지지 않아요.")
        );
    }

    #[test]
    fn test_duplicate_action_item_is_not_appended_twice() {
        let air = view_with(Some(10.0), Some(0.12), 22.0, 45.0);
        let guide = AiGuideView {
            action_items: vec!["오후 2~5시 외출 금지".to_string()],
            ..AiGuideView::default()
        };
        let outcome =
            derive_decision_signals_at(air, guide, &ProfileInput::default(), MORNING_HOUR);
        let bans = outcome
            .guide
            .action_items
            .iter()
            .filter(|item| *item == "오후 2~5시 외출 금지")
            .count();
        assert_eq!(bans, 1);
    }

    #[test]
    fn test_both_pollutants_bad_escalates_to_very_bad() {
        // PM2.5 grade 4, ozone grade 3: the combined rule pins the final
        // grade at 4, ozone is high but not dominant, so the afternoon
        // summary replacement must not fire even in the window.
        let air = view_with(Some(80.0), Some(0.12), 22.0, 45.0);
        let outcome = derive_decision_signals_at(
            air,
            guide_with_detail("상세"),
            &ProfileInput::default(),
            AFTERNOON_HOUR,
        );

        assert_eq!(outcome.signals.pm25_grade, 4);
        assert_eq!(outcome.signals.o3_grade, 3);
        assert_eq!(outcome.signals.adjusted_risk_grade, 4);
        assert_eq!(outcome.signals.final_grade, Grade::VeryBad);
        assert!(outcome.signals.o3_outing_ban_forced);
        assert!(!outcome.signals.o3_is_dominant_risk);
        assert_eq!(outcome.guide.summary, "실외 활동 가능", "summary must not be replaced");
    }

    #[test]
    fn test_equal_bad_grades_make_ozone_dominant() {
        let air = view_with(Some(40.0), Some(0.1), 22.0, 45.0);
        let outcome = derive_decision_signals_at(
            air,
            guide_with_detail("상세"),
            &ProfileInput::default(),
            AFTERNOON_HOUR,
        );

        assert_eq!(outcome.signals.pm25_grade, 3);
        assert_eq!(outcome.signals.o3_grade, 3);
        assert_eq!(outcome.signals.adjusted_risk_grade, 4);
        assert!(outcome.signals.o3_is_dominant_risk);
        assert_eq!(outcome.guide.summary, "오후 2~5시는 실내 활동이 더 안전해요");
    }

    #[test]
    fn test_infant_low_humidity_raises_risk() {
        let air = view_with(Some(20.0), Some(0.02), 22.0, 30.0);
        let profile = ProfileInput { age_group: AgeGroup::Infant, condition: Condition::None };
        let outcome =
            derive_decision_signals_at(air, AiGuideView::default(), &profile, MORNING_HOUR);

        assert_eq!(outcome.signals.pm25_grade, 2);
        assert_eq!(outcome.signals.adjusted_risk_grade, 3);
        assert!(outcome.signals.weather_adjusted);
        assert_eq!(
            outcome.signals.weather_adjustment_reason.as_deref(),
            Some("영유아 + 저습도(35% 미만)로 위험도를 1단계 상향했어요.")
        );
        assert!(
            outcome
                .guide
                .three_reason
                .contains(&"영유아 + 저습도(35% 미만)로 위험도를 1단계 상향했어요.".to_string())
        );
    }

    #[test]
    fn test_infant_mask_ban_applies_without_weather_trigger() {
        let air = view_with(Some(10.0), Some(0.02), 22.0, 45.0);
        let profile = ProfileInput { age_group: AgeGroup::Infant, condition: Condition::None };
        let outcome =
            derive_decision_signals_at(air, AiGuideView::default(), &profile, MORNING_HOUR);

        assert!(outcome.signals.infant_mask_ban_applied);
        assert!(!outcome.signals.weather_adjusted);
        assert_eq!(outcome.guide.mask_recommendation.as_deref(), Some("마스크 착용 금지(영아)"));
        assert!(
            outcome
                .guide
                .action_items
                .contains(&"영아는 마스크 대신 실내 공기질 관리에 집중".to_string())
        );
        assert!(
            outcome
                .guide
                .three_reason
                .contains(&"영아는 마스크 착용 시 질식 위험이 있어요.".to_string())
        );
    }

    #[test]
    fn test_elementary_low_extreme_temperature_raises_risk() {
        for temp in [31.0, 2.0] {
            let air = view_with(Some(20.0), Some(0.02), temp, 45.0);
            let outcome = derive_decision_signals_at(
                air,
                AiGuideView::default(),
                &ProfileInput::default(),
                MORNING_HOUR,
            );
            assert_eq!(outcome.signals.adjusted_risk_grade, 3, "temp {temp} should raise risk");
            assert_eq!(
                outcome.signals.weather_adjustment_reason.as_deref(),
                Some("초등 저학년 + 극단 기온으로 위험도를 1단계 상향했어요.")
            );
        }

        // Mild temperature: no adjustment for the default profile.
        let air = view_with(Some(20.0), Some(0.02), 2.1, 45.0);
        let outcome = derive_decision_signals_at(
            air,
            AiGuideView::default(),
            &ProfileInput::default(),
            MORNING_HOUR,
        );
        assert!(!outcome.signals.weather_adjusted);
    }

    #[test]
    fn test_condition_rules_use_strict_thresholds() {
        let cases = [
            (Condition::Asthma, 4.9, 45.0, true),
            (Condition::Asthma, 5.0, 45.0, false),
            (Condition::Rhinitis, 22.0, 29.9, true),
            (Condition::Rhinitis, 22.0, 30.0, false),
            (Condition::Atopy, 30.1, 45.0, true),
            (Condition::Atopy, 30.0, 45.0, false),
        ];
        for (condition, temp, humidity, fires) in cases {
            let air = view_with(Some(20.0), Some(0.02), temp, humidity);
            let profile = ProfileInput { age_group: AgeGroup::TeenAdult, condition };
            let outcome =
                derive_decision_signals_at(air, AiGuideView::default(), &profile, MORNING_HOUR);
            assert_eq!(
                outcome.signals.weather_adjusted, fires,
                "{condition:?} at temp {temp} / humidity {humidity}"
            );
        }
    }

    #[test]
    fn test_age_and_condition_rules_stack_and_condition_reason_wins() {
        // Toddler in dry air (+1) with asthma in the cold (+1): grade climbs
        // two steps and the condition reason is the one reported.
        let air = view_with(Some(20.0), Some(0.02), 2.0, 30.0);
        let profile = ProfileInput { age_group: AgeGroup::Toddler, condition: Condition::Asthma };
        let outcome =
            derive_decision_signals_at(air, AiGuideView::default(), &profile, MORNING_HOUR);

        assert_eq!(outcome.signals.adjusted_risk_grade, 4);
        assert_eq!(
            outcome.signals.weather_adjustment_reason.as_deref(),
            Some("천식 + 저온(5°C 미만)으로 위험도를 1단계 상향했어요.")
        );
        assert_eq!(outcome.guide.three_reason.len(), 1);
    }

    #[test]
    fn test_adjustment_never_leaves_the_scale() {
        let adjustment = apply_weather_adjustment(
            4,
            &ProfileInput { age_group: AgeGroup::Infant, condition: Condition::Asthma },
            2.0,
            20.0,
        );
        assert_eq!(adjustment.adjusted, 4);
        assert!(adjustment.reason.is_some());
    }

    #[test]
    fn test_final_grade_overwrites_view_grade() {
        // The view grades on PM word grades alone; the decision layer must
        // replace it with the adjusted grade.
        let mut raw = RawAirReading {
            station_name: Some("정자동".to_string()),
            pm25_grade: Some("좋음".to_string()),
            pm10_grade: Some("좋음".to_string()),
            pm25_value: Some(80.0),
            temp: Some(22.0),
            humidity: Some(45.0),
            ..RawAirReading::default()
        };
        raw.o3_value = Some(0.02);
        let air = to_air_quality_view(Some(&raw), "정자동");
        assert_eq!(air.grade, Grade::Good);

        let outcome = derive_decision_signals_at(
            air,
            AiGuideView::default(),
            &ProfileInput::default(),
            MORNING_HOUR,
        );
        assert_eq!(outcome.air.grade, Grade::VeryBad);
        assert_eq!(outcome.signals.final_grade, Grade::VeryBad);
    }
}
