/// Projection of raw upstream readings into the caller-facing air view.
///
/// The raw feed is sparse and uses Korean word grades; the view always has
/// a station name, a four-tier grade and weather values, substituting
/// seasonal-average weather when the upstream omits it.

use crate::model::{
    AirDetail, AirQualityView, Grade, PollutantDetail, PollutantValue, RawAirReading,
};

/// Weather substitutes used when a reading carries no temperature or
/// humidity. Chosen as mild indoor-ish values so downstream weather rules
/// stay quiet rather than firing on made-up extremes.
pub const FALLBACK_TEMP: f64 = 22.0;
pub const FALLBACK_HUMIDITY: f64 = 45.0;

/// Maps an upstream word grade to its numeric tier. Unknown or missing
/// words read as "보통" (2) so a partial reading still renders.
fn grade_word_to_number(word: Option<&str>) -> u8 {
    match word {
        Some("좋음") => 1,
        Some("보통") => 2,
        Some("나쁨") => 3,
        Some("매우나쁨") => 4,
        _ => 2,
    }
}

/// Builds the view for one reading. With no reading at all the view is a
/// neutral placeholder: NORMAL grade, fallback weather, no measurements and
/// a null detail block, labeled with `fallback_station` so the caller still
/// sees which station the substitute stands in for.
pub fn to_air_quality_view(raw: Option<&RawAirReading>, fallback_station: &str) -> AirQualityView {
    let Some(raw) = raw else {
        return AirQualityView {
            sido_name: None,
            station_name: fallback_station.to_string(),
            data_time: None,
            grade: Grade::Normal,
            value: None,
            pm25_value: None,
            pm10_value: None,
            o3_value: None,
            no2_value: None,
            co_value: None,
            so2_value: None,
            temperature: FALLBACK_TEMP,
            humidity: FALLBACK_HUMIDITY,
            detail: None,
        };
    };

    let pm10_grade = grade_word_to_number(raw.pm10_grade.as_deref());
    let pm25_grade = grade_word_to_number(raw.pm25_grade.as_deref());
    let worst_grade = pm10_grade.max(pm25_grade);

    AirQualityView {
        sido_name: raw.sido_name.clone(),
        station_name: raw
            .station_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_station.to_string()),
        data_time: raw.data_time.clone(),
        grade: Grade::from_numeric(worst_grade),
        // The headline value tracks PM10, the pollutant the public grade
        // scale was defined for.
        value: raw.pm10_value,
        pm25_value: raw.pm25_value,
        pm10_value: raw.pm10_value,
        o3_value: raw.o3_value,
        no2_value: raw.no2_value,
        co_value: raw.co_value,
        so2_value: raw.so2_value,
        temperature: raw.temp.or(raw.temperature).unwrap_or(FALLBACK_TEMP),
        humidity: raw.humidity.unwrap_or(FALLBACK_HUMIDITY),
        detail: Some(AirDetail {
            pm10: PollutantDetail { grade: pm10_grade, value: raw.pm10_value },
            pm25: PollutantDetail { grade: pm25_grade, value: raw.pm25_value },
            o3: PollutantValue { value: raw.o3_value },
            no2: PollutantValue { value: raw.no2_value },
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
