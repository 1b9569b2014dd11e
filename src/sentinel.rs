/// Detection of the upstream's unknown-station signature.
///
/// When the air-quality upstream is asked about a station it does not know,
/// it answers HTTP 200 with a fixed synthetic reading instead of an error.
/// That reading is identified by an exact quadruple of pollutant values and
/// must be treated as "no data for this station", not as a measurement.

use crate::model::{AiGuideView, RawAirReading};

// The synthetic reading's exact values.
pub const SIGNATURE_PM25: f64 = 65.0;
pub const SIGNATURE_PM10: f64 = 85.0;
pub const SIGNATURE_O3: f64 = 0.065;
pub const SIGNATURE_NO2: f64 = 0.025;

/// Gas values pass through float formatting upstream, so they are compared
/// within this tolerance. Particulate values are integers and compare exactly.
pub const SIGNATURE_EPSILON: f64 = 0.000_001;

/// Any payload that exposes the four signature pollutants. Both upstreams
/// can echo the signature: the air API directly, and the advice API through
/// its pollutant echo fields.
pub trait PollutantReadings {
    fn pm25_value(&self) -> Option<f64>;
    fn pm10_value(&self) -> Option<f64>;
    fn o3_value(&self) -> Option<f64>;
    fn no2_value(&self) -> Option<f64>;
}

impl PollutantReadings for RawAirReading {
    fn pm25_value(&self) -> Option<f64> {
        self.pm25_value
    }

    fn pm10_value(&self) -> Option<f64> {
        self.pm10_value
    }

    fn o3_value(&self) -> Option<f64> {
        self.o3_value
    }

    fn no2_value(&self) -> Option<f64> {
        self.no2_value
    }
}

impl PollutantReadings for AiGuideView {
    fn pm25_value(&self) -> Option<f64> {
        self.pm25_value
    }

    fn pm10_value(&self) -> Option<f64> {
        self.pm10_value
    }

    fn o3_value(&self) -> Option<f64> {
        self.o3_value
    }

    fn no2_value(&self) -> Option<f64> {
        self.no2_value
    }
}

/// True when all four pollutant values are present and match the signature.
/// A payload missing any of the four is never the signature, even if the
/// remaining values line up.
pub fn is_unknown_station_signature<T: PollutantReadings>(reading: &T) -> bool {
    let (Some(pm25), Some(pm10), Some(o3), Some(no2)) = (
        reading.pm25_value(),
        reading.pm10_value(),
        reading.o3_value(),
        reading.no2_value(),
    ) else {
        return false;
    };

    pm25 == SIGNATURE_PM25
        && pm10 == SIGNATURE_PM10
        && (o3 - SIGNATURE_O3).abs() < SIGNATURE_EPSILON
        && (no2 - SIGNATURE_NO2).abs() < SIGNATURE_EPSILON
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn signature_reading() -> RawAirReading {
        RawAirReading {
            pm25_value: Some(65.0),
            pm10_value: Some(85.0),
            o3_value: Some(0.065),
            no2_value: Some(0.025),
            ..RawAirReading::default()
        }
    }

    #[test]
    fn test_exact_signature_is_detected() {
        assert!(is_unknown_station_signature(&signature_reading()));
    }

    #[test]
    fn test_gas_values_match_within_epsilon() {
        let mut reading = signature_reading();
        reading.o3_value = Some(0.065_000_000_4);
        reading.no2_value = Some(0.024_999_999_6);
        assert!(is_unknown_station_signature(&reading));
    }

    #[test]
    fn test_gas_drift_beyond_epsilon_is_a_real_reading() {
        let mut reading = signature_reading();
        reading.o3_value = Some(0.065_01);
        assert!(!is_unknown_station_signature(&reading));
    }

    #[test]
    fn test_particulate_values_compare_exactly() {
        let mut reading = signature_reading();
        reading.pm25_value = Some(65.000_001);
        assert!(!is_unknown_station_signature(&reading));
    }

    #[test]
    fn test_missing_field_is_never_the_signature() {
        // Three matching values with the fourth absent must pass as genuine:
        // a station legitimately reporting pm25=65 with a broken NO2 sensor
        // would otherwise be swallowed.
        let mut reading = signature_reading();
        reading.no2_value = None;
        assert!(!is_unknown_station_signature(&reading));
    }

    #[test]
    fn test_partial_match_is_a_real_reading() {
        let mut reading = signature_reading();
        reading.pm10_value = Some(84.0);
        assert!(!is_unknown_station_signature(&reading));
    }

    #[test]
    fn test_advice_payload_echoing_signature_is_detected() {
        let guide = AiGuideView {
            pm25_value: Some(65.0),
            pm10_value: Some(85.0),
            o3_value: Some(0.065),
            no2_value: Some(0.025),
            ..AiGuideView::default()
        };
        assert!(is_unknown_station_signature(&guide));
    }

    #[test]
    fn test_empty_reading_is_not_the_signature() {
        assert!(!is_unknown_station_signature(&RawAirReading::default()));
    }
}
