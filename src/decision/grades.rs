/// Pollutant concentration-to-grade breakpoints.
///
/// Breakpoints follow the Korean AirKorea four-tier scale. A missing or
/// non-finite value reads as tier 2 ("보통"): the report must always carry
/// a grade, and an unknown value must not look like an alarm.

/// PM2.5 grade from a µg/m³ reading.
pub fn pm25_grade_from_value(value: Option<f64>) -> u8 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return 2;
    };
    if v <= 15.0 {
        1
    } else if v <= 35.0 {
        2
    } else if v <= 75.0 {
        3
    } else {
        4
    }
}

/// Ozone grade from a ppm reading.
pub fn o3_grade_from_value(value: Option<f64>) -> u8 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return 2;
    };
    if v <= 0.03 {
        1
    } else if v <= 0.09 {
        2
    } else if v <= 0.15 {
        3
    } else {
        4
    }
}

/// Risk adjustments can push a grade outside the scale; the reported grade
/// never leaves 1..=4.
pub fn clamp_grade(grade: u8) -> u8 {
    grade.clamp(1, 4)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
