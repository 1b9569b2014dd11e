/// Station-name normalization and candidate generation.
///
/// Callers hand us free-form Korean place names ("성남시 분당구 정자1동",
/// a bare "분당구", sometimes with stray whitespace). Monitoring stations
/// are keyed by exact name, so each request is expanded into an ordered
/// list of plausible station names which the fetch layer tries in turn.
/// A hint table maps known administrative areas to the stations that
/// actually cover them; the built-in table can be replaced from a TOML
/// file at startup.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Hint table
// ---------------------------------------------------------------------------

// Areas whose own name is not a station name, mapped to nearby stations in
// preference order. Checked as substrings of the cleaned request.
static BUILTIN_HINTS: &[(&str, &[&str])] = &[
    ("성남시 분당구", &["정자동", "수내동", "운중동"]),
    ("분당구", &["정자동", "수내동", "운중동"]),
    ("판교동", &["운중동", "정자동"]),
    ("세종시", &["보람동", "아름동", "한솔동", "조치원읍"]),
    ("세종특별자치시", &["보람동", "아름동", "한솔동", "조치원읍"]),
];

#[derive(Debug, Error)]
pub enum HintFileError {
    #[error("could not read hint file: {0}")]
    Io(#[from] std::io::Error),
    #[error("hint file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct HintFile {
    #[serde(default, rename = "hint")]
    hints: Vec<HintEntry>,
}

#[derive(Debug, Deserialize)]
struct HintEntry {
    area: String,
    stations: Vec<String>,
}

/// Ordered area-to-stations hint table. Entry order is preserved because it
/// determines the order hint stations are tried in.
#[derive(Debug, Clone)]
pub struct StationHints {
    entries: Vec<(String, Vec<String>)>,
}

impl StationHints {
    pub fn builtin() -> StationHints {
        StationHints {
            entries: BUILTIN_HINTS
                .iter()
                .map(|(area, stations)| {
                    let stations = stations.iter().map(|s| s.to_string()).collect();
                    (area.to_string(), stations)
                })
                .collect(),
        }
    }

    /// Parses a hint table from TOML `[[hint]]` entries:
    ///
    /// ```toml
    /// [[hint]]
    /// area = "분당구"
    /// stations = ["정자동", "수내동"]
    /// ```
    pub fn from_toml_str(text: &str) -> Result<StationHints, toml::de::Error> {
        let file: HintFile = toml::from_str(text)?;
        let entries = file
            .hints
            .into_iter()
            .map(|entry| (entry.area, entry.stations))
            .collect();
        Ok(StationHints { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<StationHints, HintFileError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }

    /// Stations for every hint area contained in the cleaned request name,
    /// deduplicated, in table order. Matching is substring-based so that a
    /// full address like "성남시 분당구 정자1동" still triggers the
    /// "분당구" entry.
    pub fn lookup(&self, cleaned: &str) -> Vec<&str> {
        let mut matched: Vec<&str> = Vec::new();
        for (area, stations) in &self.entries {
            if !cleaned.contains(area.as_str()) {
                continue;
            }
            for station in stations {
                if !matched.contains(&station.as_str()) {
                    matched.push(station);
                }
            }
        }
        matched
    }
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// For a name shaped `<stem><digits><marker>`, returns the stem. Requires a
/// nonempty stem and at least one digit, so a bare "동" or an all-digit
/// prefix is left alone.
fn split_numbered_suffix(name: &str, marker: char) -> Option<&str> {
    let base = name.strip_suffix(marker)?;
    let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == base.len() || stem.is_empty() {
        return None;
    }
    Some(stem)
}

/// Collapses a numbered administrative dong to its parent: "정자1동" becomes
/// "정자동". Station names never carry the number.
pub fn normalize_dong_name(name: &str) -> String {
    match split_numbered_suffix(name, '동') {
        Some(stem) => format!("{stem}동"),
        None => name.to_string(),
    }
}

/// Wider normalization for numbered legal-status suffixes. Numbered 동 keeps
/// the suffix, numbered 가 drops it entirely ("종로1가" becomes "종로"), and
/// numbered 리 keeps it. Rules apply in sequence.
pub fn normalize_subregion_name(name: &str) -> String {
    let name = normalize_dong_name(name);
    let name = match split_numbered_suffix(&name, '가') {
        Some(stem) => stem.to_string(),
        None => name,
    };
    match split_numbered_suffix(&name, '리') {
        Some(stem) => format!("{stem}리"),
        None => name,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Candidate generation
// ---------------------------------------------------------------------------

/// Expands a raw place name into station-name candidates, most specific
/// first. Every candidate is whitespace-collapsed and the list is
/// deduplicated in first-seen order:
///
/// 1. the cleaned name itself, then with all spaces removed
/// 2. dong- and subregion-normalized forms of the whole name
/// 3. each whitespace token, plus its normalized forms
/// 4. for multi-token names, the last token, the second-to-last token and
///    their pair (the "시군구 동" tail of an address)
/// 5. hint-table stations for any area the name contains
///
/// An empty or whitespace-only input produces no candidates.
pub fn build_station_candidates(raw_station: &str, hints: &StationHints) -> Vec<String> {
    let cleaned = collapse_whitespace(raw_station);
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();

    let mut add = |value: String| {
        let normalized = collapse_whitespace(&value);
        if normalized.is_empty() || !seen.insert(normalized.clone()) {
            return;
        }
        candidates.push(normalized);
    };

    add(cleaned.clone());
    add(cleaned.replace(' ', ""));
    add(normalize_dong_name(&cleaned));
    add(normalize_subregion_name(&cleaned));

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    for token in &tokens {
        add((*token).to_string());
        add(normalize_dong_name(token));
        add(normalize_subregion_name(token));
    }

    if tokens.len() >= 2 {
        let last = tokens[tokens.len() - 1];
        let second_last = tokens[tokens.len() - 2];
        add(last.to_string());
        add(second_last.to_string());
        add(format!("{second_last} {last}"));
    }

    for hint in hints.lookup(&cleaned) {
        add(hint.to_string());
    }

    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
