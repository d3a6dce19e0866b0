use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::config::features::ScoreField;

/// Loose bag of numeric attributes carried by every record.
///
/// Values are kept as raw JSON so that absent, null and non-numeric entries stay
/// distinguishable from a real zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(Map<String, Value>);

impl Features {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Finite numeric value for `key`, if any
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.0
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.0.insert(key.to_string(), Value::Number(number));
        }
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.insert(key, value);
        self
    }
}

/// Census tract scored by the demographic model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TractRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tract_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub county: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: f64,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub population: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub match_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub anchors: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub zone_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub cluster_id: Option<i64>,
    #[serde(flatten)]
    pub features: Features,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwinMatch {
    pub property: String,
    pub score: f64,
}

/// Tract matched to a benchmark property by the upstream twin pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tract_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub county: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: f64,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub population: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub twin_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub matched_property: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub twin_matches: Vec<TwinMatch>,
    #[serde(flatten)]
    pub features: Features,
}

/// Spatial cluster of nearby tracts with aggregated attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub zone_name: String,
    #[serde(default, deserialize_with = "lenient::opt_integer")]
    pub cluster_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: f64,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub total_pop: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub tract_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub size_class: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub avg_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tracts: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub anchors: Option<String>,
    #[serde(flatten)]
    pub features: Features,
}

/// Reference property whose profile anchors similarity scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: f64,
    #[serde(flatten)]
    pub features: Features,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinDataset {
    #[serde(default)]
    pub benchmarks: Vec<Benchmark>,
    #[serde(default)]
    pub twins: Vec<TwinRecord>,
}

/// Any of the three record shapes the atlas works with
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Tract(TractRecord),
    Twin(TwinRecord),
    Zone(ZoneRecord),
}

/// Uniform feature access across record shapes.
///
/// Anything implementing this can be normalized, vectorized and scored.
pub trait FeatureRecord {
    fn features(&self) -> &Features;

    fn feature(&self, key: &str) -> Option<f64> {
        self.features().numeric(key)
    }

    fn score_field(&self, _field: ScoreField) -> Option<f64> {
        None
    }

    fn matched_property(&self) -> Option<&str> {
        None
    }

    fn state(&self) -> &str {
        ""
    }

    fn label(&self) -> String;
}

impl FeatureRecord for TractRecord {
    fn features(&self) -> &Features {
        &self.features
    }

    fn score_field(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::MatchScore => self.match_score,
            _ => self.features.numeric(field.as_str()),
        }
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn label(&self) -> String {
        self.display_name()
    }
}

impl FeatureRecord for TwinRecord {
    fn features(&self) -> &Features {
        &self.features
    }

    fn score_field(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::TwinScore => self.twin_score,
            _ => self.features.numeric(field.as_str()),
        }
    }

    fn matched_property(&self) -> Option<&str> {
        self.matched_property.as_deref()
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn label(&self) -> String {
        tract_display_name(self.tract_id.as_deref(), &self.name, self.county.as_deref())
    }
}

impl FeatureRecord for ZoneRecord {
    fn features(&self) -> &Features {
        &self.features
    }

    fn score_field(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::AvgScore => self.avg_score,
            _ => self.features.numeric(field.as_str()),
        }
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn label(&self) -> String {
        self.zone_name.clone()
    }
}

impl FeatureRecord for Benchmark {
    fn features(&self) -> &Features {
        &self.features
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl FeatureRecord for Record {
    fn features(&self) -> &Features {
        match self {
            Record::Tract(r) => r.features(),
            Record::Twin(r) => r.features(),
            Record::Zone(r) => r.features(),
        }
    }

    fn score_field(&self, field: ScoreField) -> Option<f64> {
        match self {
            Record::Tract(r) => r.score_field(field),
            Record::Twin(r) => r.score_field(field),
            Record::Zone(r) => r.score_field(field),
        }
    }

    fn matched_property(&self) -> Option<&str> {
        match self {
            Record::Twin(r) => r.matched_property(),
            _ => None,
        }
    }

    fn state(&self) -> &str {
        match self {
            Record::Tract(r) => &r.state,
            Record::Twin(r) => &r.state,
            Record::Zone(r) => &r.state,
        }
    }

    fn label(&self) -> String {
        match self {
            Record::Tract(r) => r.label(),
            Record::Twin(r) => r.label(),
            Record::Zone(r) => r.label(),
        }
    }
}

impl TractRecord {
    /// "Tract 8402.01, Cook County" style label
    pub fn display_name(&self) -> String {
        tract_display_name(self.tract_id.as_deref(), &self.name, self.county.as_deref())
    }

    pub fn matches_identifier(&self, needle: &str) -> bool {
        let needle = needle.trim();
        self.name.eq_ignore_ascii_case(needle)
            || self.tract_id.as_deref().is_some_and(|id| id.eq_ignore_ascii_case(needle))
            || self.display_name().eq_ignore_ascii_case(needle)
    }
}

impl ZoneRecord {
    pub fn tract_count(&self) -> u32 {
        self.tract_count.unwrap_or(0)
    }

    /// Case-insensitive match against the zone name and its tract labels
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.zone_name.to_lowercase().contains(&term)
            || self.tracts.iter().any(|t| t.to_lowercase().contains(&term))
    }
}

fn tract_display_name(tract_id: Option<&str>, name: &str, county: Option<&str>) -> String {
    let tract = tract_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| name.split(';').next().unwrap_or("").trim());
    let short = tract.replace("Census Tract ", "").replace("Tract ", "");
    format!("Tract {}, {}", short, county.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_ignore_non_numeric_values() {
        let record: TractRecord = serde_json::from_value(serde_json::json!({
            "name": "Census Tract 101; Cook County; Illinois",
            "state": "IL",
            "pct_hispanic": 42.5,
            "pct_black": "n/a",
            "pct_asian": null
        }))
        .unwrap();

        assert_eq!(record.feature("pct_hispanic"), Some(42.5));
        assert_eq!(record.feature("pct_black"), None);
        assert_eq!(record.feature("pct_asian"), None);
        assert_eq!(record.feature("pct_renter"), None);
    }

    #[test]
    fn test_twin_dataset_parses_benchmark_type() {
        let data: TwinDataset = serde_json::from_value(serde_json::json!({
            "benchmarks": [{"name": "Anaheim Town Square", "type": "Hispanic Value", "lat": 33.8, "lng": -117.9, "pct_hispanic": 61.0}],
            "twins": [{"name": "Tract 7", "state": "TX", "twin_score": 88.5, "matched_property": "Anaheim Town Square",
                       "twin_matches": [{"property": "Anaheim Town Square", "score": 88.5}]}]
        }))
        .unwrap();

        assert_eq!(data.benchmarks[0].property_type.as_deref(), Some("Hispanic Value"));
        assert_eq!(data.benchmarks[0].feature("pct_hispanic"), Some(61.0));
        assert_eq!(data.twins[0].matched_property(), Some("Anaheim Town Square"));
        assert_eq!(data.twins[0].twin_matches.len(), 1);
    }

    #[test]
    fn test_display_name_prefers_tract_id() {
        let tract = TractRecord {
            name: "Census Tract 8402.01; Cook County; Illinois".to_string(),
            county: Some("Cook County".to_string()),
            ..Default::default()
        };
        assert_eq!(tract.display_name(), "Tract 8402.01, Cook County");

        let with_id = TractRecord {
            tract_id: Some("Census Tract 12".to_string()),
            ..tract
        };
        assert_eq!(with_id.display_name(), "Tract 12, Cook County");
        assert!(with_id.matches_identifier("census tract 12"));
    }

    #[test]
    fn test_zone_search_covers_tract_labels() {
        let zone = ZoneRecord {
            zone_name: "Cicero".to_string(),
            tracts: vec!["8140".to_string(), "8141.02".to_string()],
            ..Default::default()
        };
        assert!(zone.matches_search("cic"));
        assert!(zone.matches_search("8141"));
        assert!(zone.matches_search("  "));
        assert!(!zone.matches_search("berwyn"));
    }
}
