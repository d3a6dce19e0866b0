/// A similarity feature and the ordered keys consulted when resolving its value.
///
/// The primary key is tried first, then each fallback in order. Zone records publish
/// density as `avg_pop_density`, so `pop_density` falls back to it.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub key: &'static str,
    pub fallbacks: &'static [&'static str],
}

impl FeatureSpec {
    pub const fn new(key: &'static str) -> Self {
        Self { key, fallbacks: &[] }
    }

    pub const fn with_fallbacks(key: &'static str, fallbacks: &'static [&'static str]) -> Self {
        Self { key, fallbacks }
    }

    /// Primary key followed by its fallbacks
    pub fn resolution_order(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.key).chain(self.fallbacks.iter().copied())
    }
}

pub const SIMILARITY_DIMENSIONS: usize = 21;

/// The similarity features, in vector order. Never reorder.
pub const SIMILARITY_FEATURES: [FeatureSpec; SIMILARITY_DIMENSIONS] = [
    FeatureSpec::new("pct_hispanic"),
    FeatureSpec::new("pct_black"),
    FeatureSpec::new("pct_asian"),
    FeatureSpec::new("blue_collar_pct"),
    FeatureSpec::new("pct_renter"),
    FeatureSpec::new("pct_singles"),
    FeatureSpec::new("med_hh_income"),
    FeatureSpec::new("med_home_value"),
    FeatureSpec::new("pct_vacancy"),
    FeatureSpec::new("pct_families_with_kids"),
    FeatureSpec::new("pct_stable"),
    FeatureSpec::new("pct_commute_car"),
    FeatureSpec::new("pct_hs_only"),
    FeatureSpec::new("pct_bachelors"),
    FeatureSpec::new("pct_unemployed"),
    FeatureSpec::with_fallbacks("pop_density", &["avg_pop_density"]),
    FeatureSpec::new("avg_hh_size"),
    FeatureSpec::new("pct_snap"),
    FeatureSpec::new("pct_poverty"),
    FeatureSpec::new("daytime_ratio"),
    FeatureSpec::new("traffic_intensity"),
];

pub fn similarity_keys() -> Vec<&'static str> {
    SIMILARITY_FEATURES.iter().map(|spec| spec.key).collect()
}

/// A feature shown in deviation breakdowns
#[derive(Debug, Clone, Copy)]
pub struct DeviationFeature {
    pub key: &'static str,
    pub label: &'static str,
    pub is_percentage: bool,
}

impl DeviationFeature {
    const fn new(key: &'static str, label: &'static str, is_percentage: bool) -> Self {
        Self { key, label, is_percentage }
    }

    /// Raw value as shown next to its deviation
    pub fn format_value(&self, value: f64) -> String {
        if self.is_percentage {
            format!("{:.1}%", value)
        } else {
            format!("{:.0}", value)
        }
    }
}

pub fn deviation_feature(key: &str) -> Option<&'static DeviationFeature> {
    DEVIATION_FEATURES.iter().find(|f| f.key == key)
}

pub const DEVIATION_FEATURES: [DeviationFeature; 8] = [
    DeviationFeature::new("pct_hispanic", "Hispanic", true),
    DeviationFeature::new("med_hh_income", "Income", false),
    DeviationFeature::new("blue_collar_pct", "Blue Col", true),
    DeviationFeature::new("pct_renter", "Renter", true),
    DeviationFeature::new("pop_density", "Density", false),
    DeviationFeature::new("avg_hh_size", "HH Size", false),
    DeviationFeature::new("pct_snap", "SNAP", true),
    DeviationFeature::new("pct_families_with_kids", "Families", true),
];

/// Precomputed score fields, in the order they are consulted for the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    MatchScore,
    AvgScore,
    TwinScore,
}

impl ScoreField {
    pub fn as_str(&self) -> &str {
        match self {
            ScoreField::MatchScore => "match_score",
            ScoreField::AvgScore => "avg_score",
            ScoreField::TwinScore => "twin_score",
        }
    }
}

pub const COMPOSITE_SCORE_ORDER: [ScoreField; 3] = [
    ScoreField::MatchScore,
    ScoreField::AvgScore,
    ScoreField::TwinScore,
];
