use std::collections::HashMap;

use ndarray::Array1;
use serde::Serialize;

use crate::domain::{FeatureRecord, Features};

/// Population mean and standard deviation of one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStat {
    pub mean: f64,
    pub std: f64,
}

impl Default for FeatureStat {
    fn default() -> Self {
        Self { mean: 0.0, std: 1.0 }
    }
}

pub type FeatureStatistics = HashMap<String, FeatureStat>;

/// Standardized similarity vector, fixed dimensionality and order
pub type NormalizedVector = Array1<f64>;

/// Representative feature values of one benchmark property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkProfile {
    pub name: String,
    pub property_type: Option<String>,
    pub values: Features,
}

impl FeatureRecord for BenchmarkProfile {
    fn features(&self) -> &Features {
        &self.values
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

pub type ProfileMap = HashMap<String, BenchmarkProfile>;
pub type VectorMap = HashMap<String, NormalizedVector>;

/// Signed deviation of a record from a benchmark on one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScore {
    pub label: &'static str,
    pub key: &'static str,
    pub value: f64,
}

impl ZScore {
    /// Magnitude limited to `limit` for bar rendering
    pub fn clamped(&self, limit: f64) -> f64 {
        self.value.clamp(-limit, limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneThresholds {
    pub high: f64,
    pub mid: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Prime,
    Strong,
    Emerging,
}

impl Tier {
    pub fn label(&self) -> &str {
        match self {
            Tier::Prime => "PRIME TARGET",
            Tier::Strong => "STRONG",
            Tier::Emerging => "EMERGING",
        }
    }
}

/// Which benchmark, if any, scores are currently indexed against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Composite,
    Benchmark(String),
}

impl Selection {
    pub fn parse(name: Option<&str>, composite_sentinel: &str) -> Self {
        match name.map(str::trim) {
            None | Some("") => Selection::Composite,
            Some(name) if name == composite_sentinel => Selection::Composite,
            Some(name) => Selection::Benchmark(name.to_string()),
        }
    }

    pub fn benchmark(&self) -> Option<&str> {
        match self {
            Selection::Composite => None,
            Selection::Benchmark(name) => Some(name),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Selection::Composite)
    }
}
