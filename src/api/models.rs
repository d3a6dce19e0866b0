use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Features, TwinMatch};
use crate::scoring::{Tier, ZoneThresholds};
use crate::services::atlas::{ScoreRange, ViewSummary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub tracts: usize,
    pub twins: usize,
    pub zones: usize,
    pub benchmarks: usize,
    pub states: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkItem {
    pub name: String,
    pub property_type: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub profile: Option<Features>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub total: usize,
    pub highlighted: usize,
    pub average_score: Option<i64>,
    pub states: usize,
}

impl From<ViewSummary> for SummaryDto {
    fn from(summary: ViewSummary) -> Self {
        Self {
            total: summary.total,
            highlighted: summary.highlighted,
            average_score: summary.average_score,
            states: summary.states,
        }
    }
}

#[derive(Serialize)]
pub struct RangeDto {
    pub min: i64,
    pub max: i64,
}

impl From<ScoreRange> for RangeDto {
    fn from(range: ScoreRange) -> Self {
        Self { min: range.min, max: range.max }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationDto {
    pub label: &'static str,
    pub key: &'static str,
    pub value: f64,
    pub bar_value: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TractItem {
    pub rank: usize,
    pub name: String,
    pub display_name: String,
    pub tract_id: Option<String>,
    pub county: Option<String>,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
    pub population: Option<f64>,
    pub score: f64,
    pub tier: Tier,
    pub zone_name: Option<String>,
    pub summary: Option<String>,
    pub anchors: Option<String>,
    pub deviations: Vec<DeviationDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinItem {
    pub rank: usize,
    pub name: String,
    pub display_name: String,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
    pub population: Option<f64>,
    pub score: f64,
    pub tier: Tier,
    pub matched_property: Option<String>,
    pub property_type: Option<String>,
    pub also_matches: Vec<TwinMatch>,
    pub deviations: Vec<DeviationDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneItem {
    pub rank: usize,
    pub zone_name: String,
    pub cluster_id: Option<i64>,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
    pub total_pop: Option<f64>,
    pub tract_count: u32,
    pub size_class: Option<String>,
    pub score: f64,
    pub tier: Tier,
    pub tracts: Vec<String>,
    pub summary: Option<String>,
    pub anchors: Option<String>,
    pub deviations: Vec<DeviationDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub benchmark: Option<String>,
    pub items: Vec<T>,
    pub summary: SummaryDto,
    pub range: RangeDto,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneListResponse {
    pub benchmark: Option<String>,
    pub items: Vec<ZoneItem>,
    pub summary: SummaryDto,
    pub range: RangeDto,
    pub thresholds: ZoneThresholds,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub clusters: usize,
    pub solo_zones: usize,
    pub total_population: f64,
    pub total_tracts: u64,
}
