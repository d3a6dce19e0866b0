use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::BTreeSet;

use crate::config::settings::AppConfig;
use crate::data::{DatasetStore, Datasets};
use crate::domain::{Benchmark, FeatureRecord, Record, TractRecord, TwinRecord, ZoneRecord};
use crate::pagination::{Page, PaginationConfig};
use crate::scoring::{BenchmarkProfile, Ranked, ScoringContext, Selection, Tier, ZScore, ZoneThresholds};

/// A record as currently displayed: its score, tier and deviation rows
#[derive(Debug, Clone)]
pub struct ViewItem<'a, R> {
    pub record: &'a R,
    pub score: f64,
    pub tier: Tier,
    pub deviations: Vec<ZScore>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSummary {
    pub total: usize,
    /// Prime tracts, distinct matched properties, or summed zone tracts
    pub highlighted: usize,
    pub average_score: Option<i64>,
    pub states: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Default)]
pub struct TractQuery {
    pub state: Option<String>,
    pub min_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TwinQuery {
    pub property_type: Option<String>,
    pub state: Option<String>,
    pub min_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ZoneQuery {
    pub state: Option<String>,
    pub size_class: Option<String>,
    pub search: Option<String>,
    pub min_score: f64,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ListView<'a, R> {
    pub items: Vec<ViewItem<'a, R>>,
    pub summary: ViewSummary,
    pub range: ScoreRange,
}

#[derive(Debug, Clone)]
pub struct ZoneView<'a> {
    pub items: Vec<ViewItem<'a, ZoneRecord>>,
    pub summary: ViewSummary,
    pub range: ScoreRange,
    pub thresholds: ZoneThresholds,
    pub page: Page,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSurvey {
    pub clusters: usize,
    pub solo_zones: usize,
    pub total_population: f64,
    pub total_tracts: u64,
}

#[derive(Debug, Clone)]
pub struct Overview {
    pub tracts: usize,
    pub twins: usize,
    pub zones: usize,
    pub benchmarks: usize,
    pub states: BTreeSet<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Read-only query service over the loaded datasets and their scoring context
pub struct AtlasService {
    datasets: Datasets,
    context: ScoringContext,
    pagination: PaginationConfig,
}

impl AtlasService {
    pub fn new(datasets: Datasets, config: &AppConfig) -> Self {
        let context = datasets.build_context(config.scoring.clone());
        let pagination =
            PaginationConfig::new(config.server.zone_page_size).with_max_page_size(config.server.max_page_size);
        Self { datasets, context, pagination }
    }

    /// Loads every dataset, then builds the scoring context over the full population
    pub async fn load(config: &AppConfig) -> Self {
        info!("Loading datasets from {}", config.data.data_dir.display());
        let store = DatasetStore::new(config.data.clone());
        let datasets = store.load_all().await;
        Self::new(datasets, config)
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    pub fn context(&self) -> &ScoringContext {
        &self.context
    }

    /// Resolves a requested benchmark; names without a profile fall back to composite
    pub fn selection(&self, benchmark: Option<&str>) -> Selection {
        match self.context.selection(benchmark) {
            Selection::Benchmark(name) if !self.context.has_benchmark(&name) => {
                debug!("No profile for benchmark '{}', using composite scores", name);
                Selection::Composite
            }
            selection => selection,
        }
    }

    pub fn overview(&self) -> Overview {
        Overview {
            tracts: self.datasets.tracts.len(),
            twins: self.datasets.twins.twins.len(),
            zones: self.datasets.zones.len(),
            benchmarks: self.datasets.twins.benchmarks.len(),
            states: self.datasets.states(),
            loaded_at: self.datasets.loaded_at,
        }
    }

    pub fn benchmarks(&self) -> Vec<(&Benchmark, Option<&BenchmarkProfile>)> {
        self.datasets
            .twins
            .benchmarks
            .iter()
            .map(|b| (b, self.context.profile(&b.name)))
            .collect()
    }

    pub fn find_tract(&self, identifier: &str) -> Option<&TractRecord> {
        self.datasets.tracts.iter().find(|t| t.matches_identifier(identifier))
    }

    /// Looks a record up by name across tracts, then twins, then zones
    pub fn find_record(&self, identifier: &str) -> Option<Record> {
        let needle = identifier.trim();
        if let Some(tract) = self.find_tract(needle) {
            return Some(Record::Tract(tract.clone()));
        }
        let twin = self.datasets.twins.twins.iter().find(|t| {
            t.name.eq_ignore_ascii_case(needle) || t.tract_id.as_deref().is_some_and(|id| id.eq_ignore_ascii_case(needle))
        });
        if let Some(twin) = twin {
            return Some(Record::Twin(twin.clone()));
        }
        self.datasets
            .zones
            .iter()
            .find(|z| z.zone_name.eq_ignore_ascii_case(needle))
            .map(|z| Record::Zone(z.clone()))
    }

    pub fn deviations<R: FeatureRecord + ?Sized>(&self, record: &R, selection: &Selection) -> Vec<ZScore> {
        self.context.z_scores(record, selection)
    }

    pub fn tract_view(&self, selection: &Selection, query: &TractQuery) -> ListView<'_, TractRecord> {
        let ranked = self.context.reindex(&self.datasets.tracts, selection);
        let range = score_range(&ranked);

        let items: Vec<_> = ranked
            .into_iter()
            .filter(|r| matches_state(r.record, query.state.as_deref()))
            .filter(|r| r.display_score() >= query.min_score)
            .map(|r| {
                let score = r.display_score();
                ViewItem {
                    record: r.record,
                    score,
                    tier: self.context.tier(score),
                    deviations: self.context.z_scores(r.record, selection),
                }
            })
            .collect();

        let prime = items.iter().filter(|i| i.tier == Tier::Prime).count();
        let summary = summarize(&items, prime);
        ListView { items, summary, range }
    }

    /// Twins keep their own scores; a selected benchmark narrows them to its matches
    pub fn twin_view(&self, selection: &Selection, query: &TwinQuery) -> ListView<'_, TwinRecord> {
        let twins: Vec<Ranked<'_, TwinRecord>> = self.datasets.twins.twins.iter().map(Ranked::unindexed).collect();
        let range = score_range(&twins);

        let items: Vec<_> = twins
            .into_iter()
            .filter(|r| {
                query
                    .property_type
                    .as_deref()
                    .is_none_or(|t| r.record.property_type.as_deref() == Some(t))
            })
            .filter(|r| matches_state(r.record, query.state.as_deref()))
            .filter(|r| {
                selection
                    .benchmark()
                    .is_none_or(|name| r.record.matched_property() == Some(name))
            })
            .filter(|r| r.display_score() >= query.min_score)
            .map(|r| {
                let score = r.display_score();
                let own_benchmark = self.context.selection(r.record.matched_property());
                ViewItem {
                    record: r.record,
                    score,
                    tier: self.context.tier(score),
                    deviations: self.context.z_scores(r.record, &own_benchmark),
                }
            })
            .collect();

        let properties: BTreeSet<_> = items.iter().filter_map(|i| i.record.matched_property()).collect();
        let summary = summarize(&items, properties.len());
        ListView { items, summary, range }
    }

    /// Zones are tiered by tertiles of the filtered set, then paginated
    pub fn zone_view(&self, selection: &Selection, query: &ZoneQuery) -> ZoneView<'_> {
        let ranked = self.context.reindex(&self.datasets.zones, selection);
        let range = score_range(&ranked);

        let search = query.search.as_deref().unwrap_or("");
        let filtered: Vec<_> = ranked
            .into_iter()
            .filter(|r| matches_state(r.record, query.state.as_deref()))
            .filter(|r| {
                query
                    .size_class
                    .as_deref()
                    .is_none_or(|c| r.record.size_class.as_deref() == Some(c))
            })
            .filter(|r| r.record.matches_search(search))
            .filter(|r| r.display_score() >= query.min_score)
            .collect();

        let thresholds = self.context.zone_thresholds(&filtered);
        let tracts: u64 = filtered.iter().map(|r| u64::from(r.record.tract_count())).sum();
        let scores: Vec<f64> = filtered.iter().map(Ranked::display_score).collect();
        let summary = ViewSummary {
            total: filtered.len(),
            highlighted: tracts as usize,
            average_score: rounded_average(&scores),
            states: distinct_states(filtered.iter().map(|r| r.record)),
        };

        let page = self.pagination.page(query.page, query.page_size);
        let total_pages = page.total_pages(filtered.len());
        let items = page
            .slice(&filtered)
            .iter()
            .map(|r| {
                let score = r.display_score();
                ViewItem {
                    record: r.record,
                    score,
                    tier: thresholds.classify(score),
                    deviations: self.context.z_scores(r.record, selection),
                }
            })
            .collect();

        ZoneView { items, summary, range, thresholds, page, total_pages }
    }

    pub fn cluster_survey(&self) -> ClusterSurvey {
        let zones = &self.datasets.zones;
        ClusterSurvey {
            clusters: zones.iter().filter(|z| z.tract_count() > 1).count(),
            solo_zones: zones.iter().filter(|z| z.tract_count() == 1).count(),
            total_population: zones.iter().filter_map(|z| z.total_pop).sum(),
            total_tracts: zones.iter().map(|z| u64::from(z.tract_count())).sum(),
        }
    }
}

fn matches_state<R: FeatureRecord + ?Sized>(record: &R, state: Option<&str>) -> bool {
    state.is_none_or(|s| record.state() == s)
}

fn summarize<R: FeatureRecord>(items: &[ViewItem<'_, R>], highlighted: usize) -> ViewSummary {
    let scores: Vec<f64> = items.iter().map(|i| i.score).collect();
    ViewSummary {
        total: items.len(),
        highlighted,
        average_score: rounded_average(&scores),
        states: distinct_states(items.iter().map(|i| i.record)),
    }
}

fn rounded_average(scores: &[f64]) -> Option<i64> {
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(mean.round() as i64)
}

fn distinct_states<'a, R: FeatureRecord + 'a>(records: impl Iterator<Item = &'a R>) -> usize {
    records.map(|r| r.state()).collect::<BTreeSet<_>>().len()
}

/// Whole-number bounds of the positive scores; 0..100 when there are none
fn score_range<R: FeatureRecord>(ranked: &[Ranked<'_, R>]) -> ScoreRange {
    let scores: Vec<f64> = ranked.iter().map(Ranked::display_score).filter(|&s| s > 0.0).collect();
    if scores.is_empty() {
        return ScoreRange { min: 0, max: 100 };
    }
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ScoreRange {
        min: min.floor() as i64,
        max: max.ceil() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Features, TwinDataset};

    fn tract(name: &str, state: &str, score: f64, hispanic: f64, income: f64) -> TractRecord {
        TractRecord {
            name: name.to_string(),
            state: state.to_string(),
            match_score: Some(score),
            features: Features::new().with("pct_hispanic", hispanic).with("med_hh_income", income),
            ..Default::default()
        }
    }

    fn twin(name: &str, state: &str, property: &str, kind: &str, score: f64) -> TwinRecord {
        TwinRecord {
            name: name.to_string(),
            state: state.to_string(),
            twin_score: Some(score),
            matched_property: Some(property.to_string()),
            property_type: Some(kind.to_string()),
            features: Features::new().with("pct_hispanic", 65.0).with("med_hh_income", 48_000.0),
            ..Default::default()
        }
    }

    fn zone(name: &str, state: &str, score: f64, tracts: u32) -> ZoneRecord {
        ZoneRecord {
            zone_name: name.to_string(),
            state: state.to_string(),
            avg_score: Some(score),
            tract_count: Some(tracts),
            total_pop: Some(4_000.0 * tracts as f64),
            size_class: Some(if tracts > 1 { "MEDIUM ZONE" } else { "SOLO ZONE" }.to_string()),
            tracts: (0..tracts).map(|i| format!("{}{}", name, i)).collect(),
            ..Default::default()
        }
    }

    fn service() -> AtlasService {
        let tracts = vec![
            tract("Census Tract 1", "IL", 88.0, 70.0, 45_000.0),
            tract("Census Tract 2", "IL", 64.0, 20.0, 95_000.0),
            tract("Census Tract 3", "IN", 52.0, 55.0, 58_000.0),
        ];
        let twins = TwinDataset {
            benchmarks: vec![
                Benchmark { name: "Anaheim Town Square".into(), property_type: Some("Hispanic Value".into()), ..Default::default() },
                Benchmark { name: "Bricktown Square".into(), property_type: Some("Urban Core".into()), ..Default::default() },
            ],
            twins: vec![
                twin("Census Tract 9", "TX", "Anaheim Town Square", "Hispanic Value", 91.0),
                twin("Census Tract 8", "OH", "Bricktown Square", "Urban Core", 74.0),
                twin("Census Tract 7", "TX", "Anaheim Town Square", "Hispanic Value", 70.0),
            ],
        };
        let zones = (1..=10)
            .map(|i| zone(&format!("Zone {}", i), if i % 2 == 0 { "IL" } else { "WI" }, i as f64 * 10.0, (i % 3) as u32 + 1))
            .collect();

        AtlasService::new(Datasets::new(tracts, twins, zones), &AppConfig::new())
    }

    #[test]
    fn test_composite_tract_view() {
        let service = service();

        let view = service.tract_view(&Selection::Composite, &TractQuery::default());

        let scores: Vec<f64> = view.items.iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![88.0, 64.0, 52.0]);
        assert_eq!(view.items[0].tier, Tier::Prime);
        assert_eq!(view.items[1].tier, Tier::Strong);
        assert!(view.items.iter().all(|i| i.deviations.is_empty()));
        assert_eq!(view.summary, ViewSummary { total: 3, highlighted: 1, average_score: Some(68), states: 2 });
        assert_eq!(view.range, ScoreRange { min: 52, max: 88 });
    }

    #[test]
    fn test_tract_view_filters() {
        let service = service();
        let query = TractQuery { state: Some("IL".into()), min_score: 70.0 };

        let view = service.tract_view(&Selection::Composite, &query);

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].record.name, "Census Tract 1");
    }

    #[test]
    fn test_benchmark_tract_view_is_reindexed() {
        let service = service();
        let selection = service.selection(Some("Anaheim Town Square"));

        let view = service.tract_view(&selection, &TractQuery::default());

        assert_eq!(view.items.len(), 3);
        assert!(view.items.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(view.items.iter().all(|i| i.deviations.len() == 8));
        assert_eq!(service.datasets().tracts[0].match_score, Some(88.0));
    }

    #[test]
    fn test_twin_view_narrows_to_selected_property() {
        let service = service();
        let selection = service.selection(Some("Anaheim Town Square"));

        let view = service.twin_view(&selection, &TwinQuery::default());

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.summary.highlighted, 1);
        assert_eq!(view.summary.average_score, Some(81));
        assert!(view.items.iter().all(|i| !i.deviations.is_empty()));
    }

    #[test]
    fn test_twin_view_filters_by_type_and_state() {
        let service = service();
        let query = TwinQuery { property_type: Some("Urban Core".into()), state: Some("OH".into()), min_score: 0.0 };

        let view = service.twin_view(&Selection::Composite, &query);

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].score, 74.0);
        assert_eq!(view.items[0].tier, Tier::Strong);
    }

    #[test]
    fn test_zone_view_thresholds_and_paging() {
        let service = service();
        let query = ZoneQuery { page_size: Some(4), ..Default::default() };

        let view = service.zone_view(&Selection::Composite, &query);

        assert_eq!(view.thresholds, ZoneThresholds { high: 70.0, mid: 40.0 });
        assert_eq!(view.summary.total, 10);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.items.len(), 4);
        assert_eq!(view.items[0].score, 100.0);
        assert_eq!(view.items[0].tier, Tier::Prime);
        assert_eq!(view.items[3].tier, Tier::Prime);
    }

    #[test]
    fn test_zone_view_search_and_small_fallback() {
        let service = service();
        let query = ZoneQuery { search: Some("zone 1".into()), ..Default::default() };

        let view = service.zone_view(&Selection::Composite, &query);

        // "Zone 1" and "Zone 10"
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.thresholds, ZoneThresholds { high: 50.0, mid: 35.0 });
        assert_eq!(view.items[0].tier, Tier::Prime);
        assert_eq!(view.items[1].tier, Tier::Emerging);
    }

    #[test]
    fn test_cluster_survey_and_overview() {
        let service = service();

        let survey = service.cluster_survey();
        let overview = service.overview();

        assert_eq!(survey.clusters + survey.solo_zones, 10);
        assert_eq!(survey.solo_zones, 3);
        assert_eq!(survey.total_tracts, 20);
        assert_eq!(overview.tracts, 3);
        assert_eq!(overview.benchmarks, 2);
        assert_eq!(overview.states.len(), 5);
    }

    #[test]
    fn test_find_tract_and_deviations() {
        let service = service();
        let tract = service.find_tract("census tract 3").unwrap();

        let rows = service.deviations(tract, &service.selection(Some("Bricktown Square")));

        assert_eq!(rows.len(), 8);
        assert!(service.deviations(tract, &Selection::Composite).is_empty());
    }

    #[test]
    fn test_unknown_benchmark_resolves_to_composite() {
        let service = service();

        assert_eq!(service.selection(Some("Mission Valley")), Selection::Composite);
        assert_eq!(service.selection(Some("composite")), Selection::Composite);
        assert_eq!(
            service.selection(Some("Bricktown Square")),
            Selection::Benchmark("Bricktown Square".to_string())
        );
    }

    #[test]
    fn test_find_record_across_datasets() {
        let service = service();

        assert!(matches!(service.find_record("Census Tract 3"), Some(Record::Tract(_))));
        assert!(matches!(service.find_record("census tract 9"), Some(Record::Twin(_))));
        assert!(matches!(service.find_record("Zone 4"), Some(Record::Zone(_))));
        assert!(service.find_record("no such place").is_none());
    }
}
