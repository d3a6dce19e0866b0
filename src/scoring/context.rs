use log::info;

use super::benchmarks::{build_profiles, build_vectors};
use super::deviation::z_scores;
use super::normalization::{build_vector, compute_statistics};
use super::reindex::{Ranked, reindex};
use super::thresholds::{classify_score, compute_thresholds};
use super::types::{
    BenchmarkProfile, FeatureStatistics, NormalizedVector, ProfileMap, Selection, Tier, VectorMap, ZScore,
    ZoneThresholds,
};
use crate::config::features::{DEVIATION_FEATURES, SIMILARITY_FEATURES, similarity_keys};
use crate::config::settings::ScoringSettings;
use crate::domain::{Benchmark, FeatureRecord};

/// Immutable scoring state derived once from a loaded record population
#[derive(Debug, Clone)]
pub struct ScoringContext {
    statistics: FeatureStatistics,
    profiles: ProfileMap,
    vectors: VectorMap,
    settings: ScoringSettings,
}

impl ScoringContext {
    /// Statistics come from `population`; profiles from `matched` records and `benchmarks`
    pub fn build<'a, P, M>(population: P, matched: M, benchmarks: &[Benchmark], settings: ScoringSettings) -> Self
    where
        P: IntoIterator<Item = &'a dyn FeatureRecord>,
        M: IntoIterator<Item = &'a dyn FeatureRecord>,
    {
        let statistics = compute_statistics(population, &similarity_keys());
        let profiles = build_profiles(matched, benchmarks, &SIMILARITY_FEATURES);
        let vectors = build_vectors(&profiles, &SIMILARITY_FEATURES, &statistics);

        info!(
            "Scoring context ready: {} features, {} benchmark profiles",
            statistics.len(),
            profiles.len()
        );

        Self { statistics, profiles, vectors, settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    pub fn statistics(&self) -> &FeatureStatistics {
        &self.statistics
    }

    pub fn profile(&self, name: &str) -> Option<&BenchmarkProfile> {
        self.profiles.get(name)
    }

    pub fn has_benchmark(&self, name: &str) -> bool {
        self.vectors.contains_key(name)
    }

    pub fn selection(&self, name: Option<&str>) -> Selection {
        Selection::parse(name, &self.settings.composite_sentinel)
    }

    pub fn vector<R: FeatureRecord + ?Sized>(&self, record: &R) -> NormalizedVector {
        build_vector(record, &SIMILARITY_FEATURES, &self.statistics)
    }

    pub fn reindex<'a, R: FeatureRecord>(&self, records: &'a [R], selection: &Selection) -> Vec<Ranked<'a, R>> {
        reindex(records, selection, &self.vectors, &SIMILARITY_FEATURES, &self.statistics)
    }

    pub fn z_scores<R: FeatureRecord + ?Sized>(&self, record: &R, selection: &Selection) -> Vec<ZScore> {
        z_scores(record, selection, &self.profiles, &DEVIATION_FEATURES, &self.statistics)
    }

    pub fn zone_thresholds<R: FeatureRecord>(&self, zones: &[Ranked<'_, R>]) -> ZoneThresholds {
        compute_thresholds(zones, &self.settings)
    }

    pub fn tier(&self, score: f64) -> Tier {
        classify_score(score, &self.settings)
    }
}
