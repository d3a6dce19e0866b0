use log::debug;

use super::normalization::build_vector;
use super::types::{BenchmarkProfile, FeatureStatistics, ProfileMap, VectorMap};
use crate::config::features::FeatureSpec;
use crate::domain::{Benchmark, FeatureRecord, Features};

/// Builds one profile per benchmark.
///
/// A feature the benchmark carries itself is taken verbatim. Otherwise it is the mean
/// over the records matched to that benchmark, or 0 when nothing usable is matched.
pub fn build_profiles<'a, R, I>(records: I, benchmarks: &[Benchmark], specs: &[FeatureSpec]) -> ProfileMap
where
    R: FeatureRecord + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let records: Vec<&R> = records.into_iter().collect();

    benchmarks
        .iter()
        .map(|benchmark| {
            let profile = build_profile(&records, benchmark, specs);
            (benchmark.name.clone(), profile)
        })
        .collect()
}

fn build_profile<R>(records: &[&R], benchmark: &Benchmark, specs: &[FeatureSpec]) -> BenchmarkProfile
where
    R: FeatureRecord + ?Sized,
{
    let matched: Vec<&R> = records
        .iter()
        .copied()
        .filter(|r| r.matched_property() == Some(benchmark.name.as_str()))
        .collect();
    debug!("Benchmark {} has {} matched records", benchmark.name, matched.len());

    let mut values = Features::new();
    for spec in specs {
        let value = benchmark
            .feature(spec.key)
            .unwrap_or_else(|| matched_mean(&matched, spec.key));
        values.insert(spec.key, value);
    }

    BenchmarkProfile {
        name: benchmark.name.clone(),
        property_type: benchmark.property_type.clone(),
        values,
    }
}

fn matched_mean<R>(matched: &[&R], key: &str) -> f64
where
    R: FeatureRecord + ?Sized,
{
    let values: Vec<f64> = matched.iter().filter_map(|r| r.feature(key)).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Vectorizes every profile against the population statistics
pub fn build_vectors(profiles: &ProfileMap, specs: &[FeatureSpec], stats: &FeatureStatistics) -> VectorMap {
    profiles
        .iter()
        .map(|(name, profile)| (name.clone(), build_vector(profile, specs, stats)))
        .collect()
}
