use ndarray::Array1;

use super::types::{FeatureStat, FeatureStatistics, NormalizedVector};
use crate::config::features::FeatureSpec;
use crate::domain::FeatureRecord;

/// Per-feature mean and population standard deviation over `records`.
///
/// Missing and non-finite values are left out of the statistics. A feature with no usable
/// values, or with zero variance, gets a standard deviation of 1.
pub fn compute_statistics<'a, R, I>(records: I, keys: &[&str]) -> FeatureStatistics
where
    R: FeatureRecord + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let samples = collect_samples(records, keys);

    keys.iter()
        .zip(samples)
        .map(|(key, values)| (key.to_string(), calculate_stat(&values)))
        .collect()
}

fn collect_samples<'a, R, I>(records: I, keys: &[&str]) -> Vec<Vec<f64>>
where
    R: FeatureRecord + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut samples = vec![Vec::new(); keys.len()];
    for record in records {
        for (values, key) in samples.iter_mut().zip(keys) {
            if let Some(value) = record.feature(key) {
                values.push(value);
            }
        }
    }
    samples
}

fn calculate_stat(values: &[f64]) -> FeatureStat {
    if values.is_empty() {
        return FeatureStat::default();
    }

    let mean = calculate_mean(values);
    let std = calculate_std_dev(values, mean);

    if !mean.is_finite() {
        return FeatureStat::default();
    }

    if std == 0.0 || !std.is_finite() {
        FeatureStat { mean, std: 1.0 }
    } else {
        FeatureStat { mean, std }
    }
}

fn calculate_mean(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    sum / values.len() as f64
}

fn calculate_std_dev(values: &[f64], mean: f64) -> f64 {
    calculate_variance(values, mean).sqrt()
}

fn calculate_variance(values: &[f64], mean: f64) -> f64 {
    let sum_sq_diff: f64 = values.iter().map(|&v| (v - mean).powi(2)).sum();

    sum_sq_diff / values.len() as f64
}

/// Standardized vector of `record` over `specs`, in spec order.
///
/// Unresolvable features contribute 0. Keys without statistics use mean 0, std 1.
pub fn build_vector<R>(record: &R, specs: &[FeatureSpec], stats: &FeatureStatistics) -> NormalizedVector
where
    R: FeatureRecord + ?Sized,
{
    Array1::from_iter(specs.iter().map(|spec| standardize(record, spec, stats)))
}

fn standardize<R>(record: &R, spec: &FeatureSpec, stats: &FeatureStatistics) -> f64
where
    R: FeatureRecord + ?Sized,
{
    let Some(value) = resolve_value(record, spec) else {
        return 0.0;
    };

    let stat = stats.get(spec.key).copied().unwrap_or_default();
    let z_score = (value - stat.mean) / stat.std;

    if z_score.is_finite() { z_score } else { 0.0 }
}

/// First usable value along the spec's resolution order
pub fn resolve_value<R>(record: &R, spec: &FeatureSpec) -> Option<f64>
where
    R: FeatureRecord + ?Sized,
{
    spec.resolution_order().find_map(|key| record.feature(key))
}
