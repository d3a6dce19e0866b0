use super::types::{FeatureStatistics, ProfileMap, Selection, ZScore};
use crate::config::features::DeviationFeature;
use crate::domain::FeatureRecord;

/// Per-feature deviation of `record` from a benchmark profile, in population
/// standard deviations, rounded to two decimals.
///
/// Missing values on either side count as 0. Empty when the selection is composite or
/// has no profile.
pub fn z_scores<R>(
    record: &R,
    selection: &Selection,
    profiles: &ProfileMap,
    features: &[DeviationFeature],
    stats: &FeatureStatistics,
) -> Vec<ZScore>
where
    R: FeatureRecord + ?Sized,
{
    let Some(profile) = selection.benchmark().and_then(|name| profiles.get(name)) else {
        return Vec::new();
    };

    features
        .iter()
        .map(|feature| {
            let record_value = record.feature(feature.key).unwrap_or(0.0);
            let benchmark_value = profile.feature(feature.key).unwrap_or(0.0);
            let std = stats.get(feature.key).map(|s| s.std).unwrap_or(1.0);

            ZScore {
                label: feature.label,
                key: feature.key,
                value: round_to_hundredths((record_value - benchmark_value) / std),
            }
        })
        .collect()
}

fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}
