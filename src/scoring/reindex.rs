use super::normalization::build_vector;
use super::similarity::{cosine_similarity, score_from_similarity};
use super::types::{FeatureStatistics, NormalizedVector, Selection, VectorMap};
use crate::config::features::{COMPOSITE_SCORE_ORDER, FeatureSpec};
use crate::domain::FeatureRecord;

/// A record paired with its transient benchmark score.
///
/// The record itself is never modified; `indexed_score` only exists while a
/// benchmark is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<'a, R> {
    pub record: &'a R,
    pub indexed_score: Option<f64>,
}

impl<'a, R: FeatureRecord> Ranked<'a, R> {
    pub fn unindexed(record: &'a R) -> Self {
        Self { record, indexed_score: None }
    }

    pub fn display_score(&self) -> f64 {
        display_score(self.record, self.indexed_score)
    }
}

/// Re-scores `records` against the selected benchmark and sorts them best first.
///
/// The composite selection, or a benchmark without a vector, keeps the input order
/// and attaches no indexed scores.
pub fn reindex<'a, R>(
    records: &'a [R],
    selection: &Selection,
    vectors: &VectorMap,
    specs: &[FeatureSpec],
    stats: &FeatureStatistics,
) -> Vec<Ranked<'a, R>>
where
    R: FeatureRecord,
{
    let Some(benchmark_vector) = selection.benchmark().and_then(|name| vectors.get(name)) else {
        return records.iter().map(Ranked::unindexed).collect();
    };

    let mut ranked: Vec<Ranked<'a, R>> = records
        .iter()
        .map(|record| Ranked {
            record,
            indexed_score: Some(index_score(record, benchmark_vector, specs, stats)),
        })
        .collect();

    ranked.sort_by(|a, b| b.display_score().total_cmp(&a.display_score()));
    ranked
}

fn index_score<R>(record: &R, benchmark: &NormalizedVector, specs: &[FeatureSpec], stats: &FeatureStatistics) -> f64
where
    R: FeatureRecord + ?Sized,
{
    let vector = build_vector(record, specs, stats);
    score_from_similarity(cosine_similarity(&vector, benchmark))
}

/// Current score of a record: the indexed score when one is attached, else its
/// first present precomputed score, else 0
pub fn display_score<R>(record: &R, indexed_score: Option<f64>) -> f64
where
    R: FeatureRecord + ?Sized,
{
    indexed_score.unwrap_or_else(|| composite_score(record))
}

pub fn composite_score<R>(record: &R) -> f64
where
    R: FeatureRecord + ?Sized,
{
    COMPOSITE_SCORE_ORDER
        .iter()
        .find_map(|&field| record.score_field(field).filter(|s| s.is_finite()))
        .unwrap_or(0.0)
}
