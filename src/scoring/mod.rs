pub mod benchmarks;
pub mod context;
pub mod deviation;
pub mod normalization;
pub mod reindex;
pub mod similarity;
pub mod thresholds;
pub mod types;

pub use context::ScoringContext;
pub use reindex::{Ranked, composite_score, display_score};
pub use types::{BenchmarkProfile, FeatureStat, Selection, Tier, ZScore, ZoneThresholds};
