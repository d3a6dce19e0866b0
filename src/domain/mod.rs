mod lenient;
pub mod models;

pub use models::{
    Benchmark, FeatureRecord, Features, Record, TractRecord, TwinDataset, TwinMatch, TwinRecord,
    ZoneRecord,
};
