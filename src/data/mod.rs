pub mod cleaning;
pub mod datasets;
pub mod store;

pub use datasets::Datasets;
pub use store::DatasetStore;
