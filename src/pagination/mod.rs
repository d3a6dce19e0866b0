mod config;

pub use config::{Page, PaginationConfig};
