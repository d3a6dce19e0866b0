use axum::{Router, routing::get};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    atlas::{get_benchmarks, get_overview, get_tracts, get_twins},
    zones::{get_zone_survey, get_zones},
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/overview", get(get_overview))
        .route("/api/benchmarks", get(get_benchmarks))
        .route("/api/tracts", get(get_tracts))
        .route("/api/twins", get(get_twins))
        .route("/api/zones", get(get_zones))
        .route("/api/zones/survey", get(get_zone_survey))
        .with_state(state)
}
