use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, ZoneParams, deviation_rows};
use crate::api::models::{SurveyResponse, ZoneItem, ZoneListResponse};
use crate::services::atlas::ZoneQuery;

pub async fn get_zones(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneParams>,
) -> impl IntoResponse {
    let selection = state.atlas.selection(params.benchmark.as_deref());
    let query = ZoneQuery {
        state: params.state,
        size_class: params.size_class,
        search: params.search,
        min_score: params.min_score.unwrap_or(0.0),
        page: params.page,
        page_size: params.page_size,
    };
    let clamp = state.config.scoring.deviation_display_clamp;

    let view = state.atlas.zone_view(&selection, &query);
    let offset = view.page.offset();

    let items = view
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let zone = item.record;
            ZoneItem {
                rank: offset.saturating_add(i + 1),
                zone_name: zone.zone_name.clone(),
                cluster_id: zone.cluster_id,
                state: zone.state.clone(),
                lat: zone.lat,
                lng: zone.lng,
                total_pop: zone.total_pop,
                tract_count: zone.tract_count(),
                size_class: zone.size_class.clone(),
                score: item.score,
                tier: item.tier,
                tracts: zone.tracts.clone(),
                summary: zone.summary.clone(),
                anchors: zone.anchors.clone(),
                deviations: deviation_rows(item.deviations, clamp),
            }
        })
        .collect();

    Json(ZoneListResponse {
        benchmark: selection.benchmark().map(str::to_string),
        items,
        summary: view.summary.into(),
        range: view.range.into(),
        thresholds: view.thresholds,
        page: view.page.number,
        page_size: view.page.size,
        total_pages: view.total_pages,
    })
}

pub async fn get_zone_survey(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let survey = state.atlas.cluster_survey();

    Json(SurveyResponse {
        clusters: survey.clusters,
        solo_zones: survey.solo_zones,
        total_population: survey.total_population,
        total_tracts: survey.total_tracts,
    })
}
