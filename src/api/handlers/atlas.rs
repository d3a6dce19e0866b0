use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, TractParams, TwinParams, deviation_rows};
use crate::api::models::{BenchmarkItem, ListResponse, OverviewResponse, TractItem, TwinItem};
use crate::domain::FeatureRecord;
use crate::services::atlas::{TractQuery, TwinQuery};

pub async fn get_overview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let overview = state.atlas.overview();

    Json(OverviewResponse {
        tracts: overview.tracts,
        twins: overview.twins,
        zones: overview.zones,
        benchmarks: overview.benchmarks,
        states: overview.states.into_iter().collect(),
        loaded_at: overview.loaded_at,
    })
}

pub async fn get_benchmarks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let items: Vec<BenchmarkItem> = state
        .atlas
        .benchmarks()
        .into_iter()
        .map(|(benchmark, profile)| BenchmarkItem {
            name: benchmark.name.clone(),
            property_type: benchmark.property_type.clone(),
            lat: benchmark.lat,
            lng: benchmark.lng,
            profile: profile.map(|p| p.values.clone()),
        })
        .collect();

    Json(items)
}

pub async fn get_tracts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TractParams>,
) -> impl IntoResponse {
    let selection = state.atlas.selection(params.benchmark.as_deref());
    let query = TractQuery {
        state: params.state,
        min_score: params.min_score.unwrap_or(0.0),
    };
    let clamp = state.config.scoring.deviation_display_clamp;

    let view = state.atlas.tract_view(&selection, &query);

    let items = view
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let tract = item.record;
            TractItem {
                rank: i + 1,
                name: tract.name.clone(),
                display_name: tract.display_name(),
                tract_id: tract.tract_id.clone(),
                county: tract.county.clone(),
                state: tract.state.clone(),
                lat: tract.lat,
                lng: tract.lng,
                population: tract.population,
                score: item.score,
                tier: item.tier,
                zone_name: state.atlas.datasets().zone_name_for(tract),
                summary: tract.summary.clone(),
                anchors: tract.anchors.clone(),
                deviations: deviation_rows(item.deviations, clamp),
            }
        })
        .collect();

    Json(ListResponse {
        benchmark: selection.benchmark().map(str::to_string),
        items,
        summary: view.summary.into(),
        range: view.range.into(),
    })
}

pub async fn get_twins(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TwinParams>,
) -> impl IntoResponse {
    let selection = state.atlas.selection(params.benchmark.as_deref());
    let query = TwinQuery {
        property_type: params.property_type,
        state: params.state,
        min_score: params.min_score.unwrap_or(0.0),
    };
    let clamp = state.config.scoring.deviation_display_clamp;

    let view = state.atlas.twin_view(&selection, &query);

    let items = view
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let twin = item.record;
            TwinItem {
                rank: i + 1,
                name: twin.name.clone(),
                display_name: twin.label(),
                state: twin.state.clone(),
                lat: twin.lat,
                lng: twin.lng,
                population: twin.population,
                score: item.score,
                tier: item.tier,
                matched_property: twin.matched_property.clone(),
                property_type: twin.property_type.clone(),
                also_matches: twin.twin_matches.iter().skip(1).take(2).cloned().collect(),
                deviations: deviation_rows(item.deviations, clamp),
            }
        })
        .collect();

    Json(ListResponse {
        benchmark: selection.benchmark().map(str::to_string),
        items,
        summary: view.summary.into(),
        range: view.range.into(),
    })
}
