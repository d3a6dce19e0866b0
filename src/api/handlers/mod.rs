use serde::Deserialize;

use crate::api::models::DeviationDto;
use crate::config::settings::AppConfig;
use crate::scoring::ZScore;
use crate::services::atlas::AtlasService;

pub mod atlas;
pub mod zones;

pub struct AppState {
    pub atlas: AtlasService,
    pub config: AppConfig,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TractParams {
    pub benchmark: Option<String>,
    pub state: Option<String>,
    pub min_score: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TwinParams {
    pub benchmark: Option<String>,
    pub property_type: Option<String>,
    pub state: Option<String>,
    pub min_score: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ZoneParams {
    pub benchmark: Option<String>,
    pub state: Option<String>,
    pub size_class: Option<String>,
    pub search: Option<String>,
    pub min_score: Option<f64>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn deviation_rows(scores: Vec<ZScore>, clamp: f64) -> Vec<DeviationDto> {
    scores
        .into_iter()
        .map(|z| DeviationDto {
            label: z.label,
            key: z.key,
            bar_value: z.clamped(clamp),
            value: z.value,
        })
        .collect()
}
