use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub composite_sentinel: String,
    pub prime_threshold: f64,
    pub strong_threshold: f64,
    pub zone_high_percentile: f64,
    pub zone_mid_percentile: f64,
    pub zone_fallback_high: f64,
    pub zone_fallback_mid: f64,
    pub min_zones_for_percentiles: usize,
    pub deviation_display_clamp: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            composite_sentinel: "composite".to_string(),
            prime_threshold: 75.0,
            strong_threshold: 60.0,
            zone_high_percentile: 0.67,
            zone_mid_percentile: 0.33,
            zone_fallback_high: 50.0,
            zone_fallback_mid: 35.0,
            min_zones_for_percentiles: 3,
            deviation_display_clamp: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataSettings {
    pub data_dir: PathBuf,
    pub tracts_file: &'static str,
    pub twins_file: &'static str,
    pub zones_file: &'static str,
    pub missing_sentinel: f64,
}

impl Default for DataSettings {
    fn default() -> Self {
        let data_dir = std::env::var("ATLAS_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        Self {
            data_dir: PathBuf::from(data_dir),
            tracts_file: "expansion_targets.json",
            twins_file: "property_twins.json",
            zones_file: "hot_zones.json",
            missing_sentinel: -666666666.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub zone_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            zone_page_size: 25,
            max_page_size: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub data: DataSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scoring: ScoringSettings::default(),
            data: DataSettings::default(),
            server: ServerSettings::default(),
        }
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data.data_dir = dir;
        }
        self
    }
}
