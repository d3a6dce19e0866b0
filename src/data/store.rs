use anyhow::Result;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::cleaning::clean_records;
use super::datasets::Datasets;
use crate::config::settings::DataSettings;
use crate::domain::{Benchmark, TractRecord, TwinDataset, TwinRecord, ZoneRecord};
use crate::errors::{with_parse_context, with_read_context};

/// File-based store for the three precomputed atlas datasets
pub struct DatasetStore {
    data_dir: PathBuf,
    settings: DataSettings,
}

impl DatasetStore {
    pub fn new(settings: DataSettings) -> Self {
        Self {
            data_dir: settings.data_dir.clone(),
            settings,
        }
    }

    /// Loads all three datasets concurrently and waits for every one of them
    pub async fn load_all(&self) -> Datasets {
        let (tracts, twins, zones) = tokio::join!(self.load_tracts(), self.load_twins(), self.load_zones());
        Datasets::new(tracts, twins, zones)
    }

    pub async fn load_tracts(&self) -> Vec<TractRecord> {
        let path = self.data_dir.join(self.settings.tracts_file);
        let records: Vec<TractRecord> = self.load_record_array(&path, "demographic targets").await;
        if !records.is_empty() {
            info!("Loaded {} demographic targets", records.len());
        }
        records
    }

    pub async fn load_zones(&self) -> Vec<ZoneRecord> {
        let path = self.data_dir.join(self.settings.zones_file);
        let records: Vec<ZoneRecord> = self.load_record_array(&path, "hot zones").await;
        if !records.is_empty() {
            info!("Loaded {} hot zones", records.len());
        }
        records
    }

    pub async fn load_twins(&self) -> TwinDataset {
        let path = self.data_dir.join(self.settings.twins_file);
        let document = match self.read_json_opt(&path).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                warn!("Dataset not found: {}", path.display());
                return TwinDataset::default();
            }
            Err(e) => {
                warn!("{:#}", e);
                return TwinDataset::default();
            }
        };

        let twins: Vec<TwinRecord> = self.parse_records(array_field(&document, "twins"), "property twins");
        if twins.is_empty() {
            return TwinDataset::default();
        }
        let benchmarks: Vec<Benchmark> = self.parse_records(array_field(&document, "benchmarks"), "benchmarks");

        info!("Loaded {} property twins and {} benchmarks", twins.len(), benchmarks.len());
        TwinDataset { benchmarks, twins }
    }

    async fn load_record_array<T: DeserializeOwned>(&self, path: &Path, data_type: &str) -> Vec<T> {
        match self.read_json_opt(path).await {
            Ok(Some(Value::Array(values))) => self.parse_records(values, data_type),
            Ok(Some(_)) => {
                warn!("Expected a JSON array of {} in {}", data_type, path.display());
                Vec::new()
            }
            Ok(None) => {
                warn!("Dataset not found: {}", path.display());
                Vec::new()
            }
            Err(e) => {
                warn!("{:#}", e);
                Vec::new()
            }
        }
    }

    /// Cleans sentinels and keeps every record that parses
    fn parse_records<T: DeserializeOwned>(&self, mut values: Vec<Value>, data_type: &str) -> Vec<T> {
        clean_records(&mut values, self.settings.missing_sentinel);

        let total = values.len();
        let records: Vec<T> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed record in {}: {}", data_type, e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            warn!("Kept {}/{} {} records", records.len(), total, data_type);
        }
        records
    }

    async fn read_json_opt(&self, path: &Path) -> Result<Option<Value>> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(None);
        }

        let json = with_read_context(tokio::fs::read_to_string(path).await, path)?;
        let data = with_parse_context(serde_json::from_str(&json), &path.display().to_string())?;
        Ok(Some(data))
    }
}

fn array_field(document: &Value, key: &str) -> Vec<Value> {
    document
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
