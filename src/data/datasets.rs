use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

use crate::config::settings::ScoringSettings;
use crate::domain::{FeatureRecord, TractRecord, TwinDataset, ZoneRecord};
use crate::scoring::ScoringContext;

/// The three loaded collections, in their default display order
#[derive(Debug, Clone)]
pub struct Datasets {
    pub tracts: Vec<TractRecord>,
    pub twins: TwinDataset,
    pub zones: Vec<ZoneRecord>,
    pub loaded_at: DateTime<Utc>,
    zone_names: HashMap<i64, String>,
}

impl Datasets {
    pub fn new(mut tracts: Vec<TractRecord>, mut twins: TwinDataset, mut zones: Vec<ZoneRecord>) -> Self {
        sort_desc_by(&mut tracts, |t| t.match_score);
        sort_desc_by(&mut twins.twins, |t| t.twin_score);
        sort_desc_by(&mut zones, |z| z.avg_score);

        let zone_names = zones
            .iter()
            .filter_map(|z| z.cluster_id.map(|id| (id, z.zone_name.clone())))
            .collect();

        Self {
            tracts,
            twins,
            zones,
            loaded_at: Utc::now(),
            zone_names,
        }
    }

    /// Zone a tract belongs to, from its own tag or the cluster lookup
    pub fn zone_name_for(&self, tract: &TractRecord) -> Option<String> {
        tract
            .zone_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| tract.cluster_id.and_then(|id| self.zone_names.get(&id).cloned()))
    }

    pub fn states(&self) -> BTreeSet<String> {
        self.tracts
            .iter()
            .map(|t| t.state.clone())
            .chain(self.twins.twins.iter().map(|t| t.state.clone()))
            .chain(self.zones.iter().map(|z| z.state.clone()))
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Feature statistics span tracts and twins together; profiles come from twins
    pub fn build_context(&self, settings: ScoringSettings) -> ScoringContext {
        let population = self
            .tracts
            .iter()
            .map(|t| t as &dyn FeatureRecord)
            .chain(self.twins.twins.iter().map(|t| t as &dyn FeatureRecord));
        let matched = self.twins.twins.iter().map(|t| t as &dyn FeatureRecord);

        ScoringContext::build(population, matched, &self.twins.benchmarks, settings)
    }
}

fn sort_desc_by<T>(records: &mut [T], score: impl Fn(&T) -> Option<f64>) {
    records.sort_by(|a, b| {
        let a = score(a).unwrap_or(0.0);
        let b = score(b).unwrap_or(0.0);
        b.total_cmp(&a)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Benchmark, Features, TwinRecord};

    fn zone(name: &str, cluster: i64, score: Option<f64>) -> ZoneRecord {
        ZoneRecord {
            zone_name: name.to_string(),
            cluster_id: Some(cluster),
            state: "IL".to_string(),
            avg_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn test_collections_are_sorted_best_first() {
        let tracts = vec![
            TractRecord { name: "low".into(), match_score: Some(51.0), ..Default::default() },
            TractRecord { name: "high".into(), match_score: Some(93.0), ..Default::default() },
        ];
        let zones = vec![zone("unscored", 1, None), zone("scored", 2, Some(40.0))];

        let datasets = Datasets::new(tracts, TwinDataset::default(), zones);

        assert_eq!(datasets.tracts[0].name, "high");
        assert_eq!(datasets.zones[0].zone_name, "scored");
    }

    #[test]
    fn test_zone_name_lookup_by_cluster() {
        let datasets = Datasets::new(Vec::new(), TwinDataset::default(), vec![zone("Pilsen", 7, Some(60.0))]);
        let clustered = TractRecord { cluster_id: Some(7), ..Default::default() };
        let tagged = TractRecord { zone_name: Some("Little Village".into()), cluster_id: Some(7), ..Default::default() };

        assert_eq!(datasets.zone_name_for(&clustered).as_deref(), Some("Pilsen"));
        assert_eq!(datasets.zone_name_for(&tagged).as_deref(), Some("Little Village"));
        assert_eq!(datasets.zone_name_for(&TractRecord::default()), None);
    }

    #[test]
    fn test_context_uses_tracts_and_twins() {
        let tracts = vec![TractRecord { features: Features::new().with("pct_asian", 2.0), ..Default::default() }];
        let twins = TwinDataset {
            benchmarks: vec![Benchmark { name: "Stratford Crossing".into(), ..Default::default() }],
            twins: vec![TwinRecord {
                state: "OH".into(),
                matched_property: Some("Stratford Crossing".into()),
                features: Features::new().with("pct_asian", 6.0),
                ..Default::default()
            }],
        };

        let datasets = Datasets::new(tracts, twins, Vec::new());
        let context = datasets.build_context(ScoringSettings::default());

        assert_eq!(context.statistics()["pct_asian"].mean, 4.0);
        assert_eq!(context.profile("Stratford Crossing").unwrap().feature("pct_asian"), Some(6.0));
        assert!(datasets.states().contains("OH"));
    }
}
