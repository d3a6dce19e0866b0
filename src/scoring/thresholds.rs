use super::reindex::Ranked;
use super::types::{Tier, ZoneThresholds};
use crate::config::settings::ScoringSettings;
use crate::domain::FeatureRecord;

impl ZoneThresholds {
    pub fn fallback(settings: &ScoringSettings) -> Self {
        Self {
            high: settings.zone_fallback_high,
            mid: settings.zone_fallback_mid,
        }
    }

    pub fn classify(&self, score: f64) -> Tier {
        if score >= self.high {
            Tier::Prime
        } else if score >= self.mid {
            Tier::Strong
        } else {
            Tier::Emerging
        }
    }
}

/// Tertile cut points over the display scores of the zones currently shown
pub fn compute_thresholds<R>(zones: &[Ranked<'_, R>], settings: &ScoringSettings) -> ZoneThresholds
where
    R: FeatureRecord,
{
    let scores = zones.iter().map(Ranked::display_score).collect();
    thresholds_from_scores(scores, settings)
}

/// Positional percentiles (no interpolation) over ascending scores
pub fn thresholds_from_scores(mut scores: Vec<f64>, settings: &ScoringSettings) -> ZoneThresholds {
    if scores.len() < settings.min_zones_for_percentiles {
        return ZoneThresholds::fallback(settings);
    }

    scores.sort_by(f64::total_cmp);

    ZoneThresholds {
        high: score_at(&scores, settings.zone_high_percentile),
        mid: score_at(&scores, settings.zone_mid_percentile),
    }
}

fn score_at(sorted: &[f64], percentile: f64) -> f64 {
    let index = (sorted.len() as f64 * percentile).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Fixed-cut tier for tract and twin scores
pub fn classify_score(score: f64, settings: &ScoringSettings) -> Tier {
    if score >= settings.prime_threshold {
        Tier::Prime
    } else if score >= settings.strong_threshold {
        Tier::Strong
    } else {
        Tier::Emerging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ZoneRecord;

    #[test]
    fn test_tertiles_by_position() {
        let settings = ScoringSettings::default();
        let scores = vec![100.0, 10.0, 90.0, 20.0, 80.0, 30.0, 70.0, 40.0, 60.0, 50.0];

        let thresholds = thresholds_from_scores(scores, &settings);

        assert_eq!(thresholds, ZoneThresholds { high: 70.0, mid: 40.0 });
    }

    #[test]
    fn test_small_populations_use_fallback() {
        let settings = ScoringSettings::default();

        let thresholds = thresholds_from_scores(vec![90.0, 10.0], &settings);

        assert_eq!(thresholds, ZoneThresholds { high: 50.0, mid: 35.0 });
        assert_eq!(thresholds_from_scores(Vec::new(), &settings), ZoneThresholds::fallback(&settings));
    }

    #[test]
    fn test_thresholds_from_zone_display_scores() {
        let settings = ScoringSettings::default();
        let zones: Vec<ZoneRecord> = [12.0, 48.0, 33.0]
            .iter()
            .map(|&s| ZoneRecord { avg_score: Some(s), ..Default::default() })
            .collect();
        let ranked: Vec<_> = zones.iter().map(Ranked::unindexed).collect();

        let thresholds = compute_thresholds(&ranked, &settings);

        assert_eq!(thresholds, ZoneThresholds { high: 48.0, mid: 12.0 });
    }

    #[test]
    fn test_zone_classification_bands() {
        let thresholds = ZoneThresholds { high: 70.0, mid: 40.0 };

        assert_eq!(thresholds.classify(70.0), Tier::Prime);
        assert_eq!(thresholds.classify(69.9), Tier::Strong);
        assert_eq!(thresholds.classify(40.0), Tier::Strong);
        assert_eq!(thresholds.classify(39.9), Tier::Emerging);
    }

    #[test]
    fn test_fixed_tract_tiers() {
        let settings = ScoringSettings::default();

        assert_eq!(classify_score(75.0, &settings), Tier::Prime);
        assert_eq!(classify_score(60.0, &settings), Tier::Strong);
        assert_eq!(classify_score(59.9, &settings), Tier::Emerging);
    }
}
