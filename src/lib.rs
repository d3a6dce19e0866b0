pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod errors;
pub mod pagination;
pub mod scoring;
pub mod services;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::{ColoredString, Colorize};
use log::warn;
use std::path::PathBuf;

use crate::cli::{Command, Dataset};
use crate::config::features::{deviation_feature, similarity_keys};
use crate::config::settings::AppConfig;
use crate::domain::FeatureRecord;
use crate::scoring::{Selection, Tier};
use crate::services::atlas::{AtlasService, TractQuery, TwinQuery, ZoneQuery};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16, data_dir: Option<PathBuf>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new().with_data_dir(data_dir);
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub struct RankOptions {
    pub dataset: Dataset,
    pub benchmark: Option<String>,
    pub state: Option<String>,
    pub min_score: f64,
    pub limit: usize,
}

pub fn handle_rank(options: RankOptions, data_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::new().with_data_dir(data_dir);
    let atlas = load_atlas(&config)?;
    let selection = checked_selection(&atlas, options.benchmark.as_deref());

    let rows: Vec<(String, String, f64, Tier)> = match options.dataset {
        Dataset::Tracts => {
            let query = TractQuery { state: options.state, min_score: options.min_score };
            let view = atlas.tract_view(&selection, &query);
            view.items
                .into_iter()
                .map(|i| (i.record.display_name(), i.record.state.clone(), i.score, i.tier))
                .collect()
        }
        Dataset::Twins => {
            let query = TwinQuery { property_type: None, state: options.state, min_score: options.min_score };
            let view = atlas.twin_view(&selection, &query);
            view.items
                .into_iter()
                .map(|i| (i.record.label(), i.record.state.clone(), i.score, i.tier))
                .collect()
        }
        Dataset::Zones => {
            let query = ZoneQuery {
                state: options.state,
                size_class: None,
                search: None,
                min_score: options.min_score,
                page: Some(1),
                page_size: Some(options.limit),
            };
            let view = atlas.zone_view(&selection, &query);
            view.items
                .into_iter()
                .map(|i| (i.record.zone_name.clone(), i.record.state.clone(), i.score, i.tier))
                .collect()
        }
    };

    if rows.is_empty() {
        println!("No records match the given filters");
        return Ok(());
    }

    let indexed = match selection.benchmark() {
        Some(name) => format!("indexed to {}", name),
        None => "composite".to_string(),
    };
    println!("{}", format!("Top {:?} ({})", options.dataset, indexed).bold());

    for (rank, (label, state, score, tier)) in rows.into_iter().take(options.limit).enumerate() {
        println!("{:>3}. {:>5.1}  {:<14} {:<3} {}", rank + 1, score, tier_badge(tier), state, label);
    }
    Ok(())
}

pub fn handle_benchmarks(data_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::new().with_data_dir(data_dir);
    let atlas = load_atlas(&config)?;

    let benchmarks = atlas.benchmarks();
    if benchmarks.is_empty() {
        println!("No benchmarks loaded");
        return Ok(());
    }

    for (benchmark, profile) in benchmarks {
        let kind = benchmark.property_type.as_deref().unwrap_or("unknown type");
        println!("{} ({})", benchmark.name.bold(), kind);
        if let Some(profile) = profile {
            for feature in similarity_keys() {
                if let Some(value) = profile.feature(feature) {
                    println!("    {:<24} {:.2}", feature, value);
                }
            }
        }
    }
    Ok(())
}

pub fn handle_deviations(record: &str, benchmark: &str, data_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::new().with_data_dir(data_dir);
    let atlas = load_atlas(&config)?;

    let Some(found) = atlas.find_record(record) else {
        bail!("No record matches '{}'", record);
    };
    let selection = atlas.selection(Some(benchmark));
    if !matches!(&selection, Selection::Benchmark(name) if atlas.context().profile(name).is_some()) {
        bail!("Unknown benchmark '{}'", benchmark);
    }

    let profile = selection.benchmark().and_then(|name| atlas.context().profile(name));

    println!("{} vs {}", found.label().bold(), benchmark.bold());
    let clamp = config.scoring.deviation_display_clamp;
    for z in atlas.deviations(&found, &selection) {
        let shown = |value: Option<f64>| match (deviation_feature(z.key), value) {
            (Some(feature), Some(value)) => feature.format_value(value),
            _ => "-".to_string(),
        };
        let own = shown(found.feature(z.key));
        let reference = shown(profile.and_then(|p| p.feature(z.key)));

        let value = format!("{:+.2}", z.value);
        let value = if z.clamped(clamp).abs() >= 1.0 { value.red() } else { value.normal() };
        println!("    {:<10} {:>10} {:>10}  {}", z.label, own, reference, value);
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn load_atlas(config: &AppConfig) -> Result<AtlasService> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(AtlasService::load(config)))
}

fn checked_selection(atlas: &AtlasService, benchmark: Option<&str>) -> Selection {
    let selection = atlas.selection(benchmark);
    let requested = !atlas.context().selection(benchmark).is_composite();
    if requested && selection.is_composite() {
        warn!("Unknown benchmark '{}', showing composite scores", benchmark.unwrap_or_default());
    }
    selection
}

fn tier_badge(tier: Tier) -> ColoredString {
    match tier {
        Tier::Prime => tier.label().green().bold(),
        Tier::Strong => tier.label().yellow(),
        Tier::Emerging => tier.label().dimmed(),
    }
}
