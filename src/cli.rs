use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "expansion-atlas market scoring engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Tracts,
    Twins,
    Zones,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the atlas API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Directory holding the precomputed datasets
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Print a ranked listing, optionally re-indexed against a benchmark
    Rank {
        #[arg(long, value_enum, default_value_t = Dataset::Tracts)]
        dataset: Dataset,
        /// Benchmark property to re-index against
        #[arg(short, long)]
        benchmark: Option<String>,
        /// Two-letter state filter
        #[arg(short, long)]
        state: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// List benchmark properties and their profiles
    Benchmarks {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show feature deviations of one record from a benchmark
    Deviations {
        /// Tract name, tract id or zone name
        #[arg(short, long)]
        record: String,
        #[arg(short, long)]
        benchmark: String,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
