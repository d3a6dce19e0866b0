use anyhow::Result;

use expansion_atlas::cli::Command;
use expansion_atlas::{
    RankOptions, handle_benchmarks, handle_completions, handle_deviations, handle_rank, handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Serve { port, data_dir } => handle_serve(port, data_dir),
        Command::Rank {
            dataset,
            benchmark,
            state,
            min_score,
            limit,
            data_dir,
        } => handle_rank(
            RankOptions {
                dataset,
                benchmark,
                state,
                min_score,
                limit,
            },
            data_dir,
        ),
        Command::Benchmarks { data_dir } => handle_benchmarks(data_dir),
        Command::Deviations {
            record,
            benchmark,
            data_dir,
        } => handle_deviations(&record, &benchmark, data_dir),
        Command::Completions { shell } => handle_completions(shell),
    }
}
