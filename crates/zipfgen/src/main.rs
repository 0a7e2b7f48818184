mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// zipfgen: Zipfian key-access samples and goodness-of-fit checks.
#[derive(Parser)]
#[command(name = "zipfgen", version)]
struct Args {
    /// TOML config file (defaults to ./zipfgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw samples and write one value per line
    Sample(commands::sample::SampleArgs),
    /// Print the probability mass of the top ranks
    Pmf(commands::pmf::PmfArgs),
    /// Check a sample file against the Zipf law with a KS test
    Fit(commands::fit::FitArgs),
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Samples go to stdout, so logs go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = match Config::resolve(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Command::Sample(a) => commands::sample::run(&config.sampler, &a).map(|()| true),
        Command::Pmf(a) => commands::pmf::run(&config.sampler, &a).map(|()| true),
        Command::Fit(a) => commands::fit::run(&config, &a),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "zipfgen failed");
            ExitCode::FAILURE
        }
    }
}
