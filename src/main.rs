//! Wellcast: burnout risk and wellbeing modelling CLI
//!
//! Runs exploratory analysis on the Gen-Z mental wellness survey and trains a
//! burnout risk classifier and a wellbeing index regressor on it.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wellcast::cli::Cli;
use wellcast::run_pipeline;
use wellcast::utils::{print_banner, print_completion, print_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = cli.pipeline_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let start = Instant::now();
    let outcome = run_pipeline(&config)?;
    tracing::info!(
        artifacts = outcome.artifacts.len(),
        accuracy = outcome.classification.accuracy,
        mae = outcome.regression.mae,
        "pipeline finished"
    );

    print_completion(start.elapsed());
    Ok(())
}
