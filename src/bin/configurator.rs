//! Configurator CLI Binary
//!
//! Renders the templates of a directory in phases and writes the results.

use clap::Parser;
use configurator::cli::{map_error, Cli, RunContext};
use configurator::config::ConfigLoader;
use configurator::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(target_dir = %cli.target_dir().display(), "Configurator starting");

    let context = match RunContext::new(cli.target_dir(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli) {
        Ok(Some(report)) => println!("{}", report),
        Ok(None) => {}
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Logging settings from the config files, overridden by command line flags.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::new(cli.target_dir())
        .build()
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    if cli.strip_color {
        config.color = false;
    }

    config
}
