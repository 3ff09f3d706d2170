//! CLI parse: clap types for configurator. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Configurator - renders templated config files in phases
#[derive(Parser, Debug, Clone)]
#[command(name = "configurator", version)]
#[command(about = "Configuration made complex: renders templated dotfiles in ordered phases")]
pub struct Cli {
    /// Run without altering any files
    #[arg(short = 'd', long)]
    pub dry: bool,

    /// Print whole file contents and scripts when running in dry mode
    #[arg(short = 'f', long = "print-contents")]
    pub print_contents: bool,

    /// Do not color the output
    #[arg(short = 'n', long = "strip-color")]
    pub strip_color: bool,

    /// Print the final context after all phases were rendered
    #[arg(short = 'c', long = "print-context")]
    pub print_context: bool,

    /// Keep the actions directory and any manually added actions in it
    #[arg(short = 'p', long = "preserve-actions-dir")]
    pub preserve_actions_dir: bool,

    /// Report every parse error, even ones that might just be text resembling a command
    #[arg(short = 'r', long = "report-parse-errors")]
    pub report_parse_errors: bool,

    /// Template directory containing the .configurator file (default: current directory)
    #[arg(short = 't', long = "target-dir", value_parser = existing_directory)]
    pub target_dir: Option<PathBuf>,

    /// Global configuration file (replaces the user-wide config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The template directory, defaulting to the working directory.
    pub fn target_dir(&self) -> PathBuf {
        self.target_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn existing_directory(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!(
            "The given target path {} is no directory or does not exist!",
            path.display()
        ))
    }
}
