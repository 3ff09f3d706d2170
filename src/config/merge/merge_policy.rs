//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace scalar values and whole lists of earlier ones; maps are merged key by
//! key. Order: defaults, global file, project file, environment.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Prefix of environment overrides, e.g. `CONFIGURATOR_RENDER__WORKER_THREADS=4`.
pub const ENV_PREFIX: &str = "CONFIGURATOR";

/// Separator between nested keys in environment overrides.
pub const ENV_SEPARATOR: &str = "__";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("shell.program", crate::execution::shell::DEFAULT_SHELL)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}

/// Environment variable source following the override naming scheme.
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}
