//! Configuration System
//!
//! Layered configuration for a run: built-in defaults, an optional user-wide file, the
//! `.configurator` file in the template directory and `CONFIGURATOR_` environment variables.
//! The project file declares the phases; everything else has a sensible default.

use crate::execution::{ProcessScriptEngine, ScriptEngines, SystemShell};
use crate::logging::LoggingConfig;
use crate::phases::{Phase, WorkerPool};
use crate::render::RenderServices;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

mod loader;
mod merge;
mod sources;

pub use loader::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::project_file::PROJECT_FILE_NAME;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguratorConfig {
    /// Phase names in execution order
    #[serde(default)]
    pub phases: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub shell: ShellConfig,

    /// Interpreters for `script` blocks, keyed by language tag. Entries replace the built-in
    /// `js` and `python` engines of the same name.
    #[serde(default)]
    pub scripts: HashMap<String, ScriptConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render workers per phase; defaults to the available parallelism
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Interpreter for `{{!...}}` commands and post scripts
    #[serde(default = "default_shell")]
    pub program: String,
}

fn default_shell() -> String {
    crate::execution::shell::DEFAULT_SHELL.to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_shell(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub program: String,

    /// Arguments placed before the script source
    #[serde(default)]
    pub args: Vec<String>,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Phases(String),
    Render(String),
    Shell(String),
    Script(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Phases(msg) => write!(f, "Phases: {}", msg),
            ValidationError::Render(msg) => write!(f, "Render: {}", msg),
            ValidationError::Shell(msg) => write!(f, "Shell: {}", msg),
            ValidationError::Script(language, msg) => {
                write!(f, "Script '{}': {}", language, msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ConfiguratorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.phases.is_empty() {
            errors.push(ValidationError::Phases(
                "At least one phase must be declared".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for phase in &self.phases {
            if phase.trim().is_empty() {
                errors.push(ValidationError::Phases(
                    "Phase names cannot be blank".to_string(),
                ));
            } else if !seen.insert(phase.as_str()) {
                errors.push(ValidationError::Phases(format!(
                    "Duplicate phase '{}'",
                    phase
                )));
            }
        }

        if self.render.worker_threads == Some(0) {
            errors.push(ValidationError::Render(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        if self.shell.program.trim().is_empty() {
            errors.push(ValidationError::Shell(
                "Program cannot be empty".to_string(),
            ));
        }

        let mut languages: Vec<_> = self.scripts.iter().collect();
        languages.sort_by(|a, b| a.0.cmp(b.0));
        for (language, script) in languages {
            if script.program.trim().is_empty() {
                errors.push(ValidationError::Script(
                    language.clone(),
                    "Interpreter program cannot be empty".to_string(),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Declared phases, prioritised by position.
    pub fn phase_list(&self) -> Vec<Phase> {
        Phase::from_names(&self.phases)
    }

    pub fn worker_pool(&self) -> WorkerPool {
        match self.render.worker_threads {
            Some(size) => WorkerPool::new(size),
            None => WorkerPool::with_available_parallelism(),
        }
    }

    /// Built-in script engines plus the configured ones.
    pub fn script_engines(&self) -> ScriptEngines {
        let mut engines = ScriptEngines::with_defaults();
        for (language, script) in &self.scripts {
            engines.register(
                language.clone(),
                ProcessScriptEngine::new(
                    language.clone(),
                    script.program.clone(),
                    script.args.clone(),
                ),
            );
        }
        engines
    }

    pub fn render_services(&self) -> RenderServices {
        RenderServices::new(
            Arc::new(SystemShell::new(self.shell.program.clone())),
            self.script_engines(),
        )
    }
}
