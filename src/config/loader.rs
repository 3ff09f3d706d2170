//! Layered configuration loading.

use super::merge::merge_policy;
use super::sources::{global_file, project_file};
use super::ConfiguratorConfig;
use crate::error::ApiError;
use std::path::PathBuf;
use tracing::debug;

/// Loads the configuration for one template directory.
///
/// Layers, lowest precedence first: defaults, the global file, the project file, environment
/// variables.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    target_dir: PathBuf,
    global_file: Option<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            global_file: global_file::global_config_path(),
            use_environment: true,
        }
    }

    /// Replace the global file location. `None` skips the global layer.
    pub fn with_global_file(mut self, path: Option<PathBuf>) -> Self {
        self.global_file = path;
        self
    }

    pub fn with_environment(mut self, use_environment: bool) -> Self {
        self.use_environment = use_environment;
        self
    }

    /// Merge all layers and validate the result.
    pub fn build(&self) -> Result<ConfiguratorConfig, ApiError> {
        let project_path = project_file::project_config_path(&self.target_dir);
        if !project_path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "No {} file found in {}",
                project_file::PROJECT_FILE_NAME,
                self.target_dir.display()
            )));
        }

        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder, self.global_file.as_deref());
        builder = project_file::add_to_builder(builder, &project_path);
        if self.use_environment {
            builder = builder.add_source(merge_policy::environment());
        }

        let config: ConfiguratorConfig = builder.build()?.try_deserialize()?;
        debug!(
            project_file = %project_path.display(),
            phases = config.phases.len(),
            "Loaded configuration"
        );

        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new(dir)
            .with_global_file(None)
            .with_environment(false)
    }

    #[test]
    fn test_load_project_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".configurator"), "phases:\n  - base\n  - apps\n").unwrap();

        let config = loader(dir.path()).build().unwrap();
        assert_eq!(config.phases, vec!["base", "apps"]);
        assert_eq!(config.shell.program, "/bin/sh");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_project_file() {
        let dir = TempDir::new().unwrap();
        let err = loader(dir.path()).build().unwrap_err();
        assert!(err.to_string().contains("No .configurator file found"));
    }

    #[test]
    fn test_project_file_overrides_global_file() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[shell]\nprogram = \"/bin/bash\"\n\n[render]\nworker_threads = 2\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(".configurator"),
            "phases: [base]\nrender:\n  worker_threads: 8\n",
        )
        .unwrap();

        let config = loader(dir.path())
            .with_global_file(Some(global))
            .build()
            .unwrap();
        assert_eq!(config.shell.program, "/bin/bash");
        assert_eq!(config.render.worker_threads, Some(8));
    }

    #[test]
    fn test_missing_global_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".configurator"), "phases: [base]\n").unwrap();
        let config = loader(dir.path())
            .with_global_file(Some(dir.path().join("absent.toml")))
            .build()
            .unwrap();
        assert_eq!(config.phases, vec!["base"]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".configurator"), "phases: [a, a]\n").unwrap();
        let err = loader(dir.path()).build().unwrap_err();
        assert!(err.to_string().contains("Duplicate phase 'a'"));
    }
}
