//! Project config file source: `<target dir>/.configurator` (YAML)

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use config::FileFormat;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE_NAME: &str = ".configurator";

pub fn project_config_path(target_dir: &Path) -> PathBuf {
    target_dir.join(PROJECT_FILE_NAME)
}

/// Add the project file to the builder. The file is required.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).format(FileFormat::Yaml).required(true))
}
