//! Writing rendered files and action scripts to disk.
//!
//! Both distributors support a dry mode that only reports what would be written.

use crate::context::{RenderContext, RenderedAction};
use crate::error::ApiError;
use crate::execution::inbuilt;
use crate::execution::output::ColoredOutput;
use crate::execution::ACTIONS_DIR_KEY;
use crate::render::{expand_home, RenderedFile};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub trait FileDistributor {
    fn distribute_files(&self, files: &[RenderedFile]) -> Result<(), ApiError>;
}

pub trait ActionDistributor {
    fn distribute_actions(&self, context: &RenderContext) -> Result<(), ApiError>;
}

pub struct FileSystemFileDistributor {
    dry: bool,
    print_contents: bool,
    output: ColoredOutput,
}

impl FileSystemFileDistributor {
    pub fn new(dry: bool, print_contents: bool, output: ColoredOutput) -> Self {
        Self {
            dry,
            print_contents,
            output,
        }
    }

    fn write(&self, file: &RenderedFile) -> Result<(), ApiError> {
        if let Some(parent) = file.target_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if self.dry {
                    self.output.status("Creating dir", parent.display());
                } else {
                    fs::create_dir_all(parent).map_err(|e| {
                        ApiError::distribution(
                            format!("Error creating directory {}", parent.display()),
                            e,
                        )
                    })?;
                }
            }
        }

        if self.dry {
            self.output
                .status("Writing file to", file.target_path.display());
            if self.print_contents {
                self.output.detail(&file.content);
            }
            return Ok(());
        }

        debug!(source = %file.source.display(), target = %file.target_path.display(), "Writing file");
        fs::write(&file.target_path, &file.content).map_err(|e| {
            ApiError::distribution(
                format!("Error writing file {}", file.target_path.display()),
                e,
            )
        })
    }
}

impl FileDistributor for FileSystemFileDistributor {
    fn distribute_files(&self, files: &[RenderedFile]) -> Result<(), ApiError> {
        for file in files {
            self.write(file)?;
        }
        info!(count = files.len(), dry = self.dry, "Distributed files");
        Ok(())
    }
}

/// Writes every action as an executable file into the `actions_dir` directory.
pub struct DirBasedActionDistributor {
    dry: bool,
    print_contents: bool,
    preserve_actions_dir: bool,
    output: ColoredOutput,
}

impl DirBasedActionDistributor {
    pub fn new(
        dry: bool,
        print_contents: bool,
        preserve_actions_dir: bool,
        output: ColoredOutput,
    ) -> Self {
        Self {
            dry,
            print_contents,
            preserve_actions_dir,
            output,
        }
    }

    /// Templated actions and reload actions, followed by the inbuilt ones.
    fn collect_actions(context: &RenderContext, base_dir: &Path) -> Vec<RenderedAction> {
        let resolve = |action: &RenderedAction| base_dir.join(&action.sanitized_name);

        let mut actions: Vec<RenderedAction> = context.all_actions().cloned().collect();
        actions.extend(context.all_reload_actions().iter().cloned());

        let mut launchable: Vec<RenderedAction> = context.all_actions().cloned().collect();
        if !context.all_reload_actions().is_empty() {
            let reload_all = inbuilt::reload_all(context.all_reload_actions(), resolve);
            launchable.push(reload_all.clone());
            actions.push(reload_all);
        }
        actions.push(inbuilt::run_action(&launchable, resolve));
        actions
    }

    fn prepare_dir(&self, base_dir: &Path) -> Result<(), ApiError> {
        if base_dir.exists() && !self.preserve_actions_dir {
            if self.dry {
                self.output.status("Deleting dir", base_dir.display());
            } else {
                fs::remove_dir_all(base_dir).map_err(|e| {
                    ApiError::distribution(
                        format!("Error deleting actions dir {}", base_dir.display()),
                        e,
                    )
                })?;
            }
        }

        if self.dry {
            if !base_dir.exists() || !self.preserve_actions_dir {
                self.output.status("Creating dir", base_dir.display());
            }
            return Ok(());
        }

        fs::create_dir_all(base_dir).map_err(|e| {
            ApiError::distribution(
                format!("Error creating actions dir {}", base_dir.display()),
                e,
            )
        })?;
        if !base_dir.is_dir() {
            return Err(ApiError::distribution(
                "Error distributing actions",
                std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("{} is no directory", base_dir.display()),
                ),
            ));
        }
        Ok(())
    }

    fn write_action(&self, path: &Path, action: &RenderedAction) -> Result<(), ApiError> {
        if self.dry {
            self.output
                .status(&format!("Writing action '{}' to", action.name), path.display());
            if self.print_contents {
                self.output.detail(&action.content);
            }
            return Ok(());
        }

        let write = || -> std::io::Result<()> {
            fs::write(path, &action.content)?;
            super::make_executable(path)
        };
        write().map_err(|e| {
            ApiError::distribution(format!("Error writing action '{}'", action.name), e)
        })
    }
}

impl ActionDistributor for DirBasedActionDistributor {
    fn distribute_actions(&self, context: &RenderContext) -> Result<(), ApiError> {
        if context.all_actions().next().is_none() && context.all_reload_actions().is_empty() {
            return Ok(());
        }

        let dir = context
            .get_value_opt(ACTIONS_DIR_KEY)
            .ok_or_else(|| ApiError::MissingValue(ACTIONS_DIR_KEY.to_string()))?
            .to_string();
        let base_dir: PathBuf = expand_home(&dir);

        self.prepare_dir(&base_dir)?;

        let actions = Self::collect_actions(context, &base_dir);
        for action in &actions {
            self.write_action(&base_dir.join(&action.sanitized_name), action)?;
        }
        info!(count = actions.len(), dir = %base_dir.display(), dry = self.dry, "Distributed actions");
        Ok(())
    }
}
