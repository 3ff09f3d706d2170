//! Runs the post-render scripts collected from `execute` blocks.

use crate::context::RenderContext;
use crate::error::ApiError;
use crate::execution::output::ColoredOutput;
use crate::execution::shell::ShellExecutor;
use std::sync::Arc;
use tracing::{debug, info};

const ABBREVIATE_LENGTH: usize = 50;

pub struct PostActionRunner {
    dry: bool,
    print_full_scripts: bool,
    shell: Arc<dyn ShellExecutor>,
    output: ColoredOutput,
}

impl PostActionRunner {
    pub fn new(
        dry: bool,
        print_full_scripts: bool,
        shell: Arc<dyn ShellExecutor>,
        output: ColoredOutput,
    ) -> Self {
        Self {
            dry,
            print_full_scripts,
            shell,
            output,
        }
    }

    /// Run every post script in context order, stopping at the first failure.
    pub fn run(&self, context: &RenderContext) -> Result<(), ApiError> {
        for script in context.all_post_scripts() {
            if self.dry {
                let shown = if self.print_full_scripts {
                    script.clone()
                } else {
                    abbreviate(script)
                };
                self.output.status("Would run", shown);
                continue;
            }

            self.output.status("Running", abbreviate(script));
            let result = self.shell.run_file(script).map_err(|e| {
                ApiError::distribution(format!("Error running '{}'", abbreviate(script)), e)
            })?;
            debug!(code = result.code, "Post script finished");
            if !result.stdout.is_empty() {
                self.output.detail(&result.stdout);
            }
            if !result.success() {
                return Err(ApiError::PostScriptFailed {
                    script: abbreviate(script),
                    code: result.code,
                });
            }
        }
        info!(count = context.all_post_scripts().len(), dry = self.dry, "Post scripts done");
        Ok(())
    }
}

/// The first 50 characters, with newlines shown as ` ⏎ `.
pub fn abbreviate(script: &str) -> String {
    script
        .chars()
        .take(ABBREVIATE_LENGTH)
        .collect::<String>()
        .replace('\n', " ⏎ ")
}
