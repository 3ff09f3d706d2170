//! CLI route: run context wiring configuration, rendering and distribution.

use crate::cli::parse::Cli;
use crate::cli::presentation::format_context_report;
use crate::config::{ConfigLoader, ConfiguratorConfig};
use crate::context::RenderContext;
use crate::error::ApiError;
use crate::execution::{
    ActionDistributor, ColoredOutput, DirBasedActionDistributor, FileDistributor,
    FileSystemFileDistributor, PostActionRunner,
};
use crate::phases::{Reactor, RenderTargetCollector};
use crate::render::{RenderServices, RenderedFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runtime context for one invocation: the template directory and its loaded configuration.
pub struct RunContext {
    target_dir: PathBuf,
    config: ConfiguratorConfig,
    services: Arc<RenderServices>,
}

impl RunContext {
    /// Load the configuration for `target_dir`. `global_config` replaces the user-wide file and
    /// must exist when given.
    pub fn new(target_dir: PathBuf, global_config: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut loader = ConfigLoader::new(&target_dir);
        if let Some(path) = global_config {
            if !path.is_file() {
                return Err(ApiError::ConfigError(format!(
                    "Config file {} not found",
                    path.display()
                )));
            }
            loader = loader.with_global_file(Some(path));
        }
        let config = loader.build()?;
        Ok(Self::with_config(target_dir, config))
    }

    pub fn with_config(target_dir: PathBuf, config: ConfiguratorConfig) -> Self {
        let services = Arc::new(config.render_services());
        Self {
            target_dir,
            config,
            services,
        }
    }

    /// Replace the shell and script collaborators.
    pub fn with_services(mut self, services: RenderServices) -> Self {
        self.services = Arc::new(services);
        self
    }

    pub fn config(&self) -> &ConfiguratorConfig {
        &self.config
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Render all phases, then distribute files and actions and run post scripts.
    ///
    /// Returns the context report when `--print-context` was given.
    pub fn execute(&self, cli: &Cli) -> Result<Option<String>, ApiError> {
        let started = Instant::now();
        let (files, context) = self.render(cli.report_parse_errors)?;

        let output = ColoredOutput::new(!cli.strip_color);
        if cli.dry {
            output.banner("Execution plan");
        }

        FileSystemFileDistributor::new(cli.dry, cli.print_contents, output)
            .distribute_files(&files)?;
        DirBasedActionDistributor::new(
            cli.dry,
            cli.print_contents,
            cli.preserve_actions_dir,
            output,
        )
        .distribute_actions(&context)?;

        if cli.dry {
            output.banner("Post scripts");
        }
        PostActionRunner::new(
            cli.dry,
            cli.print_contents,
            Arc::clone(&self.services.shell),
            output,
        )
        .run(&context)?;

        info!(
            files = files.len(),
            dry = cli.dry,
            duration_ms = started.elapsed().as_millis() as u64,
            "Run finished"
        );

        if cli.print_context {
            return Ok(Some(format_context_report(&context, output)));
        }
        Ok(None)
    }

    /// Collect templates and render every phase on a fresh multi-threaded runtime.
    pub fn render(
        &self,
        report_parse_errors: bool,
    ) -> Result<(Vec<RenderedFile>, RenderContext), ApiError> {
        let targets = RenderTargetCollector::new(&self.target_dir, report_parse_errors).collect()?;
        let reactor = Reactor::new(
            self.config.phase_list(),
            targets,
            self.config.worker_pool(),
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let rendered = runtime.block_on(reactor.render_all(RenderContext::new(), &self.services))?;
        Ok(rendered)
    }
}
