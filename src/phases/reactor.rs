//! Runs phases in priority order, threading the context from one phase into the next.

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::phases::phase::Phase;
use crate::phases::pool::WorkerPool;
use crate::phases::renderer::MultiTargetRenderer;
use crate::render::{RenderServices, RenderTarget};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Reactor<T: RenderTarget> {
    phases: Vec<Phase>,
    renderers: BTreeMap<String, MultiTargetRenderer<T>>,
    pool: WorkerPool,
}

impl<T: RenderTarget> Reactor<T> {
    /// Build a reactor from phases and the targets registered per phase name.
    ///
    /// Phases are ordered by priority; equal priorities keep their given order. Targets for
    /// names that are not declared phases are dropped with a warning.
    pub fn new(
        mut phases: Vec<Phase>,
        targets: BTreeMap<String, Vec<T>>,
        pool: WorkerPool,
    ) -> Self {
        phases.sort_by_key(|phase| phase.priority);

        let mut renderers = BTreeMap::new();
        for (name, targets) in targets {
            if !phases.iter().any(|phase| phase.identifier == name) {
                warn!(
                    phase = %name,
                    templates = targets.len(),
                    "Templates registered for an undeclared phase will not be rendered"
                );
                continue;
            }
            renderers.insert(name, MultiTargetRenderer::new(targets, pool.clone()));
        }

        Self {
            phases,
            renderers,
            pool,
        }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Number of targets registered for `phase`.
    pub fn target_count(&self, phase: &str) -> usize {
        self.renderers.get(phase).map_or(0, MultiTargetRenderer::len)
    }

    /// Render every phase in order. Each phase starts from the context the previous one ended
    /// with; outputs are collected across all phases in phase then target order.
    pub async fn render_all(
        &self,
        initial: RenderContext,
        services: &Arc<RenderServices>,
    ) -> Result<(Vec<T::Output>, RenderContext), RenderError> {
        let empty = MultiTargetRenderer::empty(self.pool.clone());
        let mut context = initial;
        let mut outputs = Vec::new();

        for phase in &self.phases {
            let renderer = self.renderers.get(&phase.identifier).unwrap_or(&empty);
            info!(
                phase = %phase.identifier,
                priority = phase.priority,
                targets = renderer.len(),
                "Rendering phase"
            );
            let (rendered, next) = renderer.render(&context, services).await?;
            outputs.extend(rendered);
            context = next;
        }

        info!(
            phases = self.phases.len(),
            outputs = outputs.len(),
            "Rendered all phases"
        );
        Ok((outputs, context))
    }
}
