//! Concurrent rendering of every target registered for one phase.

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::phases::pool::WorkerPool;
use crate::render::{RenderServices, RenderTarget};
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Renders a list of targets against one context snapshot.
pub struct MultiTargetRenderer<T: RenderTarget> {
    targets: Vec<Arc<T>>,
    pool: WorkerPool,
}

impl<T: RenderTarget> MultiTargetRenderer<T> {
    pub fn new(targets: Vec<T>, pool: WorkerPool) -> Self {
        Self {
            targets: targets.into_iter().map(Arc::new).collect(),
            pool,
        }
    }

    /// A renderer with nothing to do. Used for phases without templates.
    pub fn empty(pool: WorkerPool) -> Self {
        Self::new(Vec::new(), pool)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Render every target against `context`, then fold the produced contexts in target order.
    ///
    /// Each produced context is merged over the running result, so when two targets set the
    /// same key the one listed later wins no matter which finished first. The first failing
    /// target in list order is returned as the error.
    pub async fn render(
        &self,
        context: &RenderContext,
        services: &Arc<RenderServices>,
    ) -> Result<(Vec<T::Output>, RenderContext), RenderError> {
        let tasks: Vec<_> = self
            .targets
            .iter()
            .map(|target| {
                let target = Arc::clone(target);
                let snapshot = context.clone();
                let services = Arc::clone(services);
                self.pool.spawn(move || {
                    debug!(template = %target.describe(), "Rendering target");
                    target.render(&snapshot, &services)
                })
            })
            .collect();

        let mut outputs = Vec::with_capacity(tasks.len());
        let mut accumulated = context.clone();
        for result in join_all(tasks).await {
            let (output, produced) = result??;
            accumulated = produced.merge(&accumulated);
            outputs.push(output);
        }
        Ok((outputs, accumulated))
    }
}
