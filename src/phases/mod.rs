//! Phased rendering.
//!
//! Templates are grouped by phase. Phases render one after another; the templates of a single
//! phase render concurrently against the same snapshot and their contexts are folded back
//! together in template order.

pub mod collector;
pub mod phase;
pub mod pool;
pub mod reactor;
pub mod renderer;

pub use collector::RenderTargetCollector;
pub use phase::Phase;
pub use pool::WorkerPool;
pub use reactor::Reactor;
pub use renderer::MultiTargetRenderer;
