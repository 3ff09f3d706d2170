//! Rendering: evaluating template trees and the targets that wrap them.

pub mod evaluator;
pub mod target;

pub use evaluator::{render, RenderServices};
pub use target::{expand_home, FileRenderTarget, RenderTarget, RenderedFile, StringRenderTarget};
