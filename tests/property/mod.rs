//! Property-based tests for the render context and the DSL

mod literals;
mod merge;
