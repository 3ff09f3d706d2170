//! Configurator: phase-ordered configuration generation
//!
//! Templates written in a small line-oriented DSL are collected from a directory, rendered phase
//! by phase against a shared persistent context and written to their target paths. Templates can
//! define variables, shell interpolations, conditionals, executable actions and post-render
//! scripts.

pub mod cli;
pub mod config;
pub mod context;
pub mod dsl;
pub mod error;
pub mod execution;
pub mod logging;
pub mod phases;
pub mod render;
