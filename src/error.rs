//! Error types for the configurator.
//!
//! Parsing, evaluation and orchestration each have their own error type; `ApiError` wraps them
//! for the command-line surface.

use std::path::PathBuf;
use thiserror::Error;

/// Number of characters shown before the failure position.
const CONTEXT_LENGTH: usize = 10;

/// Malformed DSL input.
///
/// Carries a short window of the input that precedes the failure position. A parse error is
/// `hard` when it must not be swallowed by parser backtracking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail} at '{context}<---[HERE]")]
pub struct ParseError {
    pub detail: String,
    pub context: String,
    pub position: usize,
    pub hard: bool,
}

impl ParseError {
    /// Build an error for `source` at byte offset `position`.
    pub fn at(source: &str, position: usize, detail: impl Into<String>) -> Self {
        let before = &source[..position];
        let skip = before.chars().count().saturating_sub(CONTEXT_LENGTH);
        let context: String = before.chars().skip(skip).collect();
        Self {
            detail: detail.into(),
            context,
            position,
            hard: false,
        }
    }

    /// Mark this error as one that aborts the parse instead of triggering a backtrack.
    pub fn into_hard(mut self) -> Self {
        self.hard = true;
        self
    }
}

/// Failures while rendering a parsed template.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Unknown variable: '{0}'")]
    UndefinedVariable(String),

    #[error("Unknown action: '{0}'")]
    UndefinedAction(String),

    #[error("Expected an integer but got '{0}'")]
    NotAnInteger(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid rgb color '{0}'")]
    InvalidColor(String),

    #[error("No script engine registered for language '{0}'")]
    UnknownScriptLanguage(String),

    #[error("Script ({language}) failed: {message}")]
    ScriptFailed { language: String, message: String },

    #[error("Failed to run shell command '{command}': {source}")]
    Shell {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve actions directory '{path}': {source}")]
    ActionsDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Orchestration failures: a render target or a worker of the phase pool failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to render {target}: {source}")]
    Evaluation {
        target: String,
        #[source]
        source: EvalError,
    },

    #[error("Target path of {0} rendered to an empty string")]
    EmptyTargetPath(String),

    #[error("Render worker failed: {0}")]
    WorkerFailed(String),
}

/// Application-level errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Distribution failed: {message}: {source}")]
    Distribution {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find '${0}' in the rendered context")]
    MissingValue(String),

    #[error("Post script '{script}' exited with code {code}")]
    PostScriptFailed { script: String, code: i32 },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    pub(crate) fn distribution(message: impl Into<String>, source: std::io::Error) -> Self {
        ApiError::Distribution {
            message: message.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
