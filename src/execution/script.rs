//! Script engines for `<prefix> script <language>` blocks.
//!
//! An engine receives the script source and the current context and returns the context the
//! rest of the template continues with. The bundled `ProcessScriptEngine` delegates to an
//! external interpreter: the context values go to stdin as a JSON object, and a JSON object
//! printed on stdout is stored back as values.

use crate::context::{RenderContext, Value};
use crate::error::EvalError;
use std::collections::HashMap;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;

pub trait ScriptEngine: Send + Sync {
    fn execute(&self, source: &str, context: RenderContext) -> Result<RenderContext, EvalError>;
}

/// Script engines keyed by language tag.
#[derive(Clone, Default)]
pub struct ScriptEngines {
    engines: HashMap<String, Arc<dyn ScriptEngine>>,
}

impl ScriptEngines {
    pub fn new() -> Self {
        Self::default()
    }

    /// `js` via `node -e` and `python` via `python3 -c`.
    pub fn with_defaults() -> Self {
        let mut engines = Self::new();
        engines.register("js", ProcessScriptEngine::new("js", "node", ["-e"]));
        engines.register("python", ProcessScriptEngine::new("python", "python3", ["-c"]));
        engines
    }

    pub fn register(&mut self, language: impl Into<String>, engine: impl ScriptEngine + 'static) {
        self.engines.insert(language.into(), Arc::new(engine));
    }

    pub fn get(&self, language: &str) -> Result<&Arc<dyn ScriptEngine>, EvalError> {
        self.engines
            .get(language)
            .ok_or_else(|| EvalError::UnknownScriptLanguage(language.to_string()))
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl std::fmt::Debug for ScriptEngines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngines")
            .field("languages", &self.languages())
            .finish()
    }
}

/// Runs `<program> <args...> <source>` with the context values as JSON on stdin.
#[derive(Debug, Clone)]
pub struct ProcessScriptEngine {
    language: String,
    program: String,
    args: Vec<String>,
}

impl ProcessScriptEngine {
    pub fn new<I, S>(language: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: language.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn failure(&self, message: impl Into<String>) -> EvalError {
        EvalError::ScriptFailed {
            language: self.language.clone(),
            message: message.into(),
        }
    }

    fn run(&self, source: &str, input: &[u8]) -> io::Result<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // Scripts that never read stdin may exit before we finish writing.
            match stdin.write_all(input) {
                Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err),
                _ => {}
            }
        }
        child.wait_with_output()
    }
}

impl ScriptEngine for ProcessScriptEngine {
    fn execute(&self, source: &str, context: RenderContext) -> Result<RenderContext, EvalError> {
        let input = serde_json::to_vec(context.all_values())
            .map_err(|e| self.failure(format!("could not encode context: {}", e)))?;
        let output = self
            .run(source, &input)
            .map_err(|e| self.failure(format!("could not run '{}': {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!(
                "exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        apply_script_output(stdout.trim(), context).map_err(|message| self.failure(message))
    }
}

/// Store every entry of a JSON object printed by a script. Empty output changes nothing.
fn apply_script_output(stdout: &str, context: RenderContext) -> Result<RenderContext, String> {
    if stdout.is_empty() {
        return Ok(context);
    }
    let values: serde_json::Map<String, serde_json::Value> = serde_json::from_str(stdout)
        .map_err(|e| format!("expected a JSON object on stdout: {}", e))?;

    Ok(values.into_iter().fold(context, |context, (name, value)| {
        context.store_value(name, Value::from_json(value))
    }))
}
