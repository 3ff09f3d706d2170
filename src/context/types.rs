//! Value and action types stored in a render context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed context value. Templates only store text; script engines may store the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Convert a JSON value produced by a script.
    ///
    /// Strings, integers, other numbers and booleans keep their kind; anything else is stored as
    /// its JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Value::Text(text),
            serde_json::Value::Bool(flag) => Value::Bool(flag),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => Value::Integer(integer),
                None => number
                    .as_f64()
                    .map(Value::Float)
                    .unwrap_or_else(|| Value::Text(number.to_string())),
            },
            other => Value::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Integer(integer) => write!(f, "{}", integer),
            Value::Float(float) => write!(f, "{}", float),
            Value::Bool(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<i64> for Value {
    fn from(integer: i64) -> Self {
        Value::Integer(integer)
    }
}

impl From<f64> for Value {
    fn from(float: f64) -> Self {
        Value::Float(float)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

/// An action after its body has been rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAction {
    pub name: String,
    /// File name the action is written to.
    pub sanitized_name: String,
    pub content: String,
    pub hide_from_run_all: bool,
}

impl RenderedAction {
    pub fn new(name: impl Into<String>, content: impl Into<String>, hide_from_run_all: bool) -> Self {
        let name = name.into();
        Self {
            sanitized_name: sanitize_action_name(&name),
            name,
            content: content.into(),
            hide_from_run_all,
        }
    }
}

/// Replace whitespace and `:` so the name is usable as a file name.
pub fn sanitize_action_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() || c == ':' { '_' } else { c })
        .collect()
}
