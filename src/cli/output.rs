//! CLI output: error mapping from domain errors to the CLI surface.

use crate::error::ApiError;
use std::error::Error;

/// Render an error and its chain of causes, one per line.
pub fn map_error(e: &ApiError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str("\n\t");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
