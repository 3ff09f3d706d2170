//! CLI domain: parse, route, output and presentation only.
//! Orchestration of a run lives in `RunContext`; rendering lives in the library modules.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use presentation::{format_context_report, post_script_start};
pub use route::RunContext;
