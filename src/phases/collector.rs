//! Finds template files and parses them into file render targets.
//!
//! A template starts with two header lines followed by its DSL body:
//!
//! ```text
//! Phase: apps
//! Target path: ~/.config/app/config
//! Command prefix: #
//! ...
//! ```

use crate::dsl::{parse, parse_single_line, Scanner};
use crate::error::{ApiError, ParseError};
use crate::render::FileRenderTarget;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const TEMPLATE_EXTENSION: &str = ".conf";
const PHASE_HEADER: &str = "Phase";
const TARGET_PATH_HEADER: &str = "Target path";

pub struct RenderTargetCollector {
    root: PathBuf,
    report_parse_errors: bool,
}

impl RenderTargetCollector {
    pub fn new(root: impl Into<PathBuf>, report_parse_errors: bool) -> Self {
        Self {
            root: root.into(),
            report_parse_errors,
        }
    }

    /// Collect every `.conf` template below the root, grouped by phase name. Within a phase the
    /// targets are ordered by path.
    pub fn collect(&self) -> Result<BTreeMap<String, Vec<FileRenderTarget>>, ApiError> {
        let mut targets: BTreeMap<String, Vec<FileRenderTarget>> = BTreeMap::new();

        for path in self.template_paths()? {
            let source = std::fs::read_to_string(&path)?;
            let (phase, target) = parse_template(&path, &source, self.report_parse_errors)
                .map_err(|source| ApiError::Template {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), phase = %phase, "Collected template");
            targets.entry(phase).or_default().push(target);
        }

        Ok(targets)
    }

    fn template_paths(&self) -> Result<Vec<PathBuf>, ApiError> {
        let mut paths = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| {
                let message = format!("Failed to walk {}", self.root.display());
                ApiError::distribution(message, std::io::Error::other(e))
            })?;
            let is_template = entry.file_type().is_file()
                && entry.file_name().to_string_lossy().ends_with(TEMPLATE_EXTENSION);
            if is_template {
                paths.push(entry.into_path());
            }
        }

        paths.sort();
        Ok(paths)
    }
}

/// Split a template into its phase name and render target.
pub fn parse_template(
    path: &Path,
    source: &str,
    report_parse_errors: bool,
) -> Result<(String, FileRenderTarget), ParseError> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.len() < 2 {
        return Err(ParseError::at(
            source,
            source.len(),
            "Expected 'Phase' and 'Target path' header lines",
        )
        .into_hard());
    }

    let phase = read_header(lines[0], PHASE_HEADER)?;
    let target_path = read_header(lines[1], TARGET_PATH_HEADER)?;
    let body = lines[2..].join("\n");

    let content = parse(&body, report_parse_errors)?;
    let target_path = parse_single_line(&target_path, report_parse_errors)?;
    Ok((phase, FileRenderTarget::new(path, content, target_path)))
}

fn read_header(line: &str, name: &str) -> Result<String, ParseError> {
    let mut scanner = Scanner::new(line);
    scanner.assert_read(name)?;
    scanner.skip_whitespace();
    scanner.assert_read(": ")?;
    Ok(scanner.read_phrase())
}
