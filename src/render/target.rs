//! Render targets: a parsed template plus what to do with its output.

use crate::context::RenderContext;
use crate::dsl::{parse, parse_single_line, AstNode};
use crate::error::{ParseError, RenderError};
use crate::render::evaluator::{render, RenderServices};
use std::path::{Path, PathBuf};

/// Something that renders against a context snapshot and yields an output plus the context it
/// produced. Targets are shared across worker threads.
pub trait RenderTarget: Send + Sync + 'static {
    type Output: Send + 'static;

    fn render(
        &self,
        context: &RenderContext,
        services: &RenderServices,
    ) -> Result<(Self::Output, RenderContext), RenderError>;

    /// Human readable name used in errors and logs.
    fn describe(&self) -> String;
}

/// Renders a template held in memory to a string.
#[derive(Debug, Clone, PartialEq)]
pub struct StringRenderTarget {
    ast: AstNode,
}

impl StringRenderTarget {
    /// Parse `source`, which must start with a `Command prefix:` header.
    pub fn new(source: &str, report_parse_errors: bool) -> Result<Self, ParseError> {
        Ok(Self {
            ast: parse(source, report_parse_errors)?,
        })
    }

    /// Parse a header-less line with `#` as the command prefix.
    pub fn single_line(line: &str, report_parse_errors: bool) -> Result<Self, ParseError> {
        Ok(Self {
            ast: parse_single_line(line, report_parse_errors)?,
        })
    }
}

impl RenderTarget for StringRenderTarget {
    type Output = String;

    fn render(
        &self,
        context: &RenderContext,
        services: &RenderServices,
    ) -> Result<(String, RenderContext), RenderError> {
        render(&self.ast, context.clone(), services).map_err(|source| RenderError::Evaluation {
            target: self.describe(),
            source,
        })
    }

    fn describe(&self) -> String {
        "string template".to_string()
    }
}

/// A rendered template together with the path it should be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Template the file was rendered from.
    pub source: PathBuf,
    pub target_path: PathBuf,
    pub content: String,
}

/// A template file: content plus a templated destination path.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRenderTarget {
    source_path: PathBuf,
    content: AstNode,
    target_path: AstNode,
}

impl FileRenderTarget {
    pub fn new(source_path: impl Into<PathBuf>, content: AstNode, target_path: AstNode) -> Self {
        Self {
            source_path: source_path.into(),
            content,
            target_path,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

impl RenderTarget for FileRenderTarget {
    type Output = RenderedFile;

    /// The destination is rendered against the context the content produced, so a template can
    /// compute its own path. Changes made while rendering the path are dropped.
    fn render(
        &self,
        context: &RenderContext,
        services: &RenderServices,
    ) -> Result<(RenderedFile, RenderContext), RenderError> {
        let evaluation = |source| RenderError::Evaluation {
            target: self.describe(),
            source,
        };

        let (content, resulting) =
            render(&self.content, context.clone(), services).map_err(evaluation)?;
        let (path, _) = render(&self.target_path, resulting.clone(), services).map_err(evaluation)?;

        let path = path.trim();
        if path.is_empty() {
            return Err(RenderError::EmptyTargetPath(self.describe()));
        }

        Ok((
            RenderedFile {
                source: self.source_path.clone(),
                target_path: expand_home(path),
                content,
            },
            resulting,
        ))
    }

    fn describe(&self) -> String {
        self.source_path.display().to_string()
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match directories::BaseDirs::new() {
        Some(dirs) if rest.is_empty() => dirs.home_dir().to_path_buf(),
        Some(dirs) => dirs.home_dir().join(rest),
        None => PathBuf::from(path),
    }
}
