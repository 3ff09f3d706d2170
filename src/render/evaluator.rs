//! Tree-walking renderer.
//!
//! Walks an AST against a context, producing the rendered text and the context that results from
//! the assignments, actions and scripts encountered on the way. Context flows left to right
//! through blocks.

use crate::context::{sanitize_action_name, RenderContext, RenderedAction};
use crate::dsl::{Action, AstNode, Comparison};
use crate::error::EvalError;
use crate::execution::script::ScriptEngines;
use crate::execution::shell::{ShellExecutor, SystemShell};
use crate::execution::ACTIONS_DIR_KEY;
use crate::render::expand_home;
use std::sync::Arc;

/// External capabilities the evaluator calls out to.
#[derive(Clone)]
pub struct RenderServices {
    pub shell: Arc<dyn ShellExecutor>,
    pub scripts: ScriptEngines,
}

impl RenderServices {
    pub fn new(shell: Arc<dyn ShellExecutor>, scripts: ScriptEngines) -> Self {
        Self { shell, scripts }
    }

    /// `/bin/sh` plus the default `js` and `python` interpreters.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemShell::default()), ScriptEngines::with_defaults())
    }
}

impl Default for RenderServices {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for RenderServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderServices")
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

/// Render `node` against `context`.
pub fn render(
    node: &AstNode,
    context: RenderContext,
    services: &RenderServices,
) -> Result<(String, RenderContext), EvalError> {
    let mut evaluator = Evaluator { context, services };
    let output = evaluator.visit(node)?;
    Ok((output, evaluator.context))
}

struct Evaluator<'s> {
    context: RenderContext,
    services: &'s RenderServices,
}

impl Evaluator<'_> {
    fn visit(&mut self, node: &AstNode) -> Result<String, EvalError> {
        match node {
            AstNode::Literal(text) => Ok(text.clone()),
            AstNode::Variable { name, args } => self.visit_variable(name, args),
            AstNode::ShellCommand(command) => self.visit_shell_command(command),
            AstNode::Block(children) => {
                let mut output = String::new();
                for child in children {
                    output.push_str(&self.visit(child)?);
                }
                Ok(output)
            }
            AstNode::Assignment { name, value } => {
                let value = self.visit(value)?;
                self.update(|context| context.store_value(name.as_str(), value));
                Ok(String::new())
            }
            AstNode::Comparison(comparison) => self.visit_comparison(comparison),
            AstNode::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.visit_comparison(condition)? == "true" {
                    self.visit(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.visit(else_branch)
                } else {
                    Ok(String::new())
                }
            }
            AstNode::Action(action) => {
                let rendered = self.render_action(action)?;
                self.update(|context| context.store_action(rendered));
                Ok(String::new())
            }
            AstNode::ReloadAction(action) => {
                let rendered = self.render_action(action)?;
                self.update(|context| context.store_reload_action(rendered));
                Ok(String::new())
            }
            AstNode::ActionCall { name, arguments } => self.visit_action_call(name, arguments),
            AstNode::ExecuteFile(body) => {
                let script = self.visit(body)?;
                let stored = script.clone();
                self.update(|context| context.store_post_script(stored));
                Ok(script)
            }
            AstNode::Script { language, source } => {
                let engine = self.services.scripts.get(language)?;
                let context = std::mem::take(&mut self.context);
                self.context = engine.execute(source, context)?;
                Ok(String::new())
            }
        }
    }

    fn update(&mut self, change: impl FnOnce(RenderContext) -> RenderContext) {
        let context = std::mem::take(&mut self.context);
        self.context = change(context);
    }

    fn visit_variable(&self, name: &str, args: &[String]) -> Result<String, EvalError> {
        let value = self.context.get_value(name)?.to_string();
        if args.iter().any(|arg| arg == "rgb") {
            return hex_to_rgb(&value);
        }
        Ok(value)
    }

    fn visit_shell_command(&self, command: &str) -> Result<String, EvalError> {
        let output = self
            .services
            .shell
            .run_for_output(command)
            .map_err(|source| EvalError::Shell {
                command: command.to_string(),
                source,
            })?;
        if !output.success() {
            return Ok(format!("Process exited with exit code {}!", output.code));
        }
        Ok(output.stdout)
    }

    fn visit_comparison(&mut self, comparison: &Comparison) -> Result<String, EvalError> {
        let left = self.visit(&comparison.left)?;
        let right = self.visit(&comparison.right)?;
        Ok(comparison.operator.apply(&left, &right)?.to_string())
    }

    fn render_action(&mut self, action: &Action) -> Result<RenderedAction, EvalError> {
        let content = self.visit(&action.body)?;
        Ok(RenderedAction {
            name: action.name.clone(),
            sanitized_name: action.sanitized_name(),
            content,
            hide_from_run_all: action.hide_from_run_all,
        })
    }

    /// `<absolute actions dir>/<sanitized name> <arguments>`; nothing is executed.
    fn visit_action_call(&self, name: &str, arguments: &str) -> Result<String, EvalError> {
        let actions_dir = self.context.get_value(ACTIONS_DIR_KEY)?.to_string();
        let absolute = std::path::absolute(expand_home(&actions_dir)).map_err(|source| {
            EvalError::ActionsDir {
                path: actions_dir.clone(),
                source,
            }
        })?;
        let action_file = absolute.join(sanitize_action_name(name));
        Ok(format!("{} {}", action_file.display(), arguments))
    }
}

/// `#RRGGBB` to `"R, G, B"`.
fn hex_to_rgb(value: &str) -> Result<String, EvalError> {
    let hex = value.replace('#', "");
    let color =
        u32::from_str_radix(hex.trim(), 16).map_err(|_| EvalError::InvalidColor(value.to_string()))?;
    let red = (color & 0xFF0000) >> 16;
    let green = (color & 0x00FF00) >> 8;
    let blue = color & 0x0000FF;
    Ok(format!("{}, {}, {}", red, green, blue))
}
