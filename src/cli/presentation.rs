//! CLI presentation: the final context report.

use crate::context::RenderContext;
use crate::execution::output::{palette, ColoredOutput};
use comfy_table::Table;

const POST_SCRIPT_PREVIEW: usize = 10;
const HIDDEN_MARKER: &str = "(👻)";

/// Values as a table, then the action names, reload action names and post script starts.
pub fn format_context_report(context: &RenderContext, output: ColoredOutput) -> String {
    let mut sections = Vec::new();

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Value"]);
    for (name, value) in context.all_values() {
        table.add_row(vec![name.clone(), value.to_string()]);
    }
    sections.push(format!(
        "{}\n{}",
        output.paint("Values:", palette::heading()),
        table
    ));

    let mut actions: Vec<String> = context
        .all_actions()
        .map(|action| {
            if action.hide_from_run_all {
                format!("{}{}", action.name, HIDDEN_MARKER)
            } else {
                action.name.clone()
            }
        })
        .collect();
    actions.sort();
    sections.push(name_section(output, "Actions:", actions));

    let mut reload_actions: Vec<String> = context
        .all_reload_actions()
        .iter()
        .map(|action| action.name.clone())
        .collect();
    reload_actions.sort();
    sections.push(name_section(output, "Reload actions:", reload_actions));

    let mut post_scripts: Vec<String> = context
        .all_post_scripts()
        .iter()
        .map(|script| post_script_start(script))
        .collect();
    post_scripts.sort();
    sections.push(name_section(output, "Post scripts:", post_scripts));

    sections.join("\n\n")
}

fn name_section(output: ColoredOutput, heading: &str, names: Vec<String>) -> String {
    format!(
        "{}\n{}",
        output.paint(heading, palette::heading()),
        output.paint(names.join(", "), palette::name())
    )
}

/// First characters of a script with its first comment removed, e.g. the shebang.
pub fn post_script_start(script: &str) -> String {
    let stripped = strip_first_comment(script);
    let start: String = stripped.chars().take(POST_SCRIPT_PREVIEW).collect();
    start.trim().to_string()
}

/// Remove the first `#` comment that has at least one character after it, up to the end of its
/// line.
fn strip_first_comment(script: &str) -> String {
    for (index, c) in script.char_indices() {
        if c != '#' {
            continue;
        }
        let rest = &script[index + 1..];
        let end = rest.find('\n').unwrap_or(rest.len());
        if end > 0 {
            return format!("{}{}", &script[..index], &rest[end..]);
        }
    }
    script.to_string()
}
