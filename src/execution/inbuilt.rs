//! Actions generated from the rendered context rather than from templates.

use crate::context::RenderedAction;
use std::path::{Path, PathBuf};

pub const RELOAD_ALL_NAME: &str = "Reload all";
pub const RUN_ACTION_NAME: &str = "Run action";

/// Rofi separator between menu entries.
const MENU_SEPARATOR: char = '`';

/// A `/bin/sh` script starting every reload action in the background.
pub fn reload_all(
    reload_actions: &[RenderedAction],
    resolve: impl Fn(&RenderedAction) -> PathBuf,
) -> RenderedAction {
    let mut script = String::from("#!/bin/sh\n");
    for action in reload_actions {
        script.push_str(&shell_quote(&resolve(action)));
        script.push_str(" &\n");
    }
    RenderedAction::new(RELOAD_ALL_NAME, script, false)
}

/// A rofi launcher over every action not hidden from run-all, sorted by name.
pub fn run_action<'a>(
    actions: impl IntoIterator<Item = &'a RenderedAction>,
    resolve: impl Fn(&RenderedAction) -> PathBuf,
) -> RenderedAction {
    let mut visible: Vec<&RenderedAction> = actions
        .into_iter()
        .filter(|action| !action.hide_from_run_all)
        .collect();
    visible.sort_by(|a, b| a.name.cmp(&b.name));

    let mut script = String::from("#!/usr/bin/env bash\n# vim: ft=sh\n");
    script.push_str("CHOICE=$((");
    for action in &visible {
        script.push_str(&format!(
            "echo -n {}; ",
            single_quote(&format!("{}{}", action.name, MENU_SEPARATOR))
        ));
    }
    script.push_str(&format!(
        ") | rofi -sep '{}' -dmenu -p '' -matching fuzzy -i -no-custom -scroll-method 1)\n",
        MENU_SEPARATOR
    ));

    script.push_str("if [ $? -eq 0 ]; then\n    case $CHOICE in\n");
    for action in &visible {
        script.push_str(&format!("        {})\n", single_quote(&action.name)));
        script.push_str(&format!(
            "            (sleep 0.2 && {}) &\n",
            shell_quote(&resolve(action))
        ));
        script.push_str("            ;;\n");
    }
    script.push_str("    esac\n    exit\nelse\n    echo \"Rofi returned failure\"\n    exit\nfi\n");

    RenderedAction::new(RUN_ACTION_NAME, script, false)
}

fn shell_quote(path: &Path) -> String {
    single_quote(&path.display().to_string())
}

fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
