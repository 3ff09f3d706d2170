//! Side effects of a run: shell and script processes, distribution of rendered files and
//! actions, post-render scripts and the terminal report.

pub mod distribute;
pub mod inbuilt;
pub mod output;
pub mod post_actions;
pub mod script;
pub mod shell;

pub use distribute::{
    ActionDistributor, DirBasedActionDistributor, FileDistributor, FileSystemFileDistributor,
};
pub use output::ColoredOutput;
pub use post_actions::PostActionRunner;
pub use script::{ProcessScriptEngine, ScriptEngine, ScriptEngines};
pub use shell::{CommandOutput, ShellExecutor, SystemShell};

use std::path::Path;

/// Context value naming the directory actions are written to.
pub const ACTIONS_DIR_KEY: &str = "actions_dir";

/// Add the owner-execute bit.
#[cfg(unix)]
pub(crate) fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
pub(crate) fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
