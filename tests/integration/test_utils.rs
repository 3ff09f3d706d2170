//! Shared test utilities for integration tests
//!
//! Builds throwaway template directories: a `.configurator` file plus `.conf` templates.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A template directory inside a temp dir, with room for rendered output next to it.
pub struct TemplateDir {
    pub root: TempDir,
}

impl TemplateDir {
    /// Create the directory and its `.configurator` declaring `phases`.
    pub fn new(phases: &[&str]) -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::create_dir_all(root.path().join("out")).unwrap();
        let mut project = String::from("phases:\n");
        for phase in phases {
            project.push_str(&format!("  - {}\n", phase));
        }
        fs::write(root.path().join("templates/.configurator"), project).unwrap();
        Self { root }
    }

    /// Directory holding `.configurator` and the templates.
    pub fn templates(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    /// Directory templates render into.
    pub fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Write `name` with the two header lines and a `#` command prefix before `body`.
    pub fn template(&self, name: &str, phase: &str, target: &str, body: &str) -> PathBuf {
        let path = self.templates().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(
            &path,
            format!(
                "Phase: {}\nTarget path: {}\nCommand prefix: #\n{}",
                phase, target, body
            ),
        )
        .unwrap();
        path
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}
