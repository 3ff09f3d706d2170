//! Shell process invocation for `{{!...}}` interpolations and post-render scripts.

use std::io::{self, Write};
use std::process::{Command, Stdio};

pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lines joined with `\n` and no trailing newline.
    pub stdout: String,
    /// Exit code, or -1 when the process was killed by a signal.
    pub code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs shell commands synchronously on the calling thread.
pub trait ShellExecutor: Send + Sync {
    /// Run `command` through the shell and capture its output.
    fn run_for_output(&self, command: &str) -> io::Result<CommandOutput>;

    /// Write `script` to an executable temporary file and run it directly, so a shebang line
    /// picks the interpreter.
    fn run_file(&self, script: &str) -> io::Result<CommandOutput>;
}

#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
}

impl SystemShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellExecutor for SystemShell {
    fn run_for_output(&self, command: &str) -> io::Result<CommandOutput> {
        let output = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(CommandOutput {
            stdout: join_lines(&output.stdout),
            code: output.status.code().unwrap_or(-1),
        })
    }

    fn run_file(&self, script: &str) -> io::Result<CommandOutput> {
        let mut file = tempfile::Builder::new()
            .prefix("execute-file")
            .suffix(".sh")
            .tempfile()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;
        super::make_executable(file.path())?;

        // The write handle must be closed before exec, or the kernel refuses with ETXTBSY.
        let path = file.into_temp_path();
        let output = Command::new(&path)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        path.close()?;

        Ok(CommandOutput {
            stdout: join_lines(&output.stdout),
            code: output.status.code().unwrap_or(-1),
        })
    }
}

fn join_lines(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .lines()
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_lines_drops_trailing_newline() {
        assert_eq!(join_lines(b"a\nb\n"), "a\nb");
        assert_eq!(join_lines(b"a\r\nb"), "a\nb");
        assert_eq!(join_lines(b""), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_for_output() {
        let shell = SystemShell::default();
        let output = shell.run_for_output("echo hi; echo there").unwrap();
        assert_eq!(output.stdout, "hi\nthere");
        assert!(output.success());

        let failed = shell.run_for_output("exit 3").unwrap();
        assert_eq!(failed.code, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_file_respects_shebang() {
        let shell = SystemShell::default();
        let output = shell.run_file("#!/bin/sh\necho from file\n").unwrap();
        assert_eq!(output.stdout, "from file");
        assert!(output.success());
    }
}
