//! End-to-end runs of the configurator binary.

use super::test_utils::{read, TemplateDir};
use std::process::{Command, Output};

fn run(dir: &TemplateDir, args: &[&str]) -> Output {
    let home = dir.root.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    Command::new(env!("CARGO_BIN_EXE_configurator"))
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("CONFIGURATOR_LOG")
        .arg("--target-dir")
        .arg(dir.templates())
        .arg("--strip-color")
        .args(args)
        .output()
        .unwrap()
}

/// Two phases: `base` defines the output and actions directories, `apps` uses them.
fn sample(dir: &TemplateDir) {
    let out = dir.out();
    dir.template(
        "base.conf",
        "base",
        "{{$out}}/base.txt",
        &format!(
            "# out = {}\n# actions_dir = {}/actions\nbase written\n",
            out.display(),
            out.display()
        ),
    );
    dir.template(
        "apps/term.conf",
        "apps",
        "{{$out}}/apps.txt",
        &format!(
            "Hello {{{{!echo world}}}}\n# action Open term\necho term\n# end action\n# execute\n#!/bin/sh\ntouch {}/post-ran\n# end execute\n",
            out.display()
        ),
    );
}

#[test]
fn test_full_run_writes_files_actions_and_runs_post_scripts() {
    let dir = TemplateDir::new(&["base", "apps"]);
    sample(&dir);

    let output = run(&dir, &[]);
    assert!(
        output.status.success(),
        "run should succeed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(read(&dir.out().join("base.txt")), "base written");
    assert!(read(&dir.out().join("apps.txt")).starts_with("Hello world\n"));
    assert!(dir.out().join("actions/Open_term").is_file());
    assert!(dir.out().join("actions/Run_action").is_file());
    assert!(!dir.out().join("actions/Reload_all").exists());
    assert!(dir.out().join("post-ran").exists());
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = TemplateDir::new(&["base", "apps"]);
    sample(&dir);

    let output = run(&dir, &["--dry"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Execution plan"));
    assert!(stdout.contains("Post scripts"));
    assert!(!dir.out().join("base.txt").exists());
    assert!(!dir.out().join("actions").exists());
    assert!(!dir.out().join("post-ran").exists());
}

#[test]
fn test_print_context() {
    let dir = TemplateDir::new(&["base", "apps"]);
    sample(&dir);

    let output = run(&dir, &["-d", "-c"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Values:"));
    assert!(stdout.contains("actions_dir"));
    assert!(stdout.contains("Actions:\nOpen term"));
}

#[test]
fn test_missing_project_file_fails() {
    let dir = TemplateDir::new(&["base"]);
    std::fs::remove_file(dir.templates().join(".configurator")).unwrap();

    let output = run(&dir, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No .configurator file found"));
}

#[test]
fn test_undefined_variable_aborts_before_writing() {
    let dir = TemplateDir::new(&["base", "apps"]);
    let out = dir.out();
    dir.template(
        "ok.conf",
        "base",
        &format!("{}/ok.txt", out.display()),
        "fine\n",
    );
    dir.template(
        "broken.conf",
        "apps",
        &format!("{}/broken.txt", out.display()),
        "{{$nope}}\n",
    );

    let output = run(&dir, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown variable: 'nope'"));
    assert!(!out.join("ok.txt").exists());
}

#[test]
fn test_target_dir_must_exist() {
    let dir = TemplateDir::new(&["base"]);
    let output = Command::new(env!("CARGO_BIN_EXE_configurator"))
        .arg("-t")
        .arg(dir.root.path().join("missing"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is no directory or does not exist"));
}
