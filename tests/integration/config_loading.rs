//! Layered configuration loading from real files.

use super::test_utils::TemplateDir;
use configurator::config::ConfigLoader;
use std::fs;

fn loader(dir: &TemplateDir) -> ConfigLoader {
    ConfigLoader::new(dir.templates()).with_environment(false)
}

#[test]
fn test_project_file_phases() {
    let dir = TemplateDir::new(&["base", "apps", "late"]);
    let config = loader(&dir).with_global_file(None).build().unwrap();
    assert_eq!(config.phases, vec!["base", "apps", "late"]);
    let phases = config.phase_list();
    assert_eq!(phases[2].identifier, "late");
    assert_eq!(phases[2].priority, 2);
}

#[test]
fn test_global_file_supplies_scripts_and_shell() {
    let dir = TemplateDir::new(&["base"]);
    let global = dir.root.path().join("config.toml");
    fs::write(
        &global,
        "[shell]\nprogram = \"/bin/bash\"\n\n[scripts.ruby]\nprogram = \"ruby\"\nargs = [\"-e\"]\n\n[logging]\nlevel = \"info\"\n",
    )
    .unwrap();

    let config = loader(&dir).with_global_file(Some(global)).build().unwrap();
    assert_eq!(config.shell.program, "/bin/bash");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.scripts["ruby"].args, vec!["-e"]);
    assert_eq!(config.script_engines().languages(), vec!["js", "python", "ruby"]);
}

#[test]
fn test_invalid_yaml_is_a_config_error() {
    let dir = TemplateDir::new(&["base"]);
    fs::write(dir.templates().join(".configurator"), "phases: [base\n").unwrap();
    let err = loader(&dir).with_global_file(None).build().unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_no_phases_is_rejected() {
    let dir = TemplateDir::new(&[]);
    fs::write(dir.templates().join(".configurator"), "phases: []\n").unwrap();
    let err = loader(&dir).with_global_file(None).build().unwrap_err();
    assert!(err.to_string().contains("At least one phase must be declared"));
}
