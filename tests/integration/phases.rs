//! Phase ordering and context folding over real template directories.

use super::test_utils::TemplateDir;
use configurator::cli::RunContext;
use configurator::config::ConfiguratorConfig;

fn run_context(dir: &TemplateDir, phases: &[&str], workers: usize) -> RunContext {
    let mut config = ConfiguratorConfig {
        phases: phases.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    };
    config.render.worker_threads = Some(workers);
    RunContext::with_config(dir.templates(), config)
}

#[test]
fn test_later_template_wins_within_a_phase() {
    let dir = TemplateDir::new(&["base"]);
    dir.template("a.conf", "base", "/tmp/a", "# k = x\n# only_a = 1\n");
    dir.template("b.conf", "base", "/tmp/b", "# k = y\n");

    let context = run_context(&dir, &["base"], 4);
    for _ in 0..20 {
        let (files, rendered) = context.render(false).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(rendered.get_value("k").unwrap().to_string(), "y");
        assert_eq!(rendered.get_value("only_a").unwrap().to_string(), "1");
    }
}

#[test]
fn test_phases_run_in_declared_order() {
    let dir = TemplateDir::new(&["first", "second"]);
    dir.template("1.conf", "second", "/tmp/second", "{{$greeting}}, again");
    dir.template("2.conf", "first", "/tmp/first", "# greeting = hello\nset");

    let (files, _) = run_context(&dir, &["first", "second"], 2)
        .render(false)
        .unwrap();
    let contents: Vec<&str> = files.iter().map(|f| f.content.as_str()).collect();
    assert_eq!(contents, vec!["set", "hello, again"]);
}

#[test]
fn test_reversed_phases_fail_on_missing_value() {
    let dir = TemplateDir::new(&["first", "second"]);
    dir.template("1.conf", "second", "/tmp/second", "{{$greeting}}");
    dir.template("2.conf", "first", "/tmp/first", "# greeting = hello\n");

    let err = run_context(&dir, &["second", "first"], 2)
        .render(false)
        .unwrap_err();
    assert!(err.to_string().contains("Unknown variable: 'greeting'"));
}

#[test]
fn test_templates_of_undeclared_phases_are_skipped() {
    let dir = TemplateDir::new(&["base"]);
    dir.template("a.conf", "base", "/tmp/a", "kept");
    dir.template("b.conf", "elsewhere", "/tmp/b", "{{$would_fail}}");

    let (files, _) = run_context(&dir, &["base"], 1).render(false).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, "kept");
}
