//! Template discovery through the public collector API.

use super::test_utils::TemplateDir;
use configurator::context::RenderContext;
use configurator::error::ApiError;
use configurator::phases::RenderTargetCollector;
use configurator::render::{RenderServices, RenderTarget};
use std::path::PathBuf;

#[test]
fn test_templates_are_grouped_and_ordered() {
    let dir = TemplateDir::new(&["base", "apps"]);
    dir.template("z.conf", "apps", "/tmp/z", "z");
    dir.template("a.conf", "apps", "/tmp/a", "a");
    dir.template("sub/m.conf", "base", "/tmp/m", "m");
    std::fs::write(dir.templates().join("README.md"), "not a template").unwrap();

    let targets = RenderTargetCollector::new(dir.templates(), false)
        .collect()
        .unwrap();

    let apps: Vec<PathBuf> = targets["apps"]
        .iter()
        .map(|t| t.source_path().to_path_buf())
        .collect();
    assert_eq!(
        apps,
        vec![dir.templates().join("a.conf"), dir.templates().join("z.conf")]
    );
    assert_eq!(targets["base"].len(), 1);
}

#[test]
fn test_collected_target_renders_quoted_path() {
    let dir = TemplateDir::new(&["base"]);
    dir.template("q.conf", "base", "\"/tmp/with space/{{$name}}\"", "# name = cfg\nbody");

    let targets = RenderTargetCollector::new(dir.templates(), false)
        .collect()
        .unwrap();
    let (file, _) = targets["base"][0]
        .render(&RenderContext::new(), &RenderServices::default())
        .unwrap();
    assert_eq!(file.target_path, PathBuf::from("/tmp/with space/cfg"));
    assert_eq!(file.content, "body");
}

#[test]
fn test_missing_command_prefix_header_is_reported() {
    let dir = TemplateDir::new(&["base"]);
    let path = dir.templates().join("bad.conf");
    std::fs::write(&path, "Phase: base\nTarget path: /tmp/x\nno header here\n").unwrap();

    let err = RenderTargetCollector::new(dir.templates(), false)
        .collect()
        .unwrap_err();
    match err {
        ApiError::Template { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.detail, "Expected 'Command prefix'");
        }
        other => panic!("unexpected error: {}", other),
    }
}
