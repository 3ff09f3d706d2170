//! Rendering templates with the real shell.

use configurator::context::RenderContext;
use configurator::dsl::parse;
use configurator::render::{render, RenderServices, RenderTarget, StringRenderTarget};

fn render_source(body: &str, context: RenderContext) -> (String, RenderContext) {
    let ast = parse(&format!("Command prefix: #\n{}", body), false).unwrap();
    render(&ast, context, &RenderServices::system()).unwrap()
}

#[test]
fn test_literal_text_is_unchanged() {
    let text = "plain text\n  with indentation\n\tand tabs";
    let (output, context) = render_source(text, RenderContext::new());
    assert_eq!(output, text);
    assert_eq!(context, RenderContext::new());
}

#[test]
fn test_stored_value_is_interpolated() {
    let context = RenderContext::new().store_value("V", 42i64);
    let (output, after) = render_source("answer: {{$V}}", context);
    assert_eq!(output, "answer: 42");
    assert_eq!(after.all_values().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_shell_interpolation() {
    let (output, context) = render_source("Hey, {{!echo hi}}!", RenderContext::new());
    assert_eq!(output, "Hey, hi!");
    assert_eq!(context, RenderContext::new());
}

#[cfg(unix)]
#[test]
fn test_failing_shell_command_is_rendered_as_message() {
    let (output, _) = render_source("{{!exit 3}}", RenderContext::new());
    assert_eq!(output, "Process exited with exit code 3!");
}

#[test]
fn test_numeric_conditions() {
    let body = "# if (5) > (4)\nbigger\n# else\nnot bigger\n# end if";
    assert_eq!(render_source(body, RenderContext::new()).0, "bigger");

    let body = "# if (5) > (5)\nbigger\n# else\nnot bigger\n# end if";
    assert_eq!(render_source(body, RenderContext::new()).0, "not bigger");
}

#[test]
fn test_malformed_interpolation_is_literal() {
    let (output, _) = render_source("a {{$}} b", RenderContext::new());
    assert_eq!(output, "a {{$}} b");
}

#[test]
fn test_rgb_conversion() {
    let context = RenderContext::new().store_value("accent", "#ff8000");
    let (output, _) = render_source("rgb({{$accent,rgb}})", context);
    assert_eq!(output, "rgb(255, 128, 0)");
}

#[test]
fn test_actions_and_calls() {
    let body = "# actions_dir = /opt/actions\n# action Reload: all stuff\nkill -USR1 1\n# end action\n# call (Reload: all stuff) (--now)";
    let (output, context) = render_source(body, RenderContext::new());
    assert_eq!(output, "/opt/actions/Reload__all_stuff --now");

    let action = context.get_action("Reload: all stuff").unwrap();
    assert_eq!(action.sanitized_name, "Reload__all_stuff");
    assert_eq!(action.content, "kill -USR1 1\n");
}

#[test]
fn test_string_target_keeps_input_context() {
    let target = StringRenderTarget::new("Command prefix: //\n// name = demo\nname={{$name}}", false)
        .unwrap();
    let input = RenderContext::new().store_value("other", "kept");
    let (output, produced) = target.render(&input, &RenderServices::default()).unwrap();
    assert_eq!(output, "name=demo");
    assert!(input.get_value_opt("name").is_none());
    assert_eq!(produced.get_value("other").unwrap().to_string(), "kept");
}
