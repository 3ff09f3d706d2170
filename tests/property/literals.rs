//! Property-based tests for literal rendering

use configurator::context::RenderContext;
use configurator::dsl::parse;
use configurator::render::{render, RenderServices};
use proptest::prelude::*;

proptest! {
    /// Text without the command prefix or interpolation braces renders unchanged.
    #[test]
    fn literal_text_renders_unchanged(text in "[a-zA-Z0-9 ,.;:\\n\\t-]{0,80}") {
        let ast = parse(&format!("Command prefix: @@\n{}", text), false).unwrap();
        let (output, context) = render(&ast, RenderContext::new(), &RenderServices::default()).unwrap();
        prop_assert_eq!(output, text);
        prop_assert_eq!(context, RenderContext::new());
    }

    /// A stored value renders back as its text form.
    #[test]
    fn stored_value_renders_back(name in "[a-z][a-z0-9_]{0,8}", value in "[a-zA-Z0-9 ]{0,12}") {
        let ast = parse(&format!("Command prefix: #\n{{{{${}}}}}", name), false).unwrap();
        let context = RenderContext::new().store_value(name.as_str(), value.as_str());
        let (output, after) = render(&ast, context, &RenderServices::default()).unwrap();
        prop_assert_eq!(output, value);
        prop_assert_eq!(after.all_values().len(), 1);
    }
}
