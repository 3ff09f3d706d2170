//! Property-based tests for context merging

use configurator::context::RenderContext;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn values() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-e]{1,2}", "[a-z0-9]{0,4}", 0..8)
}

fn context_from(values: &BTreeMap<String, String>) -> RenderContext {
    values
        .iter()
        .fold(RenderContext::new(), |context, (key, value)| {
            context.store_value(key.as_str(), value.as_str())
        })
}

proptest! {
    /// Keys in both sides keep the receiver's value, keys in one side keep that side's value.
    #[test]
    fn merge_prefers_receiver(left in values(), right in values()) {
        let merged = context_from(&left).merge(&context_from(&right));

        let mut expected = right.clone();
        expected.extend(left.clone());

        let actual: BTreeMap<String, String> = merged
            .all_values()
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn merge_with_self_is_identity(left in values()) {
        let context = context_from(&left).store_post_script("echo once");
        prop_assert_eq!(context.merge(&context), context);
    }

    /// Post scripts of the receiver come first, then the other side's new ones in order.
    #[test]
    fn merge_appends_unseen_post_scripts(
        left in prop::collection::vec("[a-c]", 0..5),
        right in prop::collection::vec("[a-c]", 0..5),
    ) {
        let build = |scripts: &Vec<String>| {
            scripts
                .iter()
                .fold(RenderContext::new(), |context, script| context.store_post_script(script.as_str()))
        };
        let merged = build(&left).merge(&build(&right));

        let mut expected = left.clone();
        expected.extend(right.iter().filter(|script| !left.contains(script)).cloned());
        prop_assert_eq!(merged.all_post_scripts().to_vec(), expected);
    }
}
