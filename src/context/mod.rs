//! Persistent render context.
//!
//! A `RenderContext` is an immutable value: every `store_*` consumes the context and returns the
//! updated one, while clones taken earlier keep seeing the old state. The collections are shared
//! behind `Arc` and copied only when a shared context is written to.

pub mod types;

pub use types::{sanitize_action_name, RenderedAction, Value};

use crate::error::EvalError;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    values: Arc<BTreeMap<String, Value>>,
    actions: Arc<BTreeMap<String, RenderedAction>>,
    post_scripts: Arc<Vec<String>>,
    reload_actions: Arc<Vec<RenderedAction>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.values).insert(name.into(), value.into());
        self
    }

    pub fn get_value(&self, name: &str) -> Result<&Value, EvalError> {
        self.get_value_opt(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    pub fn get_value_opt(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// All values, ordered by name.
    pub fn all_values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Store an action under its display name, replacing an earlier one of the same name.
    #[must_use]
    pub fn store_action(mut self, action: RenderedAction) -> Self {
        Arc::make_mut(&mut self.actions).insert(action.name.clone(), action);
        self
    }

    pub fn get_action(&self, name: &str) -> Result<&RenderedAction, EvalError> {
        self.get_action_opt(name)
            .ok_or_else(|| EvalError::UndefinedAction(name.to_string()))
    }

    pub fn get_action_opt(&self, name: &str) -> Option<&RenderedAction> {
        self.actions.get(name)
    }

    /// All actions, ordered by name.
    pub fn all_actions(&self) -> impl Iterator<Item = &RenderedAction> {
        self.actions.values()
    }

    #[must_use]
    pub fn store_post_script(mut self, script: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.post_scripts).push(script.into());
        self
    }

    /// Post scripts in the order they were stored.
    pub fn all_post_scripts(&self) -> &[String] {
        &self.post_scripts
    }

    #[must_use]
    pub fn store_reload_action(mut self, action: RenderedAction) -> Self {
        Arc::make_mut(&mut self.reload_actions).push(action);
        self
    }

    pub fn all_reload_actions(&self) -> &[RenderedAction] {
        &self.reload_actions
    }

    /// Combine two contexts. Entries of `self` win; whatever only `other` has is added.
    ///
    /// Values and actions are compared by key, post scripts and reload actions by content.
    /// Entries taken from `other` keep their relative order and follow the entries of `self`.
    pub fn merge(&self, other: &RenderContext) -> RenderContext {
        let mut merged = self.clone();

        for (name, value) in other.values.iter() {
            if !self.values.contains_key(name) {
                Arc::make_mut(&mut merged.values).insert(name.clone(), value.clone());
            }
        }
        for (name, action) in other.actions.iter() {
            if !self.actions.contains_key(name) {
                Arc::make_mut(&mut merged.actions).insert(name.clone(), action.clone());
            }
        }
        for script in other.post_scripts.iter() {
            if !self.post_scripts.contains(script) {
                Arc::make_mut(&mut merged.post_scripts).push(script.clone());
            }
        }
        for action in other.reload_actions.iter() {
            if !self.reload_actions.contains(action) {
                Arc::make_mut(&mut merged.reload_actions).push(action.clone());
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get_value() {
        let context = RenderContext::new().store_value("foo", "20");
        assert_eq!(context.get_value("foo").unwrap(), &Value::from("20"));
        assert_eq!(context.all_values().len(), 1);
        assert!(matches!(
            context.get_value("bar"),
            Err(EvalError::UndefinedVariable(name)) if name == "bar"
        ));
    }

    #[test]
    fn test_earlier_snapshot_is_unaffected() {
        let base = RenderContext::new().store_value("a", "1");
        let snapshot = base.clone();
        let updated = base
            .store_value("a", "2")
            .store_post_script("echo")
            .store_action(RenderedAction::new("x", "", false));

        assert_eq!(snapshot.get_value("a").unwrap().to_string(), "1");
        assert!(snapshot.all_post_scripts().is_empty());
        assert!(snapshot.get_action_opt("x").is_none());
        assert_eq!(updated.get_value("a").unwrap().to_string(), "2");
    }

    #[test]
    fn test_merge_prefers_receiver() {
        let a = RenderContext::new()
            .store_value("shared", "a")
            .store_value("only_a", "a")
            .store_action(RenderedAction::new("act", "from a", false));
        let b = RenderContext::new()
            .store_value("shared", "b")
            .store_value("only_b", "b")
            .store_action(RenderedAction::new("act", "from b", false))
            .store_action(RenderedAction::new("other", "from b", true));

        let merged = a.merge(&b);
        assert_eq!(merged.get_value("shared").unwrap().to_string(), "a");
        assert_eq!(merged.get_value("only_a").unwrap().to_string(), "a");
        assert_eq!(merged.get_value("only_b").unwrap().to_string(), "b");
        assert_eq!(merged.all_values().len(), 3);
        assert_eq!(merged.get_action("act").unwrap().content, "from a");
        assert!(merged.get_action("other").unwrap().hide_from_run_all);
    }

    #[test]
    fn test_merge_appends_missing_list_entries() {
        let reload = RenderedAction::new("r", "body", false);
        let a = RenderContext::new()
            .store_post_script("one")
            .store_reload_action(reload.clone());
        let b = RenderContext::new()
            .store_post_script("two")
            .store_post_script("one")
            .store_post_script("three")
            .store_reload_action(reload);

        let merged = a.merge(&b);
        assert_eq!(merged.all_post_scripts(), ["one", "two", "three"]);
        assert_eq!(merged.all_reload_actions().len(), 1);
    }

    #[test]
    fn test_undefined_action() {
        let err = RenderContext::new().get_action("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: 'nope'");
    }
}
