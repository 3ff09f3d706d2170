//! Merge rules for the configuration layers.

pub(crate) mod merge_policy;
