/// A named rendering phase. Lower priorities render first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phase {
    pub identifier: String,
    pub priority: i32,
}

impl Phase {
    pub fn new(identifier: impl Into<String>, priority: i32) -> Self {
        Self {
            identifier: identifier.into(),
            priority,
        }
    }

    /// Phases in declaration order: the first name gets priority 0.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Vec<Phase> {
        names
            .iter()
            .zip(0..)
            .map(|(name, priority)| Phase::new(name.as_ref(), priority))
            .collect()
    }
}
