/// What happens to the cleanup of a value that failed a typed resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MismatchCleanup {
    /// The cleanup is registered like for any other resolution and runs on dispose
    #[default]
    Register,
    /// The cleanup is dropped without ever running
    ///
    /// Only sensible if the factory's cleanup releases nothing
    Discard,
}

/// Behaviour knobs of a [crate::Context]
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub on_type_mismatch: MismatchCleanup,
}
impl ContextOptions {
    pub fn on_type_mismatch(mut self, policy: MismatchCleanup) -> Self {
        self.on_type_mismatch = policy;
        self
    }
}
