use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, Instance, TypeInfo};

/// Errors produced by a factory
///
/// Must be Clone, a [crate::Shared] factory hands the same failure to every caller
#[derive(Error, Debug, Clone)]
pub enum FactoryError {
    /// The construction logic of the factory failed
    #[error("Construction failed - error: {0}")]
    Failed(Arc<DynError>),
    /// A shared factory panicked during its only construction
    #[error("Construction panicked, the shared factory can not produce a value")]
    Poisoned,
}
impl FactoryError {
    pub fn failed(error: impl Into<DynError>) -> Self {
        Self::Failed(Arc::new(error.into()))
    }
}

/// Errors when trying to resolve a name from a [crate::Context]
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// No factory is registered for the name
    #[error("No factory found for '{0}'")]
    NotFound(String),
    /// The resolved value is not of the required type
    #[error("Resolved '{name}' as '{}', but '{expected}' was required", .actual.type_name())]
    TypeMismatch {
        name: String,
        actual: Instance,
        expected: TypeInfo,
    },
    /// The factory failed to construct a value
    #[error("Factory for '{name}' failed - {error}")]
    ConstructionFailed {
        name: String,
        #[source]
        error: FactoryError,
    },
}

/// A single cleanup which failed during [crate::Context::dispose]
#[derive(Error, Debug, Clone)]
#[error("Cleanup #{index} for '{name}' failed - error: {error}")]
pub struct DisposeFailure {
    /// Position in registration order
    pub index: usize,
    pub name: String,
    pub error: Arc<DynError>,
}

/// All cleanups which failed during [crate::Context::dispose]
#[derive(Error, Debug, Clone)]
pub struct DisposeErrors {
    pub failures: Vec<DisposeFailure>,
}
impl std::fmt::Display for DisposeErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("One or more cleanups failed:".to_string());
        for failure in &self.failures {
            display.push(format!("- {}", failure));
        }
        f.write_str(&display.join("\n"))
    }
}

/// Errors when building a [crate::Context] through the [crate::ContextBuilder]
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    #[error("A factory has been registered twice: '{0}'")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_both_types() {
        let err = ResolveError::TypeMismatch {
            name: "db".into(),
            actual: Instance::new(5_i64),
            expected: TypeInfo::of::<String>(),
        };
        assert_eq!(
            err.to_string(),
            "Resolved 'db' as 'i64', but 'alloc::string::String' was required"
        );
    }

    #[test]
    fn dispose_errors_list_every_failure() {
        let errors = DisposeErrors {
            failures: vec![
                DisposeFailure {
                    index: 0,
                    name: "a".into(),
                    error: Arc::new("first".into()),
                },
                DisposeFailure {
                    index: 2,
                    name: "b".into(),
                    error: Arc::new("second".into()),
                },
            ],
        };
        assert_eq!(
            errors.to_string(),
            "One or more cleanups failed:\n- Cleanup #0 for 'a' failed - error: first\n- Cleanup #2 for 'b' failed - error: second"
        );
    }
}
