use wrapp_context::TypeInfo;

/// Errors when trying to register or acquire a config
#[derive(thiserror::Error, Debug, Clone)]
pub enum ConfigError {
    /// No config is registered under the name
    #[error("The config '{0}' is not known")]
    Missing(String),
    /// A config is already registered under the name
    #[error("The config '{0}' is already registered")]
    AlreadyRegistered(String),
    /// The config is registered with another type
    #[error("The config '{name}' is a '{actual}', but '{required}' was required")]
    TypeMismatch {
        name: String,
        required: TypeInfo,
        actual: TypeInfo,
    },
}
