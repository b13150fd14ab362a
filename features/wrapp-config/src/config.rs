use std::{ops::Deref, sync::Arc};

use wrapp_context::{Context, Injectable, Resolvable, ResolveError};

/// A wrapper type to allow for config injections
///
/// This provides a simple way to retrieve configs registered through a
/// [crate::provider::ConfigProvider] from a [Context]
///
/// # Example
/// ```rust
/// use wrapp_config::{config::Config, provider::ConfigProvider};
/// use wrapp_context::ContextBuilder;
///
/// pub struct MyModuleConfig {
///     enabled: bool,
/// }
///
/// let mut config_provider = ConfigProvider::initialize();
/// config_provider
///     .add_config("my_module", MyModuleConfig { enabled: true })
///     .unwrap();
///
/// let ctx = config_provider.register(ContextBuilder::new()).build().unwrap();
/// let config: Config<MyModuleConfig> = ctx.resolve_as("my_module").unwrap();
/// assert!(config.enabled);
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Config<T> {
    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: Injectable> Resolvable for Config<T> {
    fn resolve(ctx: &Context, name: &str) -> Result<Self, ResolveError>
    where
        Self: Sized,
    {
        let inner = ctx.resolve_typed::<T>(name)?;
        Ok(Config { inner })
    }
}
