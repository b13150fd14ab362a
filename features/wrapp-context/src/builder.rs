use std::sync::Arc;

use crate::{
    context::Context,
    errors::BuildError,
    factories::{Factories, Factory},
    options::ContextOptions,
    shared::Shared,
    types::{Cleanup, Injectable, Instance, Product},
};

//////////////////////////////////////////////////////////////////////
///
/// Collects named factories and instances, checks them and creates a [Context].
///
/// Names must be unique, a name registered twice fails the build.
pub struct ContextBuilder {
    /// Registered factories, in registration order
    pub(crate) registered_factories: Vec<(String, Arc<dyn Factory>)>,
    pub(crate) options: ContextOptions,
}
impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        ContextBuilder {
            registered_factories: Vec::new(),
            options: ContextOptions::default(),
        }
    }
}
impl ContextBuilder {
    /// Registers a factory which constructs on every resolution
    pub fn add_factory<F: Factory + 'static>(self, name: impl Into<String>, factory: F) -> Self {
        self.add_dyn_factory(name, Arc::new(factory))
    }

    /// Registers a factory which constructs once, on the first resolution
    pub fn add_shared<F: Factory + 'static>(self, name: impl Into<String>, factory: F) -> Self {
        self.add_factory(name, Shared::new(factory))
    }

    /// Registers an already created value
    ///
    /// Every resolution returns the same value, there is nothing to clean up
    pub fn add_instance<T: Injectable>(self, name: impl Into<String>, instance: T) -> Self {
        let instance = Instance::new(instance);
        self.add_factory(name, move || Product {
            instance: instance.clone(),
            cleanup: Cleanup::noop(),
        })
    }

    pub fn add_dyn_factory(mut self, name: impl Into<String>, factory: Arc<dyn Factory>) -> Self {
        self.registered_factories.push((name.into(), factory));
        self
    }

    pub fn with_options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<Context, BuildError> {
        let ContextBuilder {
            registered_factories,
            options,
        } = self;

        tracing::debug!(
            "Building context with {} factories",
            registered_factories.len()
        );

        let mut factories = Factories::with_capacity(registered_factories.len());
        for (name, factory) in registered_factories {
            if factories.contains_key(&name) {
                return Err(BuildError::Duplicate(name));
            }
            factories.insert(name, factory);
        }

        Ok(Context::with_options(factories, options))
    }
}
