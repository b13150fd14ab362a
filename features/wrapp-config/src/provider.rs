use std::{collections::HashMap, sync::Arc};

use wrapp_context::{Cleanup, ContextBuilder, Injectable, Instance, Product, TypeInfo};

use crate::errors::ConfigError;

/// A provider to register all configs.
///
/// Configs are registered and retrieved by name, and can be handed to a [ContextBuilder]
/// so factories and callers resolve them like any other value.
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<String, Instance>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn initialize() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Retrieve the config registered as `name`.
    ///
    /// Returns `Ok(None)` if no config has that name, and a [`ConfigError`] if it is not a `T`
    pub fn get_config<T: Injectable>(&self, name: &str) -> Result<Option<Arc<T>>, ConfigError> {
        self.configs
            .get(name)
            .map(|instance| {
                instance
                    .downcast::<T>()
                    .map_err(|actual| ConfigError::TypeMismatch {
                        name: name.to_string(),
                        required: TypeInfo::of::<T>(),
                        actual,
                    })
            })
            .transpose()
    }

    /// Like [`ConfigProvider::get_config`], but a missing config is an error
    pub fn require_config<T: Injectable>(&self, name: &str) -> Result<Arc<T>, ConfigError> {
        self.get_config(name)?
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    /// Add a config to the registry.
    ///
    /// If the name is already registered, it will return a
    /// [`ConfigError`] runtime error
    pub fn add_config<T: Injectable>(
        &mut self,
        name: impl Into<String>,
        config: T,
    ) -> Result<&mut Self, ConfigError> {
        let name = name.into();

        if self.configs.contains_key(&name) {
            return Err(ConfigError::AlreadyRegistered(name));
        }

        tracing::debug!("Registered config '{name}' of type {}", std::any::type_name::<T>());
        self.configs.insert(name, Instance::new(config));
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Injectable>(
        &mut self,
        name: impl Into<String>,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(name, c),
            None => Ok(self),
        }
    }

    /// Registers every config on the builder
    ///
    /// Each config resolves to the same shared value and has nothing to clean up
    pub fn register(&self, mut builder: ContextBuilder) -> ContextBuilder {
        for (name, instance) in &self.configs {
            let instance = instance.clone();
            builder = builder.add_factory(name.clone(), move || Product {
                instance: instance.clone(),
                cleanup: Cleanup::noop(),
            });
        }
        builder
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
