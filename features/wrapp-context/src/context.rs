use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    builder::ContextBuilder,
    errors::{DisposeErrors, DisposeFailure, ResolveError},
    factories::Factories,
    options::{ContextOptions, MismatchCleanup},
    resolver::Resolvable,
    types::{Cleanup, Injectable, Instance, Product, TypeInfo},
};

/// Resolves values by name and keeps track of every cleanup it handed out
///
/// Every successful resolution registers the cleanup of the product, repeated resolutions of the
/// same name included. [Context::dispose] runs them all in registration order.
///
/// Cheap to clone, clones refer to the same context.
#[derive(Clone)]
pub struct Context(Arc<ContextInner>);
struct ContextInner {
    factories: Arc<Factories>,
    options: ContextOptions,
    /// Append only, in registration order
    disposables: Mutex<Vec<Registration>>,
}
struct Registration {
    name: String,
    cleanup: Cleanup,
}
impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Context")
            .field("factories", &names)
            .field("disposables", &self.disposable_count())
            .finish()
    }
}

impl Context {
    pub fn new(factories: impl Into<Arc<Factories>>) -> Self {
        Self::with_options(factories, ContextOptions::default())
    }

    pub fn with_options(factories: impl Into<Arc<Factories>>, options: ContextOptions) -> Self {
        let factories = factories.into();
        tracing::debug!("Creating context with {} factories", factories.len());
        Context(Arc::new(ContextInner {
            factories,
            options,
            disposables: Mutex::new(Vec::new()),
        }))
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Constructs the value registered as `name`
    ///
    /// Registers the cleanup of the product for [Context::dispose]
    pub fn resolve(&self, name: &str) -> Result<Instance, ResolveError> {
        let Product { instance, cleanup } = self.construct(name)?;
        self.register(name, cleanup);
        Ok(instance)
    }

    /// Constructs the value registered as `name` and checks that it is a `T`
    ///
    /// On a mismatch the cleanup is handled as configured by [ContextOptions::on_type_mismatch]
    pub fn resolve_typed<T: Injectable>(&self, name: &str) -> Result<Arc<T>, ResolveError> {
        let Product { instance, cleanup } = self.construct(name)?;

        match instance.downcast::<T>() {
            Ok(value) => {
                self.register(name, cleanup);
                Ok(value)
            }
            Err(actual) => {
                let expected = TypeInfo::of::<T>();
                match self.0.options.on_type_mismatch {
                    MismatchCleanup::Register => self.register(name, cleanup),
                    MismatchCleanup::Discard => tracing::warn!(
                        "Discarding cleanup of '{name}', it produced '{actual}' instead of '{expected}'"
                    ),
                }

                Err(ResolveError::TypeMismatch {
                    name: name.to_string(),
                    actual: instance,
                    expected,
                })
            }
        }
    }

    /// Resolves `name` as a `T`
    ///
    /// # Panics
    /// - If `name` is not registered, the factory fails or does not produce a `T`
    #[track_caller]
    pub fn require<T: Injectable>(&self, name: &str) -> Arc<T> {
        match self.resolve_typed(name) {
            Ok(value) => value,
            Err(err) => panic!("Failed to require '{name}': {err}"),
        }
    }

    /// Resolves `name` using the strategy of `R`
    pub fn resolve_as<R: Resolvable>(&self, name: &str) -> Result<R, ResolveError> {
        R::resolve(self, name)
    }

    /// Runs every registered cleanup, in the order they were registered
    ///
    /// A failing cleanup does not stop the remaining ones, all failures are returned together.
    /// Panics are not caught.
    ///
    /// Calling this twice runs every cleanup again.
    pub fn dispose(&self) -> Result<(), DisposeErrors> {
        // Run outside the lock, cleanups may resolve from this context
        let registrations: Vec<_> = self
            .disposables()
            .iter()
            .map(|registration| (registration.name.clone(), registration.cleanup.clone()))
            .collect();

        tracing::debug!("Disposing {} cleanups", registrations.len());

        let mut failures = Vec::new();
        for (index, (name, cleanup)) in registrations.into_iter().enumerate() {
            if let Err(error) = cleanup.run() {
                tracing::warn!("Cleanup #{index} for '{name}' failed: {error}");
                failures.push(DisposeFailure {
                    index,
                    name,
                    error: Arc::new(error),
                });
            }
        }

        if !failures.is_empty() {
            return Err(DisposeErrors { failures });
        }

        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.factories.contains_key(name)
    }

    /// Names of all registered factories, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.factories.keys().map(String::as_str)
    }

    /// Number of cleanups registered so far
    pub fn disposable_count(&self) -> usize {
        self.disposables().len()
    }

    pub fn options(&self) -> &ContextOptions {
        &self.0.options
    }
}
impl Context {
    /// Runs the factory for `name` without registering anything
    fn construct(&self, name: &str) -> Result<Product, ResolveError> {
        let Some(factory) = self.0.factories.get(name) else {
            tracing::debug!("Tried to resolve an unregistered name: {name}");
            return Err(ResolveError::NotFound(name.to_string()));
        };

        factory.construct().map_err(|error| {
            tracing::warn!("Factory for '{name}' failed: {error}");
            ResolveError::ConstructionFailed {
                name: name.to_string(),
                error,
            }
        })
    }

    fn register(&self, name: &str, cleanup: Cleanup) {
        let mut disposables = self.disposables();
        disposables.push(Registration {
            name: name.to_string(),
            cleanup,
        });
        tracing::debug!("Registered cleanup #{} for '{name}'", disposables.len() - 1);
    }

    /// The list is consistent even if a holder panicked, so poisoning is ignored
    fn disposables(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.0
            .disposables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
