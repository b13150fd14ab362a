use std::{
    fmt::Debug,
    ops::Deref,
    sync::{Arc, OnceLock},
};

use crate::{
    context::Context,
    errors::ResolveError,
    resolver::Resolvable,
    types::Injectable,
};

/// Lazily resolved value
///
/// Resolving a `Lazy` only checks that the name is registered. The value is resolved from the
/// context on first access, exactly once even if accessed from many threads; only then is its
/// cleanup registered. Later accesses reuse the result.
///
/// Clones share the result.
///
/// ### Panics
///
/// [Lazy::get] and [Deref] panic if the deferred resolution failed, use [Lazy::try_get] to
/// handle the error.
pub struct Lazy<T: Injectable>(Arc<LazyInner<T>>);
impl<T: Injectable> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Lazy(self.0.clone())
    }
}
impl<T: Injectable + Debug> Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.once.get() {
            Some(result) => f.debug_tuple("Lazy").field(result).finish(),
            None => f.debug_tuple("Lazy").field(&self.0.name).finish(),
        }
    }
}
struct LazyInner<T: Injectable> {
    ctx: Context,
    name: String,
    once: OnceLock<Result<Arc<T>, ResolveError>>,
}
impl<T: Injectable> Deref for Lazy<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}
impl<T: Injectable> Resolvable for Lazy<T> {
    fn resolve(ctx: &Context, name: &str) -> Result<Self, ResolveError>
    where
        Self: Sized,
    {
        // Check if we got an immediate error
        if !ctx.contains(name) {
            return Err(ResolveError::NotFound(name.to_string()));
        }

        Ok(Lazy(Arc::new(LazyInner {
            ctx: ctx.clone(),
            name: name.to_string(),
            once: OnceLock::new(),
        })))
    }
}
impl<T: Injectable> Lazy<T> {
    /// Accesses the lazy value, resolving it on first access
    ///
    /// # Panics
    /// - When the resolution failed
    #[track_caller]
    pub fn get(&self) -> &Arc<T> {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("Lazy '{}' failed to resolve: {err}", self.0.name),
        }
    }

    /// Try to access the lazy value, resolving it on first access
    pub fn try_get(&self) -> Result<&Arc<T>, &ResolveError> {
        self.0
            .once
            .get_or_init(|| {
                tracing::debug!("Resolving lazy '{}'", self.0.name);
                self.0.ctx.resolve_typed::<T>(&self.0.name)
            })
            .as_ref()
    }

    /// True once the value has been resolved, successfully or not
    pub fn is_resolved(&self) -> bool {
        self.0.once.get().is_some()
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}
