use std::{
    fmt::Debug,
    sync::{Arc, Mutex, OnceLock},
};

use crate::{errors::FactoryError, factories::Factory, types::Product};

/// Wraps a factory so its construction logic runs at most once
///
/// Shorthand for [Shared::new]
pub fn shared<F: Factory + 'static>(factory: F) -> Shared {
    Shared::new(factory)
}

/// Factory which constructs once and hands the same product to every caller
///
/// The first invocation, from whichever thread gets there first, runs the wrapped factory.
/// Every other invocation, concurrent or later, waits for that construction and receives the
/// same instance and the same cleanup.
///
/// There is no retry: a failed construction is stored like a successful one, and every caller
/// receives the same [FactoryError]. If the wrapped factory panics, the panic unwinds in the
/// constructing caller and all later callers get [FactoryError::Poisoned].
///
/// Clones share their state.
///
/// ### Deadlocks
///
/// A wrapped factory must not invoke its own `Shared` wrapper while constructing.
#[derive(Clone)]
pub struct Shared(Arc<SharedInner>);
struct SharedInner {
    factory: Box<dyn Factory>,
    factory_name: &'static str,
    /// Set exactly once, while holding `construction`
    outcome: OnceLock<Result<Product, FactoryError>>,
    /// Only one caller may run the wrapped factory
    construction: Mutex<()>,
}
impl Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("factory", &self.0.factory_name)
            .field("state", &self.state())
            .finish()
    }
}

/// Construction state of a [Shared] factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedState {
    /// Nothing constructed yet
    Pending,
    /// The one construction has completed, successfully or not
    Computed,
}

impl Shared {
    pub fn new<F: Factory + 'static>(factory: F) -> Self {
        Shared(Arc::new(SharedInner {
            factory: Box::new(factory),
            factory_name: std::any::type_name::<F>(),
            outcome: OnceLock::new(),
            construction: Mutex::new(()),
        }))
    }

    pub fn state(&self) -> SharedState {
        match self.0.outcome.get() {
            Some(_) => SharedState::Computed,
            None => SharedState::Pending,
        }
    }

    /// True if both handles share the same state
    pub fn ptr_eq(this: &Shared, other: &Shared) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl Factory for Shared {
    fn construct(&self) -> Result<Product, FactoryError> {
        let inner = &self.0;
        if let Some(outcome) = inner.outcome.get() {
            tracing::trace!("Reusing shared product of {}", inner.factory_name);
            return outcome.clone();
        }

        // Racing callers block here until the winner has published its outcome
        let _construction = match inner.construction.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::error!(
                    "Shared factory {} panicked during construction",
                    inner.factory_name
                );
                return Err(FactoryError::Poisoned);
            }
        };

        // Double check - the outcome might have been set while we waited for the lock
        if let Some(outcome) = inner.outcome.get() {
            return outcome.clone();
        }

        tracing::debug!("Constructing shared product of {}", inner.factory_name);
        let outcome = inner.factory.construct();
        if let Err(err) = &outcome {
            tracing::warn!(
                "Shared factory {} failed, the failure is kept: {err}",
                inner.factory_name
            );
        }

        inner.outcome.get_or_init(|| outcome).clone()
    }
}
