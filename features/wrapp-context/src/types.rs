use std::{
    any::{Any, TypeId},
    fmt::Debug,
    sync::Arc,
};

/// All factory and cleanup errors are boxed into this
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Resolutions may happen from any thread
/// So anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// A value produced by a factory, with its concrete type erased
///
/// Cloning an instance shares the underlying value.
#[derive(Clone)]
pub struct Instance {
    info: TypeInfo,
    instance: Arc<dyn Any + Send + Sync + 'static>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

impl Instance {
    pub fn new<ExistingInstance: Injectable>(instance: ExistingInstance) -> Self {
        Self::from_arc(Arc::new(instance))
    }

    /// Wraps an already shared value without cloning it
    pub fn from_arc<ExistingInstance: Injectable>(instance: Arc<ExistingInstance>) -> Self {
        Instance {
            info: TypeInfo::of::<ExistingInstance>(),
            instance,
        }
    }

    /// Type of the wrapped value
    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub fn type_name(&self) -> &'static str {
        self.info.type_name
    }

    pub fn is<T: Injectable>(&self) -> bool {
        self.info.type_id == TypeId::of::<T>()
    }

    /// Checked downcast to the concrete type
    ///
    /// Returns the actual type of the instance if it is not a `T`.
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, TypeInfo> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info),
        }
    }

    /// True if both instances share the same value
    pub fn ptr_eq(this: &Instance, other: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&this.instance), Arc::as_ptr(&other.instance))
    }
}

type CleanupFn = dyn Fn() -> Result<(), DynError> + Send + Sync + 'static;

/// Action releasing whatever a factory acquired
///
/// Cloning a cleanup shares the action, it is still the same cleanup.
#[derive(Clone)]
pub struct Cleanup(Arc<CleanupFn>);
impl Debug for Cleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cleanup")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl Cleanup {
    /// Cleanup which can not fail
    pub fn new(cleanup: impl Fn() + Send + Sync + 'static) -> Self {
        Cleanup(Arc::new(move || {
            cleanup();
            Ok(())
        }))
    }

    /// Cleanup which may fail - failures are reported by [crate::Context::dispose]
    pub fn fallible<E: Into<DynError>>(
        cleanup: impl Fn() -> Result<(), E> + Send + Sync + 'static,
    ) -> Self {
        Cleanup(Arc::new(move || cleanup().map_err(Into::into)))
    }

    /// Cleanup that does nothing
    pub fn noop() -> Self {
        Cleanup(Arc::new(|| Ok(())))
    }

    pub fn run(&self) -> Result<(), DynError> {
        (self.0)()
    }

    /// True if both are the same cleanup action
    pub fn ptr_eq(this: &Cleanup, other: &Cleanup) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&this.0), Arc::as_ptr(&other.0))
    }
}

/// What a factory hands out on every invocation
#[derive(Debug, Clone)]
pub struct Product {
    pub instance: Instance,
    pub cleanup: Cleanup,
}
impl Product {
    pub fn new<T: Injectable>(value: T, cleanup: Cleanup) -> Self {
        Product {
            instance: Instance::new(value),
            cleanup,
        }
    }

    /// Product without anything to clean up
    pub fn value<T: Injectable>(value: T) -> Self {
        Self::new(value, Cleanup::noop())
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}
