use std::{collections::HashMap, sync::Arc};

use crate::{
    errors::FactoryError,
    types::{DynError, Product},
};

/// Named factories, handed to a [crate::Context] once and never changed afterwards
pub type Factories = HashMap<String, Arc<dyn Factory>>;

/// A factory producing a value and the cleanup releasing it
///
/// Implemented for any `Fn() -> Product` or `Fn() -> Result<Product, E>` closure
pub trait Factory: Send + Sync {
    /// Runs the construction logic of the factory
    ///
    /// The returned cleanup is run at most once per handout by the context's teardown
    fn construct(&self) -> Result<Product, FactoryError>;
}

/// Anything a factory closure may return
pub trait IntoProduct {
    fn into_product(self) -> Result<Product, FactoryError>;
}
impl IntoProduct for Product {
    fn into_product(self) -> Result<Product, FactoryError> {
        Ok(self)
    }
}
impl<E: Into<DynError>> IntoProduct for Result<Product, E> {
    fn into_product(self) -> Result<Product, FactoryError> {
        self.map_err(FactoryError::failed)
    }
}

// Impl Factory for any closure
impl<Fun, Output> Factory for Fun
where
    Fun: Fn() -> Output + Send + Sync,
    Output: IntoProduct,
{
    fn construct(&self) -> Result<Product, FactoryError> {
        self().into_product()
    }
}
