use std::sync::Arc;

use crate::{
    context::Context,
    errors::ResolveError,
    resolver::Resolvable,
    types::{Injectable, Instance},
};

impl<T: Injectable> Resolvable for Arc<T> {
    fn resolve(ctx: &Context, name: &str) -> Result<Self, ResolveError> {
        ctx.resolve_typed::<T>(name)
    }
}

impl Resolvable for Instance {
    fn resolve(ctx: &Context, name: &str) -> Result<Self, ResolveError> {
        ctx.resolve(name)
    }
}

impl<R: Resolvable> Resolvable for Option<R> {
    fn resolve(ctx: &Context, name: &str) -> Result<Self, ResolveError>
    where
        Self: Sized,
    {
        match R::resolve(ctx, name) {
            Ok(resolved) => Ok(Some(resolved)),
            // If the name is not registered Option does not fail
            Err(ResolveError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
