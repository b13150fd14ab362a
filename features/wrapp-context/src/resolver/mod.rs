use crate::{context::Context, errors::ResolveError};

pub mod arc;
pub mod lazy;

/// Allows custom behaviour on resolution
///
/// Used through [Context::resolve_as]
pub trait Resolvable {
    fn resolve(ctx: &Context, name: &str) -> Result<Self, ResolveError>
    where
        Self: Sized;
}
