//! Wrapp Context is a small service locator: named factories, resolved on demand, with every
//! handed out cleanup collected for teardown.
//!
//! Wrapp Context consists of the following components:
//!
//! 1. Factory - anything producing a value and its cleanup, closures included
//! 2. Shared - wraps a factory so it constructs once, no matter how many threads resolve it
//! 3. Context - resolves names, registers cleanups and runs them all on dispose
//! 4. ContextBuilder - registers factories and instances and checks their names
//! 5. Resolvable - resolution strategies (`Arc<T>`, `Option<_>`, `Lazy<T>`)
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wrapp_context::{Cleanup, Context, Product};
//!
//! struct Pool {
//!     url: String,
//! }
//!
//! let ctx = Context::builder()
//!     .add_instance("url", String::from("postgres://localhost"))
//!     .add_shared("pool", || {
//!         let pool = Pool { url: "postgres://localhost".into() };
//!         Product::new(pool, Cleanup::new(|| println!("closing pool")))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let first = ctx.require::<Pool>("pool");
//! let second = ctx.require::<Pool>("pool");
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(first.url, *ctx.require::<String>("url"));
//!
//! // Runs the pool's cleanup once per resolution, in resolution order
//! ctx.dispose().unwrap();
//! ```

pub mod builder;
pub mod context;
pub mod errors;
pub mod factories;
pub mod options;
pub mod resolver;
pub mod shared;
pub mod types;

pub use builder::ContextBuilder;
pub use context::Context;
pub use errors::{BuildError, DisposeErrors, DisposeFailure, FactoryError, ResolveError};
pub use factories::{Factories, Factory, IntoProduct};
pub use options::{ContextOptions, MismatchCleanup};
pub use resolver::{lazy::Lazy, Resolvable};
pub use shared::{shared, Shared, SharedState};
pub use types::{Cleanup, DynError, Injectable, Instance, Product, TypeInfo};
