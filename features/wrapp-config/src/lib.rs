//! Wrapp Config provides a registry of named configs that can be resolved from a
//! [wrapp_context::Context] like any other value.
//!
//! Wrapp Config is split into two major parts:
//! 1. ConfigProvider: Used to create the registry of all configs and register them on a builder
//! 2. Config<T>: A wrapper type to be able to resolve and retrieve configs
//!
//! # Examples
//!
//! ```rust
//! use wrapp_config::{config::Config, provider::ConfigProvider};
//! use wrapp_context::ContextBuilder;
//!
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut config_provider = ConfigProvider::initialize();
//! if let Err(e) = config_provider.add_config(
//!     "app",
//!     AppConfig {
//!         host: "localhost".to_string(),
//!         port: 8080_u16,
//!     },
//! ) {
//!     eprintln!("{e}");
//!     return;
//! }
//!
//! let ctx = config_provider
//!     .register(ContextBuilder::new())
//!     .add_factory("url", || {
//!         wrapp_context::Product::value(String::from("http://localhost:8080"))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let app: Config<AppConfig> = ctx.resolve_as("app").unwrap();
//! assert_eq!(app.host, "localhost");
//! assert_eq!(app.port, 8080);
//! ```
//!
//! Wrapp Config consists of the following components:
//!
//! 1. Config - for resolving a named config from a context
//! 2. Provider - for creating a registry of configs, adding and retrieving configs
//! 3. Errors - for config errors

pub mod config;
pub mod errors;
pub mod provider;
