//! Configuration loading for the alt backend mesh.
//!
//! Configuration is loaded once, at process start, into a typed
//! [`AppConfig`] and handed to handlers through the dependency-injected
//! application state — nothing here is read lazily from `std::env` at
//! request time (see the "Global state" design note: process-wide values
//! are explicitly constructed and passed in, never ambient singletons).

mod config;
mod env;

pub use config::{AppConfig, ConfigError, DosProtectionConfig, KratosConfig, ProxyStrategy};
pub use env::{EnvConfigLoader, EnvError};
