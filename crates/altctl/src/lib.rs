//! Stack orchestrator for the alt backend mesh (spec §4.7, §6): a
//! dependency-resolving command planner over a named set of service
//! stacks, driving their container lifecycles via external
//! `docker compose` invocations.

pub mod config;
pub mod error;
pub mod executor;
pub mod output;
pub mod registry;
pub mod resolver;

pub use error::{CliError, ExitCode};

/// CLI version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
