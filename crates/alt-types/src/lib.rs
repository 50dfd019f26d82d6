//! Shared error kinds and capability ports for the alt backend mesh.
//!
//! This crate exists to break circular dependencies between `alt-fetch`,
//! `alt-security`, and `alt-api`: each depends on the trait definitions here
//! rather than on each other's concrete types.

pub mod errors;
pub mod ports;
pub mod secrets;

pub use errors::{CoreError, CoreResult};
