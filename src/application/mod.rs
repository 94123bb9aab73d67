//! Application layer - Provider wiring.
//!
//! Builds the set of payment providers from configuration and exposes them
//! by ID to the HTTP adapter.

pub mod registry;

pub use registry::{ConfigField, ProviderManifest, ProviderRegistry, RegistryError};
