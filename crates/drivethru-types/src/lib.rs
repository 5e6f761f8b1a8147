//! Common types module for the drive-thru order service.
//!
//! This module defines the data types shared by every crate in the workspace:
//! menu items and quantities, order records, HTTP request/response bodies,
//! and the configuration validation primitives used by pluggable
//! implementations.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Menu items, parsed quantities and order records.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Secure string type for API keys.
pub mod secret_string;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use validation::*;
