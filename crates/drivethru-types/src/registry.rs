//! Registry trait for self-registering implementations.
//!
//! Each pluggable implementation (currently the order interpreters) exposes
//! a `Registry` struct declaring the name it is configured under and the
//! factory that builds it from TOML.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "openai" for `interpreter.implementations.openai`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
