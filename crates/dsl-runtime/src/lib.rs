//! Dungeon DSL Runtime
//!
//! Turns evaluated DSL values into live host objects.
//!
//! This crate provides:
//! - Values and memory spaces produced by the interpreter
//! - The type instantiator for records, classes and adapter types
//! - Callback adapters letting host code call DSL functions
//! - The `instantiate` / `instantiate_named` entity built-ins
//! - Engine configuration
//!
//! Host values are reference counted without atomics; an engine instance and
//! everything it hands out stays on the thread that created it.

#![warn(missing_docs)]

pub mod callback;
pub mod config;
pub mod error;
pub mod instantiator;
pub mod interpreter;
pub mod native;
pub mod value;

pub use callback::{CallbackAdapter, CallbackAdapterBuilder, CallbackWrapper};
pub use config::EngineConfig;
pub use error::{ConfigError, InstantiationError, RuntimeError};
pub use instantiator::TypeInstantiator;
pub use interpreter::Interpreter;
pub use native::{EntityHost, EntityInstantiator};
pub use value::{Callable, MemorySpace, Value, ValueRepr};
