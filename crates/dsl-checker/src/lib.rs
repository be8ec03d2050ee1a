//! Dungeon DSL Checker
//!
//! Semantic analysis of parsed DSL programs.
//!
//! This crate provides:
//! - The syntax tree nodes the analysis works on, with a visitor
//! - Symbol ↔ node relations
//! - Type binding of prototype definitions
//! - Diagnostics rendering
//!
//! # Usage
//!
//! ```ignore
//! use dsl_checker::{create_files, Diagnostic, TypeBinder};
//! use dsl_types::TypeEnvironment;
//!
//! let mut env = TypeEnvironment::new();
//! env.load_types(&host_types)?;
//!
//! let files = create_files("level.dng", source);
//! let outcome = TypeBinder::new(env.types_mut()).bind_program(&program);
//! for error in &outcome.errors {
//!     Diagnostic::from_bind_error(error, 0).emit(&files)?;
//! }
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod symbols;
pub mod binder;
pub mod diagnostic;
pub mod error;

pub use ast::{AstVisitor, NodeId, NodeIds, Program, Span};
pub use binder::{BindOutcome, TypeBinder};
pub use diagnostic::{create_files, render_all, Diagnostic, ErrorCode, JsonDiagnostic, SourceFiles};
pub use error::BindError;
pub use symbols::SymbolTable;
