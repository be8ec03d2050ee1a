//! Binding errors

use dsl_types::TypeError;
use thiserror::Error;

use crate::ast::Span;

/// Errors recorded while binding prototype definitions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BindError {
    /// A prototype name that is already bound
    #[error("Duplicate definition of '{name}'")]
    DuplicateDefinition {
        /// Definition name
        name: String,
        /// Location of the duplicate
        span: Span,
    },

    /// A component reference that does not resolve
    #[error("Undefined type '{name}'")]
    UnresolvedType {
        /// Referenced name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// A component reference that resolves to something other than a type
    #[error("'{name}' is not a type")]
    NotAType {
        /// Referenced name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// The same component referenced twice in one prototype
    #[error("Component '{name}' is already part of '{prototype}'")]
    DuplicateComponent {
        /// Prototype name
        prototype: String,
        /// Component name
        name: String,
        /// Location of the second reference
        span: Span,
    },

    /// The finished prototype type could not be registered
    #[error("Cannot register prototype '{name}': {source}")]
    Registration {
        /// Prototype name
        name: String,
        /// Underlying type error
        source: TypeError,
        /// Location of the definition
        span: Span,
    },
}

impl BindError {
    /// Source location of the error
    pub fn span(&self) -> Span {
        match self {
            BindError::DuplicateDefinition { span, .. }
            | BindError::UnresolvedType { span, .. }
            | BindError::NotAType { span, .. }
            | BindError::DuplicateComponent { span, .. }
            | BindError::Registration { span, .. } => *span,
        }
    }
}
