//! Type construction errors
//!
//! Everything in here is a configuration error: it is raised while deriving
//! DSL types from host registrations and aborts that build step.

use thiserror::Error;

/// Errors that can occur while building or registering DSL types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// A type with the same name already exists in the global scope
    #[error("Type name '{name}' is already bound in the global scope")]
    DuplicateTypeName {
        /// Colliding type name
        name: String,
    },

    /// A named type would take a name reserved for list, set, map or function types
    #[error("'{name}' is not a valid type name: it has the shape of a structural type name")]
    StructuralTypeName {
        /// Rejected name
        name: String,
    },

    /// A name resolved in the global scope, but not to a type
    #[error("'{name}' is bound in the global scope, but is not a type")]
    NotAType {
        /// Name that was resolved
        name: String,
    },

    /// A host class was reached again while its own type was being derived
    #[error("Recursive type definition: '{class}' is already being derived")]
    RecursiveTypeDefinition {
        /// Host class that closed the cycle
        class: String,
    },

    /// A host class was referenced but never registered
    #[error("Host class '{class}' is not registered")]
    UnknownHostClass {
        /// Name of the host class
        class: String,
    },

    /// A host class is registered but does not carry the DSL type marker
    #[error("Host class '{class}' is not marked as a DSL type")]
    NotDslType {
        /// Name of the host class
        class: String,
    },

    /// A DSL-visible member whose host type has no DSL counterpart
    #[error("Member '{field}' of '{class}' could not be translated: no DSL type for '{host_type}'")]
    UntranslatableMember {
        /// Owning host class
        class: String,
        /// Field name
        field: String,
        /// Rendered host type of the field
        host_type: String,
    },

    /// Two members of the same type map to the same DSL name
    #[error("Duplicate member '{name}' in type '{owner}'")]
    DuplicateMember {
        /// Owning type name
        owner: String,
        /// Member name
        name: String,
    },

    /// No function type builder is registered for a callback kind
    #[error("No function type builder registered for callback kind '{kind}'")]
    MissingFunctionTypeBuilder {
        /// Callback kind name
        kind: String,
    },

    /// A callback signature has the wrong number of type arguments
    #[error("Callback kind '{kind}' expects {expected} type arguments, got {actual}")]
    CallbackArity {
        /// Callback kind name
        kind: String,
        /// Expected type argument count
        expected: usize,
        /// Actual type argument count
        actual: usize,
    },

    /// An adapter class has no marked static method
    #[error("Adapter '{adapter}' has no marked static adapter method")]
    NoAdapterMethod {
        /// Adapter class name
        adapter: String,
    },

    /// Another adapter already produces the same host type
    #[error("Cannot register adapter method '{method}': '{produced}' is already adapted by '{existing}'")]
    DuplicateAdapter {
        /// Produced host class
        produced: String,
        /// Method being registered
        method: String,
        /// Method that was registered first
        existing: String,
    },

    /// Adapter methods need at least one parameter
    #[error("Adapter method '{method}' has no parameters, which is not supported")]
    ZeroParameterAdapter {
        /// Adapter method name
        method: String,
    },

    /// Single-parameter adapters only accept built-in parameter types
    #[error("Adapter method '{method}' takes parameter '{parameter}' of non built-in type '{host_type}', which is not supported")]
    UnsupportedAdapterParameter {
        /// Adapter method name
        method: String,
        /// Parameter name
        parameter: String,
        /// Rendered host type of the parameter
        host_type: String,
    },

    /// A type id that does not belong to this context
    #[error("Unknown type id {id}")]
    UnknownTypeId {
        /// Raw id
        id: u32,
    },
}
