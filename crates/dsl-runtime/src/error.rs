//! Runtime errors

use dsl_types::HostError;
use thiserror::Error;

/// Errors raised while turning DSL values into host objects
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InstantiationError {
    /// No constructor fits the instantiation path of the class
    #[error("Could not find a suitable constructor to instantiate {class}")]
    MissingConstructor {
        /// Host class name
        class: String,
    },

    /// A constructor parameter is not sourced from the context
    #[error("Constructor parameter '{parameter}' of {class} is not a context parameter")]
    UnmarkedParameter {
        /// Host class name
        class: String,
        /// Parameter name
        parameter: String,
    },

    /// A context parameter names a context member that was not pushed
    #[error("Context member '{name}' required by {class} is not available")]
    MissingContextValue {
        /// Host class name
        class: String,
        /// Context name
        name: String,
    },

    /// A callback field's kind has no registered adapter builder
    #[error("No callback adapter builder registered for '{kind}' (field '{field}' of {class})")]
    MissingCallbackBuilder {
        /// Host class name
        class: String,
        /// Field name
        field: String,
        /// Callback kind name
        kind: String,
    },

    /// An enum value names no variant of its enum
    #[error("'{variant}' is not a variant of enum '{ty}'")]
    UnknownVariant {
        /// DSL type name
        ty: String,
        /// Variant name
        variant: String,
    },

    /// Member (inner) classes need an enclosing instance
    #[error("Cannot instantiate inner class {class}")]
    InnerClass {
        /// Host class name
        class: String,
    },

    /// A record constructor parameter has no DSL-visible field
    #[error("Record {class}: constructor parameter '{field}' is not a DSL-visible field")]
    RecordFieldNotVisible {
        /// Host class name
        class: String,
        /// Field name
        field: String,
    },

    /// A record component has no value
    #[error("Record {class}: field '{field}' cannot be resolved in the supplied memory space")]
    MissingRecordValue {
        /// Host class name
        class: String,
        /// Field name
        field: String,
    },

    /// A value's type has no host class to instantiate
    #[error("Type '{ty}' has no host class to instantiate")]
    NoOriginClass {
        /// DSL type name
        ty: String,
    },

    /// A value's type is not registered
    #[error("Unknown host class for type '{ty}'")]
    UnknownHostClass {
        /// DSL type name
        ty: String,
    },

    /// The value does not have the shape its type requires
    #[error("Unexpected value for type '{ty}': {reason}")]
    UnexpectedValue {
        /// DSL type name
        ty: String,
        /// What was wrong
        reason: String,
    },

    /// A type has no extension method of that name
    #[error("Type '{ty}' has no method '{method}'")]
    UnknownMethod {
        /// DSL type name
        ty: String,
        /// Method name
        method: String,
    },

    /// A value is not an entity prototype
    #[error("'{ty}' is not an entity prototype")]
    NotAPrototype {
        /// DSL type name
        ty: String,
    },

    /// A callback field could not be bound to its function value
    #[error("Cannot bind callback field '{field}' of {class}: {source}")]
    Callback {
        /// Host class name
        class: String,
        /// Field name
        field: String,
        /// Underlying runtime error
        source: RuntimeError,
    },

    /// Host code (constructor, builder method, setter) failed
    #[error("Host failure while instantiating {class}: {source}")]
    Host {
        /// Host class or method being invoked
        class: String,
        /// Underlying host error
        source: HostError,
    },
}

/// Errors raised while re-entering the interpreter from host code
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    /// The defining node of a callback has no function symbol
    #[error("No function symbol for node {node}")]
    UnresolvedFunction {
        /// Defining node id
        node: u32,
    },

    /// Only user-defined functions can back a host callback
    #[error("Callable '{name}' cannot be used as a host callback")]
    UnsupportedCallable {
        /// Callable name
        name: String,
    },

    /// Callback arguments do not match the function type
    #[error("Function '{function}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Function type name
        function: String,
        /// Expected argument count
        expected: usize,
        /// Actual argument count
        actual: usize,
    },

    /// A value cannot be marshaled between host and DSL representation
    #[error("Cannot marshal value of type '{ty}': {reason}")]
    Marshal {
        /// DSL type name
        ty: String,
        /// What was wrong
        reason: String,
    },

    /// Callback re-entry nested too deeply
    #[error("Callback nesting exceeded the limit of {limit}")]
    DepthLimit {
        /// Configured limit
        limit: usize,
    },

    /// The interpreter failed while executing the function
    #[error("Interpreter error: {message}")]
    Interpreter {
        /// Error message
        message: String,
    },
}

impl From<RuntimeError> for HostError {
    fn from(error: RuntimeError) -> Self {
        HostError::Failed {
            message: error.to_string(),
        }
    }
}

/// Errors that can occur while loading the engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
