//! Host type registration
//!
//! Host types are not reflected over. Instead the embedding application
//! describes each host type that should be visible in the DSL: its fields,
//! how to set them, its constructors, and adapter methods for types that
//! cannot be built by plain field assignment.
//!
//! ```text
//! HostClass::build::<Position>()
//!     .dsl_type()
//!     .data_field("x", HostType::Int, |p: &mut Position, x: i64| p.x = x)
//!     .data_field("y", HostType::Int, |p: &mut Position, y: i64| p.y = y)
//!     .default_constructor()
//!     .finish()
//! ```

mod adapter;
mod class;
mod value;

pub use adapter::{AdapterMethod, AdapterParam, BuilderMethod, HostAdapter};
pub use class::{
    ClassBuilder, ClassKind, CtorParam, HostClass, HostConstructor, HostEnum, HostField,
    HostMethod, HostProperty, HostRegistry, MemberMarker,
};
pub use value::{
    BiFunction, Consumer, FromHostValue, Function, HostArgs, HostCallback, HostError, HostValue,
    IntoHostValue, TriConsumer,
};

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ty::BasicType;

/// Identity of a host type
#[derive(Clone, Copy)]
pub struct HostClassKey {
    id: std::any::TypeId,
    name: &'static str,
}

impl HostClassKey {
    /// Key of the host type `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: std::any::TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Type name without module path and generic arguments
    pub fn simple_name(&self) -> &'static str {
        crate::naming::simple_name(self.name)
    }
}

impl PartialEq for HostClassKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HostClassKey {}

impl Hash for HostClassKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for HostClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostClassKey({})", self.name)
    }
}

impl fmt::Display for HostClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// Functional interface shapes a callback member can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// One argument, no result
    Consumer,
    /// Three arguments, no result
    TriConsumer,
    /// One argument and a result
    Function,
    /// Two arguments and a result
    BiFunction,
}

impl CallbackKind {
    /// Name of the kind, used in error messages
    pub fn name(self) -> &'static str {
        match self {
            CallbackKind::Consumer => "Consumer",
            CallbackKind::TriConsumer => "TriConsumer",
            CallbackKind::Function => "Function",
            CallbackKind::BiFunction => "BiFunction",
        }
    }

    /// Number of arguments the callback is invoked with
    pub fn arity(self) -> usize {
        match self {
            CallbackKind::Consumer | CallbackKind::Function => 1,
            CallbackKind::BiFunction => 2,
            CallbackKind::TriConsumer => 3,
        }
    }

    /// Whether the callback produces a result
    pub fn returns(self) -> bool {
        matches!(self, CallbackKind::Function | CallbackKind::BiFunction)
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a callback member: its kind and generic type arguments
///
/// Type arguments are listed like the generic parameters of the functional
/// interface: argument types first, result type last for kinds that return.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackSignature {
    /// Functional interface kind
    pub kind: CallbackKind,
    /// Generic type arguments
    pub type_args: Vec<HostType>,
}

impl CallbackSignature {
    /// `Consumer<A>`
    pub fn consumer(arg: HostType) -> Self {
        Self {
            kind: CallbackKind::Consumer,
            type_args: vec![arg],
        }
    }

    /// `TriConsumer<A, B, C>`
    pub fn tri_consumer(a: HostType, b: HostType, c: HostType) -> Self {
        Self {
            kind: CallbackKind::TriConsumer,
            type_args: vec![a, b, c],
        }
    }

    /// `Function<A, R>`
    pub fn function(arg: HostType, ret: HostType) -> Self {
        Self {
            kind: CallbackKind::Function,
            type_args: vec![arg, ret],
        }
    }

    /// `BiFunction<A, B, R>`
    pub fn bi_function(a: HostType, b: HostType, ret: HostType) -> Self {
        Self {
            kind: CallbackKind::BiFunction,
            type_args: vec![a, b, ret],
        }
    }
}

/// Type descriptor of a host field or parameter
#[derive(Debug, Clone, PartialEq)]
pub enum HostType {
    /// Boolean
    Bool,
    /// Any integer type
    Int,
    /// Any floating point type
    Float,
    /// String
    String,
    /// The host graph type
    Graph,
    /// A registered host class
    Class(HostClassKey),
    /// Homogeneous list
    List(Box<HostType>),
    /// Homogeneous set
    Set(Box<HostType>),
    /// Map
    Map(Box<HostType>, Box<HostType>),
    /// Functional interface
    Callback(CallbackSignature),
}

impl HostType {
    /// Descriptor of the host class `T`
    pub fn class<T: Any>() -> Self {
        HostType::Class(HostClassKey::of::<T>())
    }

    /// List of `elem`
    pub fn list(elem: HostType) -> Self {
        HostType::List(Box::new(elem))
    }

    /// Set of `elem`
    pub fn set(elem: HostType) -> Self {
        HostType::Set(Box::new(elem))
    }

    /// Map from `key` to `elem`
    pub fn map(key: HostType, elem: HostType) -> Self {
        HostType::Map(Box::new(key), Box::new(elem))
    }

    /// Built-in DSL type this host type maps to directly
    pub fn builtin(&self) -> Option<BasicType> {
        match self {
            HostType::Bool => Some(BasicType::Bool),
            HostType::Int => Some(BasicType::Int),
            HostType::Float => Some(BasicType::Float),
            HostType::String => Some(BasicType::String),
            HostType::Graph => Some(BasicType::Graph),
            _ => None,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Bool => f.write_str("bool"),
            HostType::Int => f.write_str("int"),
            HostType::Float => f.write_str("float"),
            HostType::String => f.write_str("String"),
            HostType::Graph => f.write_str("Graph"),
            HostType::Class(key) => write!(f, "{}", key),
            HostType::List(elem) => write!(f, "List<{}>", elem),
            HostType::Set(elem) => write!(f, "Set<{}>", elem),
            HostType::Map(key, elem) => write!(f, "Map<{}, {}>", key, elem),
            HostType::Callback(sig) => {
                write!(f, "{}<", sig.kind)?;
                for (i, arg) in sig.type_args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HealthComponent;

    #[test]
    fn test_host_class_key_identity() {
        let a = HostClassKey::of::<HealthComponent>();
        let b = HostClassKey::of::<HealthComponent>();
        assert_eq!(a, b);
        assert_ne!(a, HostClassKey::of::<String>());
        assert_eq!(a.simple_name(), "HealthComponent");
    }

    #[test]
    fn test_host_type_display() {
        let ty = HostType::Callback(CallbackSignature::function(
            HostType::class::<HealthComponent>(),
            HostType::list(HostType::Int),
        ));
        assert_eq!(ty.to_string(), "Function<HealthComponent, List<int>>");
        assert_eq!(HostType::Int.builtin(), Some(BasicType::Int));
        assert_eq!(HostType::class::<HealthComponent>().builtin(), None);
    }
}
