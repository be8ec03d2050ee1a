//! Raw host values and conversions

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use thiserror::Error;

use super::CallbackKind;

/// Errors raised by host conversions and host code
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HostError {
    /// A value of a different kind was expected
    #[error("Expected host value of kind '{expected}', got '{actual}'")]
    TypeMismatch {
        /// Expected kind
        expected: String,
        /// Actual kind
        actual: String,
    },

    /// Not enough arguments were supplied
    #[error("Missing host argument at position {index}")]
    MissingArgument {
        /// Zero-based argument position
        index: usize,
    },

    /// An integer does not fit the target type
    #[error("Integer {value} is out of range for '{target}'")]
    OutOfRange {
        /// Value that did not fit
        value: i64,
        /// Target type name
        target: &'static str,
    },

    /// A member setter was applied to an object of another type
    #[error("Member target is not a '{expected}'")]
    TargetMismatch {
        /// Expected host type name
        expected: &'static str,
    },

    /// A callback was invoked with the wrong number of arguments
    #[error("Callback of kind '{kind}' expects {expected} arguments, got {actual}")]
    CallbackArity {
        /// Callback kind
        kind: CallbackKind,
        /// Expected argument count
        expected: usize,
        /// Actual argument count
        actual: usize,
    },

    /// Host code failed
    #[error("{message}")]
    Failed {
        /// Error message
        message: String,
    },
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        HostError::Failed { message }
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        HostError::Failed {
            message: message.to_string(),
        }
    }
}

/// Invocable body of a callback
pub type CallbackFn = dyn Fn(Vec<HostValue>) -> Result<HostValue, HostError>;

/// Host-callable callback of a given kind
#[derive(Clone)]
pub struct HostCallback {
    kind: CallbackKind,
    call: Rc<CallbackFn>,
}

impl HostCallback {
    /// Create a callback
    pub fn new(
        kind: CallbackKind,
        call: impl Fn(Vec<HostValue>) -> Result<HostValue, HostError> + 'static,
    ) -> Self {
        Self {
            kind,
            call: Rc::new(call),
        }
    }

    /// Callback kind
    pub fn kind(&self) -> CallbackKind {
        self.kind
    }

    /// Invoke with exactly `kind().arity()` arguments
    pub fn invoke(&self, args: Vec<HostValue>) -> Result<HostValue, HostError> {
        if args.len() != self.kind.arity() {
            return Err(HostError::CallbackArity {
                kind: self.kind,
                expected: self.kind.arity(),
                actual: args.len(),
            });
        }
        (self.call)(args)
    }
}

impl fmt::Debug for HostCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostCallback({})", self.kind)
    }
}

/// Raw host representation of a value
#[derive(Clone)]
pub enum HostValue {
    /// Absent value
    None,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    String(String),
    /// List of values
    List(Vec<HostValue>),
    /// Set of values (order of insertion)
    Set(Vec<HostValue>),
    /// Map entries
    Map(Vec<(HostValue, HostValue)>),
    /// Host object
    Object(Rc<dyn Any>),
    /// Callback into the DSL
    Callback(HostCallback),
}

impl HostValue {
    /// Wrap a host object
    pub fn object<T: Any>(value: T) -> Self {
        HostValue::Object(Rc::new(value))
    }

    /// Check for [`HostValue::None`]
    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }

    /// Check for an empty string or collection
    pub fn is_empty(&self) -> bool {
        match self {
            HostValue::None => true,
            HostValue::String(s) => s.is_empty(),
            HostValue::List(items) | HostValue::Set(items) => items.is_empty(),
            HostValue::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            HostValue::None => "none",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::String(_) => "string",
            HostValue::List(_) => "list",
            HostValue::Set(_) => "set",
            HostValue::Map(_) => "map",
            HostValue::Object(_) => "object",
            HostValue::Callback(_) => "callback",
        }
    }

    /// Downcast a host object
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        match self {
            HostValue::Object(obj) => Rc::clone(obj).downcast::<T>().ok(),
            _ => None,
        }
    }

    fn mismatch(expected: &str, actual: &HostValue) -> HostError {
        HostError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.kind_name().to_string(),
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => f.write_str("None"),
            HostValue::Bool(b) => write!(f, "Bool({})", b),
            HostValue::Int(i) => write!(f, "Int({})", i),
            HostValue::Float(x) => write!(f, "Float({})", x),
            HostValue::String(s) => write!(f, "String({:?})", s),
            HostValue::List(items) => f.debug_tuple("List").field(items).finish(),
            HostValue::Set(items) => f.debug_tuple("Set").field(items).finish(),
            HostValue::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            HostValue::Object(_) => f.write_str("Object(..)"),
            HostValue::Callback(cb) => write!(f, "{:?}", cb),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::String(a), HostValue::String(b)) => a == b,
            (HostValue::List(a), HostValue::List(b)) => a == b,
            (HostValue::Set(a), HostValue::Set(b)) => a == b,
            (HostValue::Map(a), HostValue::Map(b)) => a == b,
            (HostValue::Object(a), HostValue::Object(b)) => Rc::ptr_eq(a, b),
            (HostValue::Callback(a), HostValue::Callback(b)) => Rc::ptr_eq(&a.call, &b.call),
            _ => false,
        }
    }
}

/// Conversion from a raw host value into a concrete host type
pub trait FromHostValue: Sized {
    /// Convert, failing on a kind mismatch
    fn from_host(value: HostValue) -> Result<Self, HostError>;
}

/// Conversion from a concrete host type into a raw host value
pub trait IntoHostValue {
    /// Convert into a raw host value
    fn into_host(self) -> HostValue;
}

impl FromHostValue for HostValue {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        Ok(value)
    }
}

impl FromHostValue for bool {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::Bool(b) => Ok(b),
            other => Err(HostValue::mismatch("bool", &other)),
        }
    }
}

impl FromHostValue for i64 {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::Int(i) => Ok(i),
            other => Err(HostValue::mismatch("int", &other)),
        }
    }
}

impl FromHostValue for i32 {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        let wide = i64::from_host(value)?;
        i32::try_from(wide).map_err(|_| HostError::OutOfRange {
            value: wide,
            target: "i32",
        })
    }
}

impl FromHostValue for u32 {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        let wide = i64::from_host(value)?;
        u32::try_from(wide).map_err(|_| HostError::OutOfRange {
            value: wide,
            target: "u32",
        })
    }
}

impl FromHostValue for f64 {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::Float(x) => Ok(x),
            other => Err(HostValue::mismatch("float", &other)),
        }
    }
}

impl FromHostValue for f32 {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        f64::from_host(value).map(|x| x as f32)
    }
}

impl FromHostValue for String {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::String(s) => Ok(s),
            other => Err(HostValue::mismatch("string", &other)),
        }
    }
}

impl<T: FromHostValue> FromHostValue for Option<T> {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::None => Ok(None),
            other => T::from_host(other).map(Some),
        }
    }
}

impl<T: FromHostValue> FromHostValue for Vec<T> {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::List(items) | HostValue::Set(items) => {
                items.into_iter().map(T::from_host).collect()
            }
            other => Err(HostValue::mismatch("list", &other)),
        }
    }
}

impl<T: FromHostValue + Eq + Hash> FromHostValue for HashSet<T> {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::Set(items) | HostValue::List(items) => {
                items.into_iter().map(T::from_host).collect()
            }
            other => Err(HostValue::mismatch("set", &other)),
        }
    }
}

impl<K: FromHostValue + Eq + Hash, V: FromHostValue> FromHostValue for HashMap<K, V> {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_host(k)?, V::from_host(v)?)))
                .collect(),
            other => Err(HostValue::mismatch("map", &other)),
        }
    }
}

impl<T: Any> FromHostValue for Rc<T> {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value.downcast::<T>() {
            Some(obj) => Ok(obj),
            None => Err(HostValue::mismatch(std::any::type_name::<T>(), &value)),
        }
    }
}

impl FromHostValue for HostCallback {
    fn from_host(value: HostValue) -> Result<Self, HostError> {
        match value {
            HostValue::Callback(cb) => Ok(cb),
            other => Err(HostValue::mismatch("callback", &other)),
        }
    }
}

impl IntoHostValue for HostValue {
    fn into_host(self) -> HostValue {
        self
    }
}

impl IntoHostValue for bool {
    fn into_host(self) -> HostValue {
        HostValue::Bool(self)
    }
}

impl IntoHostValue for i64 {
    fn into_host(self) -> HostValue {
        HostValue::Int(self)
    }
}

impl IntoHostValue for i32 {
    fn into_host(self) -> HostValue {
        HostValue::Int(i64::from(self))
    }
}

impl IntoHostValue for u32 {
    fn into_host(self) -> HostValue {
        HostValue::Int(i64::from(self))
    }
}

impl IntoHostValue for f64 {
    fn into_host(self) -> HostValue {
        HostValue::Float(self)
    }
}

impl IntoHostValue for f32 {
    fn into_host(self) -> HostValue {
        HostValue::Float(f64::from(self))
    }
}

impl IntoHostValue for String {
    fn into_host(self) -> HostValue {
        HostValue::String(self)
    }
}

impl IntoHostValue for &str {
    fn into_host(self) -> HostValue {
        HostValue::String(self.to_string())
    }
}

impl<T: IntoHostValue> IntoHostValue for Option<T> {
    fn into_host(self) -> HostValue {
        self.map(IntoHostValue::into_host).unwrap_or(HostValue::None)
    }
}

impl<T: IntoHostValue> IntoHostValue for Vec<T> {
    fn into_host(self) -> HostValue {
        HostValue::List(self.into_iter().map(IntoHostValue::into_host).collect())
    }
}

impl<T: Any> IntoHostValue for Rc<T> {
    fn into_host(self) -> HostValue {
        HostValue::Object(self)
    }
}

impl IntoHostValue for HostCallback {
    fn into_host(self) -> HostValue {
        HostValue::Callback(self)
    }
}

macro_rules! callback_wrapper {
    ($(#[$doc:meta])* $name:ident, $kind:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $name(HostCallback);

        impl $name {
            /// Underlying callback
            pub fn callback(&self) -> &HostCallback {
                &self.0
            }
        }

        impl FromHostValue for $name {
            fn from_host(value: HostValue) -> Result<Self, HostError> {
                match value {
                    HostValue::Callback(cb) if cb.kind() == CallbackKind::$kind => Ok($name(cb)),
                    HostValue::Callback(cb) => Err(HostError::TypeMismatch {
                        expected: CallbackKind::$kind.name().to_string(),
                        actual: cb.kind().name().to_string(),
                    }),
                    other => Err(HostValue::mismatch(CallbackKind::$kind.name(), &other)),
                }
            }
        }
    };
}

callback_wrapper!(
    /// Host-callable consumer: one argument, no result
    Consumer,
    Consumer
);
callback_wrapper!(
    /// Host-callable tri-consumer: three arguments, no result
    TriConsumer,
    TriConsumer
);
callback_wrapper!(
    /// Host-callable function: one argument, one result
    Function,
    Function
);
callback_wrapper!(
    /// Host-callable bi-function: two arguments, one result
    BiFunction,
    BiFunction
);

impl Consumer {
    /// Invoke the consumer
    pub fn accept(&self, arg: impl IntoHostValue) -> Result<(), HostError> {
        self.0.invoke(vec![arg.into_host()]).map(|_| ())
    }
}

impl TriConsumer {
    /// Invoke the tri-consumer
    pub fn accept(
        &self,
        a: impl IntoHostValue,
        b: impl IntoHostValue,
        c: impl IntoHostValue,
    ) -> Result<(), HostError> {
        self.0
            .invoke(vec![a.into_host(), b.into_host(), c.into_host()])
            .map(|_| ())
    }
}

impl Function {
    /// Invoke the function and convert its result
    pub fn apply<R: FromHostValue>(&self, arg: impl IntoHostValue) -> Result<R, HostError> {
        R::from_host(self.0.invoke(vec![arg.into_host()])?)
    }
}

impl BiFunction {
    /// Invoke the bi-function and convert its result
    pub fn apply<R: FromHostValue>(
        &self,
        a: impl IntoHostValue,
        b: impl IntoHostValue,
    ) -> Result<R, HostError> {
        R::from_host(self.0.invoke(vec![a.into_host(), b.into_host()])?)
    }
}

/// Positional arguments handed to constructors and adapter methods
#[derive(Debug)]
pub struct HostArgs {
    values: std::vec::IntoIter<HostValue>,
    position: usize,
}

impl HostArgs {
    /// Wrap an argument list
    pub fn new(values: Vec<HostValue>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Number of arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Take the next argument as a raw value
    pub fn take_value(&mut self) -> Result<HostValue, HostError> {
        let index = self.position;
        self.position += 1;
        self.values
            .next()
            .ok_or(HostError::MissingArgument { index })
    }

    /// Take and convert the next argument
    pub fn take<T: FromHostValue>(&mut self) -> Result<T, HostError> {
        T::from_host(self.take_value()?)
    }
}
