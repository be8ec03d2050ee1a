//! Evaluated DSL values and memory spaces
//!
//! A [`Value`] couples a DSL type with its runtime representation and the
//! dirty flag recording whether DSL source assigned it explicitly.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use dsl_checker::NodeId;
use dsl_types::{HostValue, Type, TypeContext, TypeId};

use crate::error::RuntimeError;

/// Name → value bindings of one aggregate value
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySpace {
    ty: TypeId,
    bindings: FxHashMap<String, Value>,
}

impl MemorySpace {
    /// Create an empty memory space for a value of type `ty`
    pub fn new(ty: TypeId) -> Self {
        Self {
            ty,
            bindings: FxHashMap::default(),
        }
    }

    /// Type of the value this memory space belongs to
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Bind a value, returning the value previously bound to `name`
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    /// Builder-style [`Self::bind`]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bind(name, value);
        self
    }

    /// Resolve a binding
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Check if a name is bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bindings, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Something a function value can call
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// Function defined in DSL source
    User {
        /// Defining node of the function
        node: NodeId,
        /// Memory space the function was defined in
        enclosing: Rc<MemorySpace>,
    },
    /// Function implemented by the runtime
    Native {
        /// Function name
        name: String,
    },
}

/// Runtime representation of a value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueRepr {
    /// No value
    None,
    /// Scalar or other raw host value
    Host(HostValue),
    /// Aggregate value with its own members
    Aggregate(MemorySpace),
    /// Aggregate value wrapping an already existing host object
    Encapsulated(HostValue),
    /// List of values
    List(Vec<Value>),
    /// Set of values
    Set(Vec<Value>),
    /// Map entries
    Map(Vec<(Value, Value)>),
    /// Function value
    Function(Callable),
}

/// Evaluated DSL value
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    ty: TypeId,
    repr: ValueRepr,
    dirty: bool,
}

impl Value {
    /// Create a clean value
    pub fn new(ty: TypeId, repr: ValueRepr) -> Self {
        Self {
            ty,
            repr,
            dirty: false,
        }
    }

    /// The none value
    pub fn none(types: &TypeContext) -> Self {
        Self::new(types.none_type(), ValueRepr::None)
    }

    /// Raw host value of type `ty`
    pub fn host(ty: TypeId, value: HostValue) -> Self {
        Self::new(ty, ValueRepr::Host(value))
    }

    /// Aggregate value owning `space`
    pub fn aggregate(space: MemorySpace) -> Self {
        Self::new(space.ty(), ValueRepr::Aggregate(space))
    }

    /// Aggregate value wrapping an existing host object
    pub fn encapsulated(ty: TypeId, object: HostValue) -> Self {
        Self::new(ty, ValueRepr::Encapsulated(object))
    }

    /// Function value
    pub fn function(ty: TypeId, callable: Callable) -> Self {
        Self::new(ty, ValueRepr::Function(callable))
    }

    /// Mark the value as explicitly assigned
    pub fn dirty(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Set the dirty flag
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Whether DSL source assigned this value explicitly
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// DSL type
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Runtime representation
    pub fn repr(&self) -> &ValueRepr {
        &self.repr
    }

    /// Check for the none value
    pub fn is_none(&self) -> bool {
        matches!(self.repr, ValueRepr::None | ValueRepr::Host(HostValue::None))
    }

    /// Check for an aggregate value without members
    pub fn is_empty_aggregate(&self) -> bool {
        matches!(&self.repr, ValueRepr::Aggregate(space) if space.is_empty())
    }

    /// Members of an aggregate value
    pub fn memory_space(&self) -> Option<&MemorySpace> {
        match &self.repr {
            ValueRepr::Aggregate(space) => Some(space),
            _ => None,
        }
    }

    /// Raw host value held by this value
    ///
    /// Aggregates and functions have no raw representation; they need
    /// instantiation or wrapping first.
    pub fn to_host(&self) -> Option<HostValue> {
        match &self.repr {
            ValueRepr::None => Some(HostValue::None),
            ValueRepr::Host(value) | ValueRepr::Encapsulated(value) => Some(value.clone()),
            ValueRepr::List(items) => items
                .iter()
                .map(Value::to_host)
                .collect::<Option<Vec<_>>>()
                .map(HostValue::List),
            ValueRepr::Set(items) => items
                .iter()
                .map(Value::to_host)
                .collect::<Option<Vec<_>>>()
                .map(HostValue::Set),
            ValueRepr::Map(entries) => entries
                .iter()
                .map(|(k, v)| Some((k.to_host()?, v.to_host()?)))
                .collect::<Option<Vec<_>>>()
                .map(HostValue::Map),
            ValueRepr::Aggregate(_) | ValueRepr::Function(_) => None,
        }
    }

    /// DSL value of type `ty` for a raw host value
    pub fn from_host(types: &TypeContext, ty: TypeId, value: HostValue) -> Result<Value, RuntimeError> {
        let dsl_type = types.get(ty).ok_or_else(|| RuntimeError::Marshal {
            ty: format!("#{}", ty.index()),
            reason: "unknown type".to_string(),
        })?;
        let mismatch = |value: &HostValue| RuntimeError::Marshal {
            ty: dsl_type.name().to_string(),
            reason: format!("unexpected host value of kind '{}'", value.kind_name()),
        };

        if value.is_none() {
            return Ok(Value::new(ty, ValueRepr::None));
        }

        let repr = match (dsl_type, value) {
            (Type::Basic(_), value @ (HostValue::Bool(_)
            | HostValue::Int(_)
            | HostValue::Float(_)
            | HostValue::String(_))) => ValueRepr::Host(value),
            (Type::Enum(en), HostValue::String(variant)) => {
                if !en.has_variant(&variant) {
                    return Err(RuntimeError::Marshal {
                        ty: en.name().to_string(),
                        reason: format!("'{}' is not a variant", variant),
                    });
                }
                ValueRepr::Host(HostValue::String(variant))
            }
            (Type::Enum(en), value @ HostValue::Object(_)) => match en.variant_of(&value) {
                Some(variant) => ValueRepr::Host(HostValue::String(variant.to_string())),
                None => return Err(mismatch(&value)),
            },
            (Type::Basic(_), value @ HostValue::Object(_)) => ValueRepr::Host(value),
            (
                Type::Aggregate(_) | Type::Adapted(_) | Type::AggregateAdapter(_),
                value @ HostValue::Object(_),
            ) => ValueRepr::Encapsulated(value),
            (Type::Function(_), value @ HostValue::Callback(_)) => ValueRepr::Host(value),
            (Type::List(list), HostValue::List(items)) => ValueRepr::List(
                items
                    .into_iter()
                    .map(|item| Value::from_host(types, list.elem(), item))
                    .collect::<Result<_, _>>()?,
            ),
            (Type::Set(set), HostValue::Set(items)) => ValueRepr::Set(
                items
                    .into_iter()
                    .map(|item| Value::from_host(types, set.elem(), item))
                    .collect::<Result<_, _>>()?,
            ),
            (Type::Map(map), HostValue::Map(entries)) => ValueRepr::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| {
                        Ok((
                            Value::from_host(types, map.key(), k)?,
                            Value::from_host(types, map.elem(), v)?,
                        ))
                    })
                    .collect::<Result<_, RuntimeError>>()?,
            ),
            (_, value) => return Err(mismatch(&value)),
        };
        Ok(Value::new(ty, repr))
    }
}
