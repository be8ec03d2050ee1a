//! Core type definitions for the dungeon DSL type model

use std::fmt;

use crate::host::{BuilderMethod, HostClassKey, HostEnum, HostValue};
use crate::scope::Scope;

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Index of the type inside its context
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Kind tag of a [`Type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Built-in scalar
    Basic,
    /// Struct-like type with a member scope
    Aggregate,
    /// Type produced by a single-parameter adapter method
    PodAdapted,
    /// Type produced by a multi-parameter adapter method
    AggregateAdapted,
    /// Callable signature
    Function,
    /// List of an element type
    List,
    /// Set of an element type
    Set,
    /// Map from a key type to an element type
    Map,
    /// Host enumeration
    Enum,
}

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BasicType {
    /// The `none` type (no value, also the return type of consumers)
    None = 0,
    /// The `bool` type
    Bool = 1,
    /// The `int` type
    Int = 2,
    /// The `float` type
    Float = 3,
    /// The `string` type
    String = 4,
    /// The `graph` type (opaque host graph object)
    Graph = 5,
    /// The `prototype` type (user-defined entity prototypes)
    Prototype = 6,
}

impl BasicType {
    /// All built-in types, in registration order
    pub const ALL: [BasicType; 7] = [
        BasicType::None,
        BasicType::Bool,
        BasicType::Int,
        BasicType::Float,
        BasicType::String,
        BasicType::Graph,
        BasicType::Prototype,
    ];

    /// DSL name of the type
    pub fn name(self) -> &'static str {
        match self {
            BasicType::None => "none",
            BasicType::Bool => "bool",
            BasicType::Int => "int",
            BasicType::Float => "float",
            BasicType::String => "string",
            BasicType::Graph => "graph",
            BasicType::Prototype => "prototype",
        }
    }

    /// Look up a built-in type by its DSL name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|basic| basic.name() == name)
    }

    /// Truthiness of a raw value of this type
    pub fn is_truthy(self, value: &HostValue) -> bool {
        match (self, value) {
            (_, HostValue::None) => false,
            (BasicType::None, _) => false,
            (BasicType::Bool, HostValue::Bool(b)) => *b,
            (BasicType::Int, HostValue::Int(i)) => *i != 0,
            (BasicType::Float, HostValue::Float(f)) => *f != 0.0,
            (BasicType::String, HostValue::String(s)) => !s.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Struct-like type whose members are either fields of a host class or the
/// components of a user-defined prototype
#[derive(Debug, Clone)]
pub struct AggregateType {
    name: String,
    origin: Option<HostClassKey>,
    members: Scope,
}

impl AggregateType {
    /// Create an aggregate type with the given members
    pub fn new(name: impl Into<String>, origin: Option<HostClassKey>, members: Scope) -> Self {
        Self {
            name: name.into(),
            origin,
            members,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host class this type was derived from, `None` for prototypes
    pub fn origin(&self) -> Option<HostClassKey> {
        self.origin
    }

    /// Member scope
    pub fn members(&self) -> &Scope {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut Scope {
        &mut self.members
    }
}

/// Type constructed by a single-parameter adapter method
#[derive(Debug, Clone)]
pub struct AdaptedType {
    name: String,
    origin: HostClassKey,
    parameter: TypeId,
    builder: BuilderMethod,
}

impl AdaptedType {
    /// Create an adapted type
    pub fn new(
        name: impl Into<String>,
        origin: HostClassKey,
        parameter: TypeId,
        builder: BuilderMethod,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            parameter,
            builder,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host class produced by the builder
    pub fn origin(&self) -> HostClassKey {
        self.origin
    }

    /// Type of the single builder parameter
    pub fn parameter(&self) -> TypeId {
        self.parameter
    }

    /// Builder method
    pub fn builder(&self) -> &BuilderMethod {
        &self.builder
    }
}

/// Type constructed by a multi-parameter adapter method
///
/// The member scope holds one symbol per builder parameter, in parameter
/// order.
#[derive(Debug, Clone)]
pub struct AggregateTypeAdapter {
    name: String,
    origin: HostClassKey,
    members: Scope,
    builder: BuilderMethod,
}

impl AggregateTypeAdapter {
    /// Create an aggregate adapter type
    pub fn new(
        name: impl Into<String>,
        origin: HostClassKey,
        members: Scope,
        builder: BuilderMethod,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            members,
            builder,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host class produced by the builder
    pub fn origin(&self) -> HostClassKey {
        self.origin
    }

    /// Parameter symbols in builder parameter order
    pub fn members(&self) -> &Scope {
        &self.members
    }

    /// Builder method
    pub fn builder(&self) -> &BuilderMethod {
        &self.builder
    }
}

/// Function type: (P1, ..., Pn) -> R
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    name: String,
    params: Vec<TypeId>,
    ret: TypeId,
}

impl FunctionType {
    pub(crate) fn new(name: String, params: Vec<TypeId>, ret: TypeId) -> Self {
        Self { name, params, ret }
    }

    /// Canonical signature name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types
    pub fn params(&self) -> &[TypeId] {
        &self.params
    }

    /// Return type
    pub fn ret(&self) -> TypeId {
        self.ret
    }
}

/// List type: `elem[]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListType {
    name: String,
    elem: TypeId,
}

impl ListType {
    pub(crate) fn new(name: String, elem: TypeId) -> Self {
        Self { name, elem }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    pub fn elem(&self) -> TypeId {
        self.elem
    }
}

/// Set type: `elem<>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetType {
    name: String,
    elem: TypeId,
}

impl SetType {
    pub(crate) fn new(name: String, elem: TypeId) -> Self {
        Self { name, elem }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    pub fn elem(&self) -> TypeId {
        self.elem
    }
}

/// Map type: `[key->elem]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapType {
    name: String,
    key: TypeId,
    elem: TypeId,
}

impl MapType {
    pub(crate) fn new(name: String, key: TypeId, elem: TypeId) -> Self {
        Self { name, key, elem }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key type
    pub fn key(&self) -> TypeId {
        self.key
    }

    /// Element type
    pub fn elem(&self) -> TypeId {
        self.elem
    }
}

/// Host enumeration exposed by variant name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    origin: HostClassKey,
    host_enum: HostEnum,
}

impl EnumType {
    /// Create an enum type
    pub fn new(name: impl Into<String>, origin: HostClassKey, host_enum: HostEnum) -> Self {
        Self {
            name: name.into(),
            origin,
            host_enum,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host enum this type was derived from
    pub fn origin(&self) -> HostClassKey {
        self.origin
    }

    /// Variant names in declaration order
    pub fn variants(&self) -> &[String] {
        self.host_enum.variants()
    }

    /// Whether `name` is one of the variants
    pub fn has_variant(&self, name: &str) -> bool {
        self.variants().iter().any(|v| v == name)
    }

    /// Host value of the variant `name`
    pub fn host_value(&self, name: &str) -> Option<HostValue> {
        self.host_enum.value_of(name)
    }

    /// Variant name of a host enum object
    pub fn variant_of(&self, value: &HostValue) -> Option<&str> {
        self.host_enum.variant_of(value)
    }
}

/// A DSL type
#[derive(Debug, Clone)]
pub enum Type {
    /// Built-in scalar
    Basic(BasicType),
    /// Struct-like type
    Aggregate(AggregateType),
    /// Single-parameter adapter type
    Adapted(AdaptedType),
    /// Multi-parameter adapter type
    AggregateAdapter(AggregateTypeAdapter),
    /// Function signature
    Function(FunctionType),
    /// List
    List(ListType),
    /// Set
    Set(SetType),
    /// Map
    Map(MapType),
    /// Enumeration
    Enum(EnumType),
}

impl Type {
    /// Unique type name
    pub fn name(&self) -> &str {
        match self {
            Type::Basic(basic) => basic.name(),
            Type::Aggregate(agg) => agg.name(),
            Type::Adapted(adapted) => adapted.name(),
            Type::AggregateAdapter(adapter) => adapter.name(),
            Type::Function(func) => func.name(),
            Type::List(list) => list.name(),
            Type::Set(set) => set.name(),
            Type::Map(map) => map.name(),
            Type::Enum(en) => en.name(),
        }
    }

    /// Kind tag
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Basic(_) => TypeKind::Basic,
            Type::Aggregate(_) => TypeKind::Aggregate,
            Type::Adapted(_) => TypeKind::PodAdapted,
            Type::AggregateAdapter(_) => TypeKind::AggregateAdapted,
            Type::Function(_) => TypeKind::Function,
            Type::List(_) => TypeKind::List,
            Type::Set(_) => TypeKind::Set,
            Type::Map(_) => TypeKind::Map,
            Type::Enum(_) => TypeKind::Enum,
        }
    }

    /// Host class the type was derived from, if any
    pub fn origin(&self) -> Option<HostClassKey> {
        match self {
            Type::Aggregate(agg) => agg.origin(),
            Type::Adapted(adapted) => Some(adapted.origin()),
            Type::AggregateAdapter(adapter) => Some(adapter.origin()),
            Type::Enum(en) => Some(en.origin()),
            _ => None,
        }
    }

    /// Member scope of aggregate and aggregate adapter types
    pub fn members(&self) -> Option<&Scope> {
        match self {
            Type::Aggregate(agg) => Some(agg.members()),
            Type::AggregateAdapter(adapter) => Some(adapter.members()),
            _ => None,
        }
    }

    pub(crate) fn members_mut(&mut self) -> Option<&mut Scope> {
        match self {
            Type::Aggregate(agg) => Some(agg.members_mut()),
            Type::AggregateAdapter(adapter) => Some(&mut adapter.members),
            _ => None,
        }
    }

    /// Get the aggregate type, if this is one
    pub fn as_aggregate(&self) -> Option<&AggregateType> {
        match self {
            Type::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }

    /// Get the function type, if this is one
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Check if this is the `none` type
    pub fn is_none(&self) -> bool {
        matches!(self, Type::Basic(BasicType::None))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_type_names() {
        for basic in BasicType::ALL {
            assert_eq!(BasicType::from_name(basic.name()), Some(basic));
        }
        assert_eq!(BasicType::from_name("number"), None);
    }

    #[test]
    fn test_basic_truthiness() {
        assert!(BasicType::Int.is_truthy(&HostValue::Int(3)));
        assert!(!BasicType::Int.is_truthy(&HostValue::Int(0)));
        assert!(!BasicType::Float.is_truthy(&HostValue::Float(0.0)));
        assert!(BasicType::String.is_truthy(&HostValue::String("a".into())));
        assert!(!BasicType::String.is_truthy(&HostValue::String(String::new())));
        assert!(!BasicType::Bool.is_truthy(&HostValue::None));
    }

    #[test]
    fn test_enum_variants() {
        #[derive(Clone, PartialEq)]
        enum Direction {
            Up,
            Down,
        }
        let en = EnumType::new(
            "direction",
            HostClassKey::of::<Direction>(),
            HostEnum::new(&[("up", Direction::Up), ("down", Direction::Down)]),
        );
        assert!(en.has_variant("up"));
        assert!(!en.has_variant("left"));
        assert_eq!(en.variant_of(&HostValue::object(Direction::Down)), Some("down"));
        assert!(en.host_value("up").is_some());
        assert_eq!(Type::Enum(en).kind(), TypeKind::Enum);
    }
}
