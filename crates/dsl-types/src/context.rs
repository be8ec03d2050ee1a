//! Type context for managing types and type interning

use log::warn;
use rustc_hash::FxHashMap;

use crate::error::TypeError;
use crate::scope::{DuplicateSymbolError, Scope, ScopeRef, Symbol, SymbolKind};
use crate::ty::{BasicType, FunctionType, ListType, MapType, SetType, Type, TypeId};

/// Structural identity of collection and function types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StructuralKey {
    List(TypeId),
    Set(TypeId),
    Map(TypeId, TypeId),
    Function(Vec<TypeId>, TypeId),
}

/// Type context that owns every DSL type and the global scope
///
/// Collection and function types are interned: requesting the same structure
/// twice yields the same [`TypeId`]. Named types (aggregates, adapters, enums)
/// are registered once and bound by name in the global scope.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<Type>,

    /// Interning table for structural types
    structural: FxHashMap<StructuralKey, TypeId>,

    /// Global scope (types, functions, objects)
    global: Scope,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Create a context holding the built-in types
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            structural: FxHashMap::default(),
            global: Scope::new(),
        };

        // Basic types occupy the ids matching their discriminant
        for basic in BasicType::ALL {
            ctx.push(Type::Basic(basic));
        }

        ctx
    }

    fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        let mut symbol = Symbol::new(ty.name(), SymbolKind::Type, id);
        symbol.scope = ScopeRef::Global;
        // add_type rejects taken and structural names, so only a non-type
        // global symbol can already hold this one
        if let Err(DuplicateSymbolError { name }) = self.global.bind(symbol) {
            warn!("Type '{}' is shadowed by another global symbol", name);
        }
        self.types.push(ty);
        id
    }

    fn intern(&mut self, key: StructuralKey, build: impl FnOnce(&Self) -> Type) -> TypeId {
        if let Some(&id) = self.structural.get(&key) {
            return id;
        }
        let ty = build(self);
        let id = self.push(ty);
        self.structural.insert(key, id);
        id
    }

    /// Id of a built-in type
    pub fn basic(&self, basic: BasicType) -> TypeId {
        TypeId(basic as u32)
    }

    /// The `none` type
    pub fn none_type(&self) -> TypeId {
        self.basic(BasicType::None)
    }

    /// The `bool` type
    pub fn bool_type(&self) -> TypeId {
        self.basic(BasicType::Bool)
    }

    /// The `int` type
    pub fn int_type(&self) -> TypeId {
        self.basic(BasicType::Int)
    }

    /// The `float` type
    pub fn float_type(&self) -> TypeId {
        self.basic(BasicType::Float)
    }

    /// The `string` type
    pub fn string_type(&self) -> TypeId {
        self.basic(BasicType::String)
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.index())
    }

    /// Get a type by its TypeId, failing for foreign ids
    pub fn try_get(&self, id: TypeId) -> Result<&Type, TypeError> {
        self.get(id).ok_or(TypeError::UnknownTypeId { id: id.0 })
    }

    /// Name of a type, `<unknown>` for foreign ids
    pub fn name_of(&self, id: TypeId) -> &str {
        self.get(id).map(Type::name).unwrap_or("<unknown>")
    }

    /// Number of types in the context
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the context is empty (never true, built-ins are always present)
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate all types with their ids
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId(i as u32), ty))
    }

    /// Create (or reuse) the list type of `elem`
    pub fn list_type(&mut self, elem: TypeId) -> TypeId {
        self.intern(StructuralKey::List(elem), |ctx| {
            Type::List(ListType::new(format!("{}[]", ctx.name_of(elem)), elem))
        })
    }

    /// Create (or reuse) the set type of `elem`
    pub fn set_type(&mut self, elem: TypeId) -> TypeId {
        self.intern(StructuralKey::Set(elem), |ctx| {
            Type::Set(SetType::new(format!("{}<>", ctx.name_of(elem)), elem))
        })
    }

    /// Create (or reuse) the map type from `key` to `elem`
    pub fn map_type(&mut self, key: TypeId, elem: TypeId) -> TypeId {
        self.intern(StructuralKey::Map(key, elem), |ctx| {
            Type::Map(MapType::new(
                format!("[{}->{}]", ctx.name_of(key), ctx.name_of(elem)),
                key,
                elem,
            ))
        })
    }

    /// Create (or reuse) a function type
    pub fn function_type(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        let key = StructuralKey::Function(params.clone(), ret);
        self.intern(key, move |ctx| {
            let rendered: Vec<&str> = params.iter().map(|&p| ctx.name_of(p)).collect();
            let name = format!("fn({}) -> {}", rendered.join(", "), ctx.name_of(ret));
            Type::Function(FunctionType::new(name, params, ret))
        })
    }

    /// Register a named type and bind it in the global scope
    ///
    /// Member symbols of the type are re-scoped to the new type.
    pub fn add_type(&mut self, mut ty: Type) -> Result<TypeId, TypeError> {
        if is_structural_name(ty.name()) {
            return Err(TypeError::StructuralTypeName {
                name: ty.name().to_string(),
            });
        }
        if let Some(existing) = self.global.resolve(ty.name()) {
            return Err(if existing.is_type() {
                TypeError::DuplicateTypeName {
                    name: ty.name().to_string(),
                }
            } else {
                TypeError::NotAType {
                    name: ty.name().to_string(),
                }
            });
        }

        let id = TypeId(self.types.len() as u32);
        if let Some(members) = ty.members_mut() {
            members.set_owner(ScopeRef::Type(id));
        }
        Ok(self.push(ty))
    }

    /// Bind an additional member into an already registered aggregate type
    pub fn bind_member(
        &mut self,
        owner: TypeId,
        name: impl Into<String>,
        kind: SymbolKind,
        ty: TypeId,
    ) -> Result<(), TypeError> {
        let owner_type = self
            .types
            .get_mut(owner.index())
            .ok_or(TypeError::UnknownTypeId { id: owner.0 })?;
        let owner_name = owner_type.name().to_string();
        let members = owner_type
            .members_mut()
            .ok_or_else(|| TypeError::NotAType { name: owner_name.clone() })?;

        let mut symbol = Symbol::new(name, kind, ty);
        symbol.scope = ScopeRef::Type(owner);
        members
            .bind(symbol)
            .map_err(|DuplicateSymbolError { name }| TypeError::DuplicateMember {
                owner: owner_name,
                name,
            })
    }

    /// Look up a type by name in the global scope
    ///
    /// Returns `None` if the name is unbound or bound to something other than a type.
    pub fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.global
            .resolve(name)
            .filter(|symbol| symbol.is_type())
            .map(|symbol| symbol.ty)
    }

    /// Resolve any symbol in the global scope
    pub fn resolve_global(&self, name: &str) -> Option<&Symbol> {
        self.global.resolve(name)
    }

    /// The global scope
    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    /// Bind a non-type symbol (function, object) into the global scope
    pub fn bind_global(&mut self, mut symbol: Symbol) -> Result<(), DuplicateSymbolError> {
        symbol.scope = ScopeRef::Global;
        self.global.bind(symbol)
    }

    /// Render a type for display
    pub fn display(&self, id: TypeId) -> String {
        self.name_of(id).to_string()
    }
}

/// Whether `name` has the shape of a list, set, map or function type name
fn is_structural_name(name: &str) -> bool {
    name.ends_with("[]")
        || name.ends_with("<>")
        || (name.starts_with('[') && name.contains("->"))
        || name.starts_with("fn(")
}
