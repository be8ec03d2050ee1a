//! Derivation of DSL types from registered host types
//!
//! The builder memoizes one DSL type per host class. Recursive derivation
//! threads an explicit set of classes that are currently being derived; a
//! class reached again before its own derivation finished is a recursive type
//! definition and fails the build.

use std::rc::Rc;

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::TypeContext;
use crate::error::TypeError;
use crate::function_types::{default_builders, FunctionTypeBuilder};
use crate::host::{
    CallbackKind, CallbackSignature, ClassKind, HostAdapter, HostClass, HostClassKey,
    HostMethod, HostProperty, HostRegistry, HostType, MemberMarker,
};
use crate::naming::convert_to_dsl_name;
use crate::scope::{Scope, Symbol, SymbolKind};
use crate::ty::{AdaptedType, AggregateType, AggregateTypeAdapter, EnumType, Type, TypeId};

type InProgress = FxHashSet<HostClassKey>;

/// A registered adapter method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAdapter {
    /// Adapter class declaring the method
    pub adapter: HostClassKey,
    /// Method name
    pub method: String,
    /// Produced DSL type
    pub ty: TypeId,
}

/// Builds DSL types for host classes and adapters
pub struct TypeBuilder {
    /// Derived type per host class, adapter targets included
    host_types: FxHashMap<HostClassKey, TypeId>,

    /// Registered adapters keyed by produced host class
    adapters: FxHashMap<HostClassKey, RegisteredAdapter>,

    /// Function type builders per callback kind
    function_type_builders: FxHashMap<CallbackKind, Rc<dyn FunctionTypeBuilder>>,
}

impl Default for TypeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeBuilder {
    /// Create a builder with function type builders for every callback kind
    pub fn new() -> Self {
        Self {
            host_types: FxHashMap::default(),
            adapters: FxHashMap::default(),
            function_type_builders: default_builders(),
        }
    }

    /// Register (or replace) the function type builder for a callback kind
    pub fn register_function_type_builder(
        &mut self,
        kind: CallbackKind,
        builder: Rc<dyn FunctionTypeBuilder>,
    ) {
        self.function_type_builders.insert(kind, builder);
    }

    /// DSL type name of a host class: the marker override or the converted simple name
    pub fn class_type_name(class: &HostClass) -> String {
        class
            .name_override()
            .map(str::to_string)
            .unwrap_or_else(|| convert_to_dsl_name(class.simple_name()))
    }

    /// DSL type name of a host type
    ///
    /// Built-ins map to their basic type name, marked classes to their DSL
    /// name. Anything else has no DSL name.
    pub fn type_name_for(hosts: &HostRegistry, ty: &HostType) -> Option<String> {
        if let Some(basic) = ty.builtin() {
            return Some(basic.name().to_string());
        }
        match ty {
            HostType::Class(key) => hosts
                .get(*key)
                .filter(|class| class.is_dsl_type())
                .map(Self::class_type_name),
            _ => None,
        }
    }

    /// DSL member name → host field name for every visible field of a class
    pub fn member_field_map(hosts: &HostRegistry, key: HostClassKey) -> Option<FxHashMap<String, String>> {
        let class = hosts.get(key)?;
        Some(
            class
                .fields()
                .iter()
                .filter(|field| field.is_dsl_visible())
                .map(|field| (field.dsl_name(), field.name().to_string()))
                .collect(),
        )
    }

    /// Previously derived type of a host class
    pub fn type_for_class(&self, key: HostClassKey) -> Option<TypeId> {
        self.host_types.get(&key).copied()
    }

    /// Adapter registered for a produced host class
    pub fn adapter_for(&self, produced: HostClassKey) -> Option<&RegisteredAdapter> {
        self.adapters.get(&produced)
    }

    /// All registered adapters
    pub fn registered_adapters(&self) -> impl Iterator<Item = &RegisteredAdapter> {
        self.adapters.values()
    }

    /// Build (or reuse) the aggregate type of a marked host class
    pub fn build_aggregate_type(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        key: HostClassKey,
    ) -> Result<TypeId, TypeError> {
        let mut in_progress = InProgress::default();
        self.derive_class(ctx, hosts, key, &mut in_progress)
    }

    /// Derive the DSL type of any host type
    ///
    /// Returns `Ok(None)` for host types without a DSL counterpart.
    pub fn create_dsl_type(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        ty: &HostType,
    ) -> Result<Option<TypeId>, TypeError> {
        let mut in_progress = InProgress::default();
        self.derive(ctx, hosts, ty, &mut in_progress)
    }

    fn derive(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        ty: &HostType,
        in_progress: &mut InProgress,
    ) -> Result<Option<TypeId>, TypeError> {
        if let Some(basic) = ty.builtin() {
            return Ok(Some(ctx.basic(basic)));
        }

        match ty {
            HostType::List(elem) => {
                let elem = self.derive(ctx, hosts, elem, in_progress)?;
                Ok(elem.map(|elem| ctx.list_type(elem)))
            }
            HostType::Set(elem) => {
                let elem = self.derive(ctx, hosts, elem, in_progress)?;
                Ok(elem.map(|elem| ctx.set_type(elem)))
            }
            HostType::Map(key, elem) => {
                let key = self.derive(ctx, hosts, key, in_progress)?;
                let elem = self.derive(ctx, hosts, elem, in_progress)?;
                Ok(key.zip(elem).map(|(key, elem)| ctx.map_type(key, elem)))
            }
            HostType::Callback(signature) => self.function_type(ctx, hosts, signature, in_progress),
            HostType::Class(key) => {
                if !in_progress.contains(key) {
                    if let Some(&id) = self.host_types.get(key) {
                        return Ok(Some(id));
                    }
                }
                match hosts.get(*key) {
                    Some(class) if class.is_dsl_type() => {
                        self.derive_class(ctx, hosts, *key, in_progress).map(Some)
                    }
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    fn function_type(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        signature: &CallbackSignature,
        in_progress: &mut InProgress,
    ) -> Result<Option<TypeId>, TypeError> {
        let builder = self
            .function_type_builders
            .get(&signature.kind)
            .cloned()
            .ok_or_else(|| TypeError::MissingFunctionTypeBuilder {
                kind: signature.kind.name().to_string(),
            })?;
        let parts = builder.split(signature)?;

        let mut params = Vec::with_capacity(parts.params.len());
        for param in parts.params {
            match self.derive(ctx, hosts, param, in_progress)? {
                Some(id) => params.push(id),
                None => return Ok(None),
            }
        }
        let ret = match parts.ret {
            Some(ret) => match self.derive(ctx, hosts, ret, in_progress)? {
                Some(id) => id,
                None => return Ok(None),
            },
            None => ctx.none_type(),
        };

        Ok(Some(ctx.function_type(params, ret)))
    }

    fn derive_class(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        key: HostClassKey,
        in_progress: &mut InProgress,
    ) -> Result<TypeId, TypeError> {
        if in_progress.contains(&key) {
            return Err(TypeError::RecursiveTypeDefinition {
                class: key.simple_name().to_string(),
            });
        }
        if let Some(&id) = self.host_types.get(&key) {
            return Ok(id);
        }

        let class = hosts.get(key).ok_or_else(|| TypeError::UnknownHostClass {
            class: key.simple_name().to_string(),
        })?;
        if !class.is_dsl_type() {
            return Err(TypeError::NotDslType {
                class: key.simple_name().to_string(),
            });
        }

        let name = Self::class_type_name(class);
        if let Some(symbol) = ctx.resolve_global(&name) {
            if !symbol.is_type() {
                return Err(TypeError::NotAType { name });
            }
            let existing = symbol.ty;
            if ctx.get(existing).and_then(Type::origin) == Some(key) {
                self.host_types.insert(key, existing);
                return Ok(existing);
            }
            return Err(TypeError::DuplicateTypeName { name });
        }

        in_progress.insert(key);
        let built = self.build_class_type(ctx, hosts, class, name, in_progress);
        in_progress.remove(&key);
        let id = built?;

        self.host_types.insert(key, id);
        debug!("Built DSL type '{}' for host class {}", ctx.name_of(id), key.type_name());
        Ok(id)
    }

    fn build_class_type(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        class: &HostClass,
        name: String,
        in_progress: &mut InProgress,
    ) -> Result<TypeId, TypeError> {
        if let ClassKind::Enum(host_enum) = class.kind() {
            return ctx.add_type(Type::Enum(EnumType::new(name, class.key(), host_enum.clone())));
        }

        let untranslatable = |member: &str, ty: &HostType| TypeError::UntranslatableMember {
            class: class.simple_name().to_string(),
            field: member.to_string(),
            host_type: ty.to_string(),
        };

        let mut members = Scope::new();
        for field in class.fields() {
            let member_ty = match (field.marker(), field.ty()) {
                (MemberMarker::Hidden, _) => continue,
                (MemberMarker::Data { .. }, ty) => self.derive(ctx, hosts, ty, in_progress)?,
                (MemberMarker::Callback { .. }, HostType::Callback(signature)) => {
                    self.function_type(ctx, hosts, signature, in_progress)?
                }
                (MemberMarker::Callback { .. }, _) => None,
            };
            let member_ty = member_ty.ok_or_else(|| untranslatable(field.name(), field.ty()))?;
            trace!("  member '{}': {}", field.dsl_name(), ctx.name_of(member_ty));

            members
                .bind(Symbol::new(field.dsl_name(), SymbolKind::Member, member_ty))
                .map_err(|e| TypeError::DuplicateMember {
                    owner: name.clone(),
                    name: e.name,
                })?;
        }

        for property in class.properties() {
            let property_ty = self
                .derive(ctx, hosts, property.ty(), in_progress)?
                .ok_or_else(|| untranslatable(property.name(), property.ty()))?;
            members
                .bind(Symbol::new(property.name(), SymbolKind::Property, property_ty))
                .map_err(|e| TypeError::DuplicateMember {
                    owner: name.clone(),
                    name: e.name,
                })?;
        }

        for method in class.methods() {
            let method_ty = self.method_type(ctx, hosts, class.key(), method, in_progress)?;
            members
                .bind(Symbol::new(method.name(), SymbolKind::Method, method_ty))
                .map_err(|e| TypeError::DuplicateMember {
                    owner: name.clone(),
                    name: e.name,
                })?;
        }

        ctx.add_type(Type::Aggregate(AggregateType::new(name, Some(class.key()), members)))
    }

    /// Function type of an extension method: its parameters and result
    fn method_type(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        owner: HostClassKey,
        method: &HostMethod,
        in_progress: &mut InProgress,
    ) -> Result<TypeId, TypeError> {
        let untranslatable = |ty: &HostType| TypeError::UntranslatableMember {
            class: owner.simple_name().to_string(),
            field: method.name().to_string(),
            host_type: ty.to_string(),
        };

        let mut params = Vec::with_capacity(method.params().len());
        for param in method.params() {
            let param_ty = self
                .derive(ctx, hosts, param, in_progress)?
                .ok_or_else(|| untranslatable(param))?;
            params.push(param_ty);
        }
        let ret = match method.ret() {
            Some(ret) => self
                .derive(ctx, hosts, ret, in_progress)?
                .ok_or_else(|| untranslatable(ret))?,
            None => ctx.none_type(),
        };
        Ok(ctx.function_type(params, ret))
    }

    /// Register the marked static method of an adapter class
    ///
    /// A single-parameter method yields an [`AdaptedType`] over a built-in
    /// parameter type, a method with more parameters an
    /// [`AggregateTypeAdapter`] with one member per parameter.
    pub fn register_adapter(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        adapter: &HostAdapter,
    ) -> Result<TypeId, TypeError> {
        let method = adapter
            .adapter_method()
            .ok_or_else(|| TypeError::NoAdapterMethod {
                adapter: adapter.key().simple_name().to_string(),
            })?;
        let produced = method.produces();

        if let Some(existing) = self.adapters.get(&produced) {
            return Err(TypeError::DuplicateAdapter {
                produced: produced.simple_name().to_string(),
                method: method.name().to_string(),
                existing: existing.method.clone(),
            });
        }

        let name = match method.name_override() {
            Some(name) => name.to_string(),
            None => hosts
                .get(produced)
                .filter(|class| class.is_dsl_type())
                .map(Self::class_type_name)
                .unwrap_or_else(|| convert_to_dsl_name(produced.simple_name())),
        };

        let id = match method.params() {
            [] => {
                return Err(TypeError::ZeroParameterAdapter {
                    method: method.name().to_string(),
                })
            }
            [param] => {
                // Non built-in single parameters are not supported
                let basic = param.ty.builtin().ok_or_else(|| TypeError::UnsupportedAdapterParameter {
                    method: method.name().to_string(),
                    parameter: param.name.clone(),
                    host_type: param.ty.to_string(),
                })?;
                let param_ty = ctx.basic(basic);
                ctx.add_type(Type::Adapted(AdaptedType::new(
                    name,
                    produced,
                    param_ty,
                    method.builder().clone(),
                )))?
            }
            params => {
                let mut in_progress = InProgress::default();
                let mut members = Scope::new();
                for param in params {
                    let param_ty = self
                        .derive(ctx, hosts, &param.ty, &mut in_progress)?
                        .ok_or_else(|| TypeError::UntranslatableMember {
                            class: method.name().to_string(),
                            field: param.name.clone(),
                            host_type: param.ty.to_string(),
                        })?;
                    members
                        .bind(Symbol::new(param.dsl_name(), SymbolKind::Parameter, param_ty))
                        .map_err(|e| TypeError::DuplicateMember {
                            owner: name.clone(),
                            name: e.name,
                        })?;
                }
                ctx.add_type(Type::AggregateAdapter(AggregateTypeAdapter::new(
                    name,
                    produced,
                    members,
                    method.builder().clone(),
                )))?
            }
        };

        self.adapters.insert(
            produced,
            RegisteredAdapter {
                adapter: adapter.key(),
                method: method.name().to_string(),
                ty: id,
            },
        );
        self.host_types.insert(produced, id);
        debug!(
            "Registered adapter {}::{} producing DSL type '{}'",
            adapter.key().simple_name(),
            method.name(),
            ctx.name_of(id)
        );
        Ok(id)
    }

    /// Bind an extension property into the already derived type of `owner`
    ///
    /// Does nothing if `owner` has no type yet; properties are picked up when
    /// the type gets built.
    pub fn bind_property(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        owner: HostClassKey,
        property: &HostProperty,
    ) -> Result<(), TypeError> {
        let Some(&owner_ty) = self.host_types.get(&owner) else {
            return Ok(());
        };
        let property_ty = self
            .create_dsl_type(ctx, hosts, property.ty())?
            .ok_or_else(|| TypeError::UntranslatableMember {
                class: owner.simple_name().to_string(),
                field: property.name().to_string(),
                host_type: property.ty().to_string(),
            })?;
        ctx.bind_member(owner_ty, property.name(), SymbolKind::Property, property_ty)
    }

    /// Bind an extension method into the already derived type of `owner`
    ///
    /// Like properties, methods of a class without a type yet are bound when
    /// the type gets built.
    pub fn bind_method(
        &mut self,
        ctx: &mut TypeContext,
        hosts: &HostRegistry,
        owner: HostClassKey,
        method: &HostMethod,
    ) -> Result<(), TypeError> {
        let Some(&owner_ty) = self.host_types.get(&owner) else {
            return Ok(());
        };
        let mut in_progress = InProgress::default();
        let method_ty = self.method_type(ctx, hosts, owner, method, &mut in_progress)?;
        trace!("Binding method '{}' as {}", method.name(), ctx.name_of(method_ty));
        ctx.bind_member(owner_ty, method.name(), SymbolKind::Method, method_ty)
    }
}
