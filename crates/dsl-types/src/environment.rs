//! The type environment shared by binding and instantiation
//!
//! Owns the type context, the registered host classes and the type builder
//! caches. Host values are reference counted without atomics, so an
//! environment is confined to the thread that created it.

use log::{debug, warn};

use crate::builder::TypeBuilder;
use crate::context::TypeContext;
use crate::error::TypeError;
use crate::host::{
    HostAdapter, HostClass, HostClassKey, HostMethod, HostProperty, HostRegistry, HostType,
};
use crate::ty::TypeId;

/// Types, host registrations and builder caches of one DSL engine instance
#[derive(Default)]
pub struct TypeEnvironment {
    types: TypeContext,
    hosts: HostRegistry,
    builder: TypeBuilder,
}

impl TypeEnvironment {
    /// Create an environment holding only the built-in types
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the description of a host class
    ///
    /// Registration alone does not derive a type, see [`Self::build_type`].
    pub fn register_class(&mut self, class: HostClass) {
        let key = class.key();
        if self.hosts.register(class).is_some() {
            warn!("Host class {} was registered twice, keeping the latest", key.type_name());
        }
    }

    /// Derive the DSL type of a registered, marked host class
    pub fn build_type(&mut self, key: HostClassKey) -> Result<TypeId, TypeError> {
        self.builder.build_aggregate_type(&mut self.types, &self.hosts, key)
    }

    /// Derive the DSL types of several host classes, in order
    pub fn load_types(&mut self, keys: &[HostClassKey]) -> Result<Vec<TypeId>, TypeError> {
        let ids = keys
            .iter()
            .map(|&key| self.build_type(key))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Loaded {} host types", ids.len());
        Ok(ids)
    }

    /// Register an adapter class
    pub fn register_adapter(&mut self, adapter: &HostAdapter) -> Result<TypeId, TypeError> {
        self.builder
            .register_adapter(&mut self.types, &self.hosts, adapter)
    }

    /// Attach an extension property to a registered host class
    pub fn register_property(
        &mut self,
        owner: HostClassKey,
        property: HostProperty,
    ) -> Result<(), TypeError> {
        if !self.hosts.contains(owner) {
            return Err(TypeError::UnknownHostClass {
                class: owner.simple_name().to_string(),
            });
        }
        self.builder
            .bind_property(&mut self.types, &self.hosts, owner, &property)?;
        if let Some(class) = self.hosts.get_mut(owner) {
            class.add_property(property);
        }
        Ok(())
    }

    /// Attach an extension method to a registered host class
    pub fn register_method(&mut self, owner: HostClassKey, method: HostMethod) -> Result<(), TypeError> {
        if !self.hosts.contains(owner) {
            return Err(TypeError::UnknownHostClass {
                class: owner.simple_name().to_string(),
            });
        }
        self.builder
            .bind_method(&mut self.types, &self.hosts, owner, &method)?;
        if let Some(class) = self.hosts.get_mut(owner) {
            class.add_method(method);
        }
        Ok(())
    }

    /// Derive the DSL type of any host type
    pub fn create_dsl_type(&mut self, ty: &HostType) -> Result<Option<TypeId>, TypeError> {
        self.builder.create_dsl_type(&mut self.types, &self.hosts, ty)
    }

    /// DSL type name of a host type
    pub fn type_name_for(&self, ty: &HostType) -> Option<String> {
        TypeBuilder::type_name_for(&self.hosts, ty)
    }

    /// The type context
    pub fn types(&self) -> &TypeContext {
        &self.types
    }

    /// Mutable access to the type context
    pub fn types_mut(&mut self) -> &mut TypeContext {
        &mut self.types
    }

    /// Registered host classes
    pub fn hosts(&self) -> &HostRegistry {
        &self.hosts
    }

    /// The type builder
    pub fn builder(&self) -> &TypeBuilder {
        &self.builder
    }

    /// Type derived for a host class
    pub fn type_of_class(&self, key: HostClassKey) -> Option<TypeId> {
        self.builder.type_for_class(key)
    }

    /// Host class a type was derived from
    pub fn host_class_of(&self, ty: TypeId) -> Option<&HostClass> {
        let origin = self.types.get(ty)?.origin()?;
        self.hosts.get(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::SymbolKind;

    #[derive(Default)]
    struct Entity {
        name: String,
    }

    fn environment() -> TypeEnvironment {
        let mut env = TypeEnvironment::new();
        env.register_class(HostClass::build::<Entity>().dsl_type().default_constructor().finish());
        env
    }

    #[test]
    fn test_property_bound_into_built_type() {
        let mut env = environment();
        let key = HostClassKey::of::<Entity>();
        let id = env.build_type(key).unwrap();

        env.register_property(
            key,
            HostProperty::settable("name", HostType::String, |e: &mut Entity, n: String| e.name = n),
        )
        .unwrap();

        let symbol = env.types().get(id).unwrap().members().unwrap().resolve("name").unwrap();
        assert_eq!(symbol.kind, SymbolKind::Property);
        assert_eq!(symbol.ty, env.types().string_type());
        assert!(env.hosts().get(key).unwrap().property("name").is_some());
    }

    #[test]
    fn test_property_bound_when_type_is_built_later() {
        let mut env = environment();
        let key = HostClassKey::of::<Entity>();
        env.register_property(key, HostProperty::read_only("name", HostType::String))
            .unwrap();

        let id = env.build_type(key).unwrap();
        assert!(env.types().get(id).unwrap().members().unwrap().contains("name"));
        assert_eq!(env.host_class_of(id).map(HostClass::key), Some(key));
    }

    #[test]
    fn test_property_on_unknown_class() {
        struct Unknown;
        let mut env = environment();
        let err = env
            .register_property(
                HostClassKey::of::<Unknown>(),
                HostProperty::read_only("x", HostType::Int),
            )
            .unwrap_err();
        assert!(matches!(err, TypeError::UnknownHostClass { .. }));
    }

    #[test]
    fn test_method_bound_as_function_member() {
        let mut env = environment();
        let key = HostClassKey::of::<Entity>();
        let id = env.build_type(key).unwrap();

        env.register_method(
            key,
            HostMethod::new("rename", vec![HostType::String], None, |_: &Entity, _| {
                Ok(crate::host::HostValue::None)
            }),
        )
        .unwrap();
        env.register_method(
            key,
            HostMethod::new("name_length", Vec::new(), Some(HostType::Int), |e: &Entity, _| {
                Ok(crate::host::HostValue::Int(e.name.len() as i64))
            }),
        )
        .unwrap();

        let types = env.types();
        let members = types.get(id).unwrap().members().unwrap();
        let rename = members.resolve("rename").unwrap();
        assert_eq!(rename.kind, SymbolKind::Method);
        let function = types.get(rename.ty).and_then(crate::ty::Type::as_function).unwrap();
        assert_eq!(function.params(), [types.string_type()]);
        assert_eq!(function.ret(), types.none_type());

        let length = members.resolve("name_length").unwrap();
        assert_eq!(types.display(length.ty), "fn() -> int");
        assert!(env.hosts().get(key).unwrap().method("rename").is_some());
    }

    #[test]
    fn test_method_bound_when_type_is_built_later() {
        let mut env = environment();
        let key = HostClassKey::of::<Entity>();
        env.register_method(
            key,
            HostMethod::new("greet", vec![HostType::String], Some(HostType::String), |_: &Entity, args| {
                Ok(crate::host::HostValue::String(args.take::<String>()?))
            }),
        )
        .unwrap();
        let id = env.build_type(key).unwrap();
        let greet = env.types().get(id).unwrap().members().unwrap().resolve("greet").unwrap().ty;
        assert_eq!(env.types().display(greet), "fn(string) -> string");

        let err = env
            .register_method(key, HostMethod::new("greet", Vec::new(), None, |_: &Entity, _| Ok(crate::host::HostValue::None)))
            .unwrap_err();
        assert!(matches!(err, TypeError::DuplicateMember { .. }));
    }

    #[test]
    fn test_load_types() {
        let mut env = environment();
        let ids = env.load_types(&[HostClassKey::of::<Entity>()]).unwrap();
        assert_eq!(env.types().name_of(ids[0]), "entity");
        assert_eq!(env.type_of_class(HostClassKey::of::<Entity>()), Some(ids[0]));
        assert_eq!(env.type_name_for(&HostType::class::<Entity>()), Some("entity".to_string()));
    }
}
