//! Instantiation of host objects from evaluated DSL values
//!
//! Records are built through their canonical constructor from the complete
//! set of member values. Ordinary classes are built through a constructor
//! taking only context members; afterwards every data field whose value was
//! explicitly assigned in DSL source overrides the host default.

use std::any::Any;
use std::rc::Rc;

use log::{debug, trace};
use rustc_hash::FxHashMap;

use dsl_types::{
    HostClass, HostField, HostType, HostValue, MemberMarker, SymbolKind, Type, TypeEnvironment,
    TypeId,
};

use crate::callback::CallbackAdapterBuilder;
use crate::config::EngineConfig;
use crate::error::InstantiationError;
use crate::interpreter::Interpreter;
use crate::value::{MemorySpace, Value, ValueRepr};

/// Turns DSL values into host objects
pub struct TypeInstantiator {
    /// Objects constructor parameters can be injected from, by context name
    context: FxHashMap<String, HostValue>,
    /// Adapters for callback fields
    callbacks: CallbackAdapterBuilder,
}

impl TypeInstantiator {
    /// Create an instantiator re-entering `interpreter` for callbacks
    pub fn new(interpreter: Rc<dyn Interpreter>) -> Self {
        Self {
            context: FxHashMap::default(),
            callbacks: CallbackAdapterBuilder::new(interpreter),
        }
    }

    /// Create an instantiator with configured callback limits
    pub fn with_config(interpreter: Rc<dyn Interpreter>, config: &EngineConfig) -> Self {
        Self {
            context: FxHashMap::default(),
            callbacks: CallbackAdapterBuilder::new(interpreter)
                .with_depth_limit(config.callback_depth_limit),
        }
    }

    /// The callback adapter builder
    pub fn callbacks(&self) -> &CallbackAdapterBuilder {
        &self.callbacks
    }

    /// Mutable access to the callback adapter builder
    pub fn callbacks_mut(&mut self) -> &mut CallbackAdapterBuilder {
        &mut self.callbacks
    }

    /// Make an object available to context constructor parameters
    ///
    /// Returns the object previously pushed under `name`.
    pub fn push_context_member(&mut self, name: impl Into<String>, member: HostValue) -> Option<HostValue> {
        self.context.insert(name.into(), member)
    }

    /// Remove a context member
    pub fn remove_context_member(&mut self, name: &str) -> Option<HostValue> {
        self.context.remove(name)
    }

    /// Look up a context member
    pub fn context_member(&self, name: &str) -> Option<&HostValue> {
        self.context.get(name)
    }

    /// Run `f` with `member` pushed as context member `name`
    ///
    /// The previous context member of that name is restored afterwards.
    pub fn with_context<R>(
        &mut self,
        name: &str,
        member: HostValue,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let previous = self.push_context_member(name, member);
        let result = f(self);
        match previous {
            Some(previous) => {
                self.context.insert(name.to_string(), previous);
            }
            None => {
                self.context.remove(name);
            }
        }
        result
    }

    /// Instantiate the host representation of a value
    ///
    /// Prototype values yield [`HostValue::None`]; entities are built by
    /// [`EntityInstantiator`](crate::EntityInstantiator).
    pub fn instantiate(&self, env: &TypeEnvironment, value: &Value) -> Result<HostValue, InstantiationError> {
        if let Type::Aggregate(aggregate) = type_of(env, value.ty())? {
            if aggregate.origin().is_none() {
                debug!("Skipping prototype value of '{}'", aggregate.name());
                return Ok(HostValue::None);
            }
        }
        self.convert(env, value)
    }

    /// Instantiate an object of aggregate type `ty` from member values
    pub fn instantiate_as_type(
        &self,
        env: &TypeEnvironment,
        space: &MemorySpace,
        ty: TypeId,
    ) -> Result<HostValue, InstantiationError> {
        self.convert_aggregate(env, ty, space)
    }

    /// Call the extension method `name` on the host object of `receiver`
    ///
    /// Receiver and arguments are instantiated first; the result is
    /// translated back into a value of the method's return type.
    pub fn call_method(
        &self,
        env: &TypeEnvironment,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Value, InstantiationError> {
        let ty_name = env.types().name_of(receiver.ty()).to_string();
        let unknown = || InstantiationError::UnknownMethod {
            ty: ty_name.clone(),
            method: name.to_string(),
        };
        let method = env
            .host_class_of(receiver.ty())
            .and_then(|class| class.method(name))
            .ok_or_else(unknown)?;
        let ret = type_of(env, receiver.ty())?
            .members()
            .and_then(|members| members.resolve(name))
            .filter(|symbol| symbol.kind == SymbolKind::Method)
            .and_then(|symbol| env.types().get(symbol.ty))
            .and_then(Type::as_function)
            .map(|function| function.ret())
            .ok_or_else(unknown)?;

        let object = self.convert(env, receiver)?;
        let args = self.convert_all(env, args)?;
        trace!("Calling {}.{} with {} arguments", ty_name, name, args.len());
        let result = method
            .call(&object, args)
            .map_err(|source| InstantiationError::Host {
                class: format!("{}.{}", ty_name, name),
                source,
            })?;
        Value::from_host(env.types(), ret, result).map_err(|error| InstantiationError::UnexpectedValue {
            ty: env.types().name_of(ret).to_string(),
            reason: error.to_string(),
        })
    }

    fn convert(&self, env: &TypeEnvironment, value: &Value) -> Result<HostValue, InstantiationError> {
        match value.repr() {
            ValueRepr::None => Ok(HostValue::None),
            ValueRepr::Encapsulated(object) => Ok(object.clone()),
            ValueRepr::Host(raw) => match type_of(env, value.ty())? {
                Type::Adapted(adapted) => {
                    let builder = adapted.builder();
                    trace!("Adapting {} through {}", raw.kind_name(), builder.name());
                    builder
                        .call(vec![raw.clone()])
                        .map_err(|source| InstantiationError::Host {
                            class: builder.name().to_string(),
                            source,
                        })
                }
                Type::Enum(en) => match raw {
                    HostValue::String(variant) => {
                        en.host_value(variant)
                            .ok_or_else(|| InstantiationError::UnknownVariant {
                                ty: en.name().to_string(),
                                variant: variant.clone(),
                            })
                    }
                    HostValue::Object(_) if en.variant_of(raw).is_some() => Ok(raw.clone()),
                    other => Err(InstantiationError::UnexpectedValue {
                        ty: en.name().to_string(),
                        reason: format!("expected a variant name, got {}", other.kind_name()),
                    }),
                },
                _ => Ok(raw.clone()),
            },
            ValueRepr::Aggregate(space) => self.convert_aggregate(env, value.ty(), space),
            ValueRepr::List(items) => Ok(HostValue::List(self.convert_all(env, items)?)),
            ValueRepr::Set(items) => Ok(HostValue::Set(self.convert_all(env, items)?)),
            ValueRepr::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((self.convert(env, k)?, self.convert(env, v)?)))
                .collect::<Result<Vec<_>, _>>()
                .map(HostValue::Map),
            ValueRepr::Function(_) => Err(InstantiationError::UnexpectedValue {
                ty: env.types().name_of(value.ty()).to_string(),
                reason: "function values can only be assigned to callback members".to_string(),
            }),
        }
    }

    fn convert_all(&self, env: &TypeEnvironment, items: &[Value]) -> Result<Vec<HostValue>, InstantiationError> {
        items.iter().map(|item| self.convert(env, item)).collect()
    }

    fn convert_aggregate(
        &self,
        env: &TypeEnvironment,
        ty: TypeId,
        space: &MemorySpace,
    ) -> Result<HostValue, InstantiationError> {
        match type_of(env, ty)? {
            Type::AggregateAdapter(adapter) => {
                // Builder arguments come from the value's own members, in parameter order
                let args = adapter
                    .members()
                    .symbols()
                    .map(|param| match space.resolve(&param.name) {
                        Some(member) => self.convert(env, member),
                        None => Ok(HostValue::None),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let builder = adapter.builder();
                builder.call(args).map_err(|source| InstantiationError::Host {
                    class: builder.name().to_string(),
                    source,
                })
            }
            Type::Aggregate(aggregate) => {
                let origin = aggregate.origin().ok_or_else(|| InstantiationError::NoOriginClass {
                    ty: aggregate.name().to_string(),
                })?;
                let class = env.hosts().get(origin).ok_or_else(|| InstantiationError::UnknownHostClass {
                    ty: aggregate.name().to_string(),
                })?;
                debug!("Instantiating {} as '{}'", class.simple_name(), aggregate.name());
                if class.is_record() {
                    self.instantiate_record(env, class, space)
                } else {
                    self.instantiate_class(env, class, space)
                }
            }
            other => Err(InstantiationError::UnexpectedValue {
                ty: other.name().to_string(),
                reason: "aggregate value for a non-aggregate type".to_string(),
            }),
        }
    }

    fn instantiate_record(
        &self,
        env: &TypeEnvironment,
        class: &HostClass,
        space: &MemorySpace,
    ) -> Result<HostValue, InstantiationError> {
        let class_name = class.simple_name();
        let ctor = class
            .constructors()
            .first()
            .ok_or_else(|| InstantiationError::MissingConstructor {
                class: class_name.to_string(),
            })?;

        let mut args = Vec::with_capacity(ctor.params().len());
        for param in ctor.params() {
            let field = class
                .field(&param.name)
                .filter(|field| field.is_dsl_visible())
                .ok_or_else(|| InstantiationError::RecordFieldNotVisible {
                    class: class_name.to_string(),
                    field: param.name.clone(),
                })?;
            let member = space
                .resolve(&field.dsl_name())
                .filter(|member| !member.is_none())
                .ok_or_else(|| InstantiationError::MissingRecordValue {
                    class: class_name.to_string(),
                    field: field.name().to_string(),
                })?;

            let arg = if field.is_callback() {
                self.build_callback(env, class, field, member)?
            } else {
                self.convert(env, member)?
            };
            args.push(arg);
        }

        let mut object = ctor.invoke(args).map_err(|source| InstantiationError::Host {
            class: class_name.to_string(),
            source,
        })?;
        self.set_properties(env, class, object.as_mut(), space)?;
        Ok(HostValue::Object(Rc::from(object)))
    }

    fn instantiate_class(
        &self,
        env: &TypeEnvironment,
        class: &HostClass,
        space: &MemorySpace,
    ) -> Result<HostValue, InstantiationError> {
        let class_name = class.simple_name();
        if class.is_member_class() {
            return Err(InstantiationError::InnerClass {
                class: class_name.to_string(),
            });
        }

        let Some(ctor) = class.constructors().iter().find(|ctor| ctor.is_context_only()) else {
            let unmarked = match class.constructors() {
                [only] => only.params().iter().find(|param| !param.is_context()),
                _ => None,
            };
            return Err(match unmarked {
                Some(param) => InstantiationError::UnmarkedParameter {
                    class: class_name.to_string(),
                    parameter: param.name.clone(),
                },
                None => InstantiationError::MissingConstructor {
                    class: class_name.to_string(),
                },
            });
        };
        let args = ctor
            .params()
            .iter()
            .map(|param| {
                let name = param.context.as_deref().unwrap_or(&param.name);
                self.context
                    .get(name)
                    .cloned()
                    .ok_or_else(|| InstantiationError::MissingContextValue {
                        class: class_name.to_string(),
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut object = ctor.invoke(args).map_err(|source| InstantiationError::Host {
            class: class_name.to_string(),
            source,
        })?;

        for field in class.fields() {
            let Some(member) = space.resolve(&field.dsl_name()) else {
                continue;
            };
            let raw = match field.marker() {
                MemberMarker::Hidden => continue,
                // Host defaults stay unless DSL source assigned the member
                MemberMarker::Data { .. } if member.is_none() || !member.is_dirty() => continue,
                MemberMarker::Data { .. } => self.convert(env, member)?,
                MemberMarker::Callback { .. } if member.is_none() => continue,
                MemberMarker::Callback { .. } => self.build_callback(env, class, field, member)?,
            };
            trace!("  {}.{} = {}", class_name, field.name(), raw.kind_name());
            field
                .set(object.as_mut(), raw)
                .map_err(|source| InstantiationError::Host {
                    class: class_name.to_string(),
                    source,
                })?;
        }

        self.set_properties(env, class, object.as_mut(), space)?;
        Ok(HostValue::Object(Rc::from(object)))
    }

    /// Assign settable extension properties with a non-empty value
    fn set_properties(
        &self,
        env: &TypeEnvironment,
        class: &HostClass,
        object: &mut dyn Any,
        space: &MemorySpace,
    ) -> Result<(), InstantiationError> {
        for property in class.properties().iter().filter(|p| p.is_settable()) {
            let Some(member) = space.resolve(property.name()) else {
                continue;
            };
            if member.is_none() || member.is_empty_aggregate() {
                continue;
            }
            let raw = self.convert(env, member)?;
            if raw.is_none() {
                continue;
            }
            property
                .set(object, raw)
                .map_err(|source| InstantiationError::Host {
                    class: class.simple_name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Host callback for a callback field holding a DSL function value
    fn build_callback(
        &self,
        env: &TypeEnvironment,
        class: &HostClass,
        field: &HostField,
        member: &Value,
    ) -> Result<HostValue, InstantiationError> {
        let unexpected = |reason: &str| InstantiationError::UnexpectedValue {
            ty: env.types().name_of(member.ty()).to_string(),
            reason: format!("{} (field '{}' of {})", reason, field.name(), class.simple_name()),
        };

        let HostType::Callback(signature) = field.ty() else {
            return Err(unexpected("callback member without callback type"));
        };
        let kind = signature.kind;
        let missing_builder = || InstantiationError::MissingCallbackBuilder {
            class: class.simple_name().to_string(),
            field: field.name().to_string(),
            kind: kind.name().to_string(),
        };
        if !self.callbacks.has_wrapper(kind) {
            return Err(missing_builder());
        }

        let callable = match member.repr() {
            ValueRepr::Function(callable) => callable,
            // Host callbacks round-tripping through the DSL are passed on as is
            ValueRepr::Host(HostValue::Callback(callback)) => {
                return Ok(HostValue::Callback(callback.clone()))
            }
            _ => return Err(unexpected("expected a function value")),
        };
        let function_type = env
            .types()
            .get(member.ty())
            .and_then(Type::as_function)
            .ok_or_else(|| unexpected("function value without function type"))?;

        let adapter = self
            .callbacks
            .build_adapter(function_type, callable)
            .map_err(|source| InstantiationError::Callback {
                class: class.simple_name().to_string(),
                field: field.name().to_string(),
                source,
            })?;
        self.callbacks
            .wrap(kind, adapter)
            .map(HostValue::Callback)
            .ok_or_else(missing_builder)
    }
}

fn type_of(env: &TypeEnvironment, ty: TypeId) -> Result<&Type, InstantiationError> {
    env.types()
        .get(ty)
        .ok_or_else(|| InstantiationError::UnexpectedValue {
            ty: format!("#{}", ty.index()),
            reason: "unknown type".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use dsl_checker::NodeId;
    use dsl_types::{
        AdapterMethod, CtorParam, HostAdapter, HostClassKey, HostMethod, HostProperty, Symbol,
    };

    struct NoInterpreter;

    impl Interpreter for NoInterpreter {
        fn function_symbol(&self, _node: NodeId) -> Option<Symbol> {
            None
        }

        fn translate_host_value(
            &self,
            _value: HostValue,
            _ty: TypeId,
            _enclosing: &MemorySpace,
        ) -> Result<Value, RuntimeError> {
            Err(RuntimeError::Interpreter {
                message: "no interpreter".to_string(),
            })
        }

        fn execute_user_function(
            &self,
            _function: &Symbol,
            _enclosing: &MemorySpace,
            _args: Vec<Value>,
        ) -> Result<Value, RuntimeError> {
            Err(RuntimeError::Interpreter {
                message: "no interpreter".to_string(),
            })
        }
    }

    fn instantiator() -> TypeInstantiator {
        TypeInstantiator::new(Rc::new(NoInterpreter))
    }

    struct Owner {
        name: String,
    }

    struct Named {
        owner: Rc<Owner>,
        label: String,
    }

    struct Inner;

    struct Locked {
        _key: String,
    }

    #[derive(Default)]
    struct Tagged {
        tags: Vec<String>,
        title: String,
    }

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    struct PointAdapter;

    fn env() -> TypeEnvironment {
        let mut env = TypeEnvironment::new();
        env.register_class(
            HostClass::build::<Named>()
                .dsl_type()
                .data_field("label", HostType::String, |n: &mut Named, v: String| n.label = v)
                .constructor(vec![CtorParam::context("owner", "owner")], |args| {
                    Ok(Named {
                        owner: args.take()?,
                        label: String::new(),
                    })
                })
                .finish(),
        );
        env.register_class(
            HostClass::build::<Inner>()
                .dsl_type()
                .member_class()
                .constructor(Vec::new(), |_| Ok(Inner))
                .finish(),
        );
        env.register_class(
            HostClass::build::<Tagged>()
                .dsl_type()
                .data_field("tags", HostType::list(HostType::String), |t: &mut Tagged, v: Vec<String>| {
                    t.tags = v
                })
                .property(HostProperty::settable("title", HostType::String, |t: &mut Tagged, v: String| {
                    t.title = v
                }))
                .method(HostMethod::new(
                    "has_tag",
                    vec![HostType::String],
                    Some(HostType::Bool),
                    |t: &Tagged, args| {
                        let tag: String = args.take()?;
                        Ok(HostValue::Bool(t.tags.contains(&tag)))
                    },
                ))
                .default_constructor()
                .finish(),
        );
        env.register_class(
            HostClass::build::<Locked>()
                .dsl_type()
                .constructor(vec![CtorParam::component("key")], |args| {
                    Ok(Locked { _key: args.take()? })
                })
                .finish(),
        );
        env.load_types(&[
            HostClassKey::of::<Named>(),
            HostClassKey::of::<Inner>(),
            HostClassKey::of::<Tagged>(),
            HostClassKey::of::<Locked>(),
        ])
        .unwrap();
        env.register_adapter(
            &HostAdapter::new::<PointAdapter>().method(
                AdapterMethod::new::<Point>("build_point", |args| {
                    Ok(Point {
                        x: args.take()?,
                        y: args.take()?,
                    })
                })
                .marked()
                .param("x", HostType::Int)
                .param("y", HostType::Int),
            ),
        )
        .unwrap();
        env
    }

    fn aggregate<T: Any>(env: &TypeEnvironment) -> MemorySpace {
        MemorySpace::new(env.type_of_class(HostClassKey::of::<T>()).unwrap())
    }

    #[test]
    fn test_context_parameter_injected() {
        let env = env();
        let mut instantiator = instantiator();
        let space = aggregate::<Named>(&env).with(
            "label",
            Value::host(env.types().string_type(), HostValue::String("hero".into())).dirty(),
        );
        let value = Value::aggregate(space);
        let owner = HostValue::object(Owner {
            name: "player".to_string(),
        });

        let object = instantiator
            .with_context("owner", owner, |inst| inst.instantiate(&env, &value))
            .unwrap();
        let named = object.downcast::<Named>().unwrap();
        assert_eq!(named.owner.name, "player");
        assert_eq!(named.label, "hero");
        assert!(instantiator.context_member("owner").is_none());
    }

    #[test]
    fn test_missing_context_value() {
        let env = env();
        let value = Value::aggregate(aggregate::<Named>(&env));
        let err = instantiator().instantiate(&env, &value).unwrap_err();
        assert_eq!(
            err,
            InstantiationError::MissingContextValue {
                class: "Named".to_string(),
                name: "owner".to_string(),
            }
        );
    }

    #[test]
    fn test_inner_class_rejected() {
        let env = env();
        let value = Value::aggregate(aggregate::<Inner>(&env));
        assert!(matches!(
            instantiator().instantiate(&env, &value),
            Err(InstantiationError::InnerClass { .. })
        ));
    }

    #[test]
    fn test_constructor_with_unmarked_parameter() {
        let env = env();
        let value = Value::aggregate(aggregate::<Locked>(&env));
        let err = instantiator().instantiate(&env, &value).unwrap_err();
        assert_eq!(
            err,
            InstantiationError::UnmarkedParameter {
                class: "Locked".to_string(),
                parameter: "key".to_string(),
            }
        );
    }

    #[test]
    fn test_call_extension_method() {
        let mut env = env();
        let string = env.types().string_type();
        let list = env.types_mut().list_type(string);
        let tags = Value::new(
            list,
            ValueRepr::List(vec![Value::host(string, HostValue::String("loot".into()))]),
        )
        .dirty();
        let chest = Value::aggregate(aggregate::<Tagged>(&env).with("tags", tags));
        let instantiator = instantiator();

        let loot = Value::host(string, HostValue::String("loot".into()));
        let result = instantiator.call_method(&env, &chest, "has_tag", &[loot]).unwrap();
        assert_eq!(result.ty(), env.types().bool_type());
        assert_eq!(result.to_host(), Some(HostValue::Bool(true)));

        let object = instantiator.instantiate(&env, &chest).unwrap();
        let encapsulated = Value::encapsulated(chest.ty(), object);
        let boss = Value::host(string, HostValue::String("boss".into()));
        let result = instantiator
            .call_method(&env, &encapsulated, "has_tag", &[boss])
            .unwrap();
        assert_eq!(result.to_host(), Some(HostValue::Bool(false)));
    }

    #[test]
    fn test_unknown_extension_method() {
        let env = env();
        let chest = Value::aggregate(aggregate::<Tagged>(&env));
        let err = instantiator().call_method(&env, &chest, "open", &[]).unwrap_err();
        assert_eq!(
            err,
            InstantiationError::UnknownMethod {
                ty: "tagged".to_string(),
                method: "open".to_string(),
            }
        );

        // properties are members, not methods
        assert!(matches!(
            instantiator().call_method(&env, &chest, "title", &[]),
            Err(InstantiationError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_list_member_and_property() {
        let mut env = env();
        let string = env.types().string_type();
        let list = env.types_mut().list_type(string);
        let tags = Value::new(
            list,
            ValueRepr::List(vec![
                Value::host(string, HostValue::String("loot".into())),
                Value::host(string, HostValue::String("boss".into())),
            ]),
        )
        .dirty();
        let space = aggregate::<Tagged>(&env)
            .with("tags", tags)
            .with("title", Value::host(string, HostValue::String("Chest".into())));

        let object = instantiator()
            .instantiate(&env, &Value::aggregate(space))
            .unwrap();
        let tagged = object.downcast::<Tagged>().unwrap();
        assert_eq!(tagged.tags, vec!["loot".to_string(), "boss".to_string()]);
        assert_eq!(tagged.title, "Chest");
    }

    #[test]
    fn test_empty_property_value_is_skipped() {
        let env = env();
        let space = aggregate::<Tagged>(&env).with("title", Value::none(env.types()));
        let object = instantiator()
            .instantiate(&env, &Value::aggregate(space))
            .unwrap();
        assert_eq!(object.downcast::<Tagged>().unwrap().title, "");
    }

    #[test]
    fn test_multi_parameter_adapter_uses_own_members() {
        let env = env();
        let point_ty = env.type_of_class(HostClassKey::of::<Point>()).unwrap();
        let int = env.types().int_type();
        let space = MemorySpace::new(point_ty)
            .with("x", Value::host(int, HostValue::Int(3)))
            .with("y", Value::host(int, HostValue::Int(4)));

        let object = instantiator()
            .instantiate(&env, &Value::aggregate(space))
            .unwrap();
        assert_eq!(*object.downcast::<Point>().unwrap(), Point { x: 3, y: 4 });
    }

    #[test]
    fn test_encapsulated_object_returned_as_is() {
        let env = env();
        let point_ty = env.type_of_class(HostClassKey::of::<Point>()).unwrap();
        let object = HostValue::object(Point { x: 1, y: 1 });
        let value = Value::encapsulated(point_ty, object.clone());
        assert_eq!(instantiator().instantiate(&env, &value).unwrap(), object);
    }

    #[test]
    fn test_function_value_outside_callback_member() {
        let mut env = env();
        let none = env.types().none_type();
        let fn_ty = env.types_mut().function_type(Vec::new(), none);
        let value = Value::function(
            fn_ty,
            crate::value::Callable::Native {
                name: "print".to_string(),
            },
        );
        assert!(matches!(
            instantiator().instantiate(&env, &value),
            Err(InstantiationError::UnexpectedValue { .. })
        ));
    }
}
