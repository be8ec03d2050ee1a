//! Host class descriptors

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::value::{FromHostValue, HostArgs, HostError, HostValue};
use super::{CallbackSignature, HostClassKey, HostType};
use crate::naming::convert_to_dsl_name;

/// Type-erased member setter
pub type FieldSetter = Rc<dyn Fn(&mut dyn Any, HostValue) -> Result<(), HostError>>;

/// Type-erased constructor
pub type ConstructorFn = Rc<dyn Fn(&mut HostArgs) -> Result<Box<dyn Any>, HostError>>;

/// DSL visibility of a host field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberMarker {
    /// Not visible in the DSL
    Hidden,
    /// Plain data member, with an optional DSL name override
    Data {
        /// Override name
        name: Option<String>,
    },
    /// Callback member, with an optional DSL name override
    Callback {
        /// Override name
        name: Option<String>,
    },
}

/// Declared field of a host class
#[derive(Clone)]
pub struct HostField {
    name: String,
    ty: HostType,
    marker: MemberMarker,
    setter: Option<FieldSetter>,
}

impl HostField {
    /// Host field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared host type
    pub fn ty(&self) -> &HostType {
        &self.ty
    }

    /// DSL visibility
    pub fn marker(&self) -> &MemberMarker {
        &self.marker
    }

    /// Whether the field is visible in the DSL
    pub fn is_dsl_visible(&self) -> bool {
        !matches!(self.marker, MemberMarker::Hidden)
    }

    /// Whether the field is a callback member
    pub fn is_callback(&self) -> bool {
        matches!(self.marker, MemberMarker::Callback { .. })
    }

    /// DSL-facing member name: the override, or the converted field name
    pub fn dsl_name(&self) -> String {
        match &self.marker {
            MemberMarker::Data { name: Some(name) } | MemberMarker::Callback { name: Some(name) } => {
                name.clone()
            }
            _ => convert_to_dsl_name(&self.name),
        }
    }

    /// Assign a value to this field of `target`
    pub fn set(&self, target: &mut dyn Any, value: HostValue) -> Result<(), HostError> {
        match &self.setter {
            Some(setter) => setter(target, value),
            None => Err(HostError::Failed {
                message: format!("Field '{}' cannot be assigned", self.name),
            }),
        }
    }
}

impl fmt::Debug for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostField")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("marker", &self.marker)
            .finish()
    }
}

/// Constructor parameter descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtorParam {
    /// Parameter name; for records the name of the matching field
    pub name: String,
    /// Context key the value is injected from
    pub context: Option<String>,
}

impl CtorParam {
    /// Parameter injected from the instantiation context under `key`
    pub fn context(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: Some(key.into()),
        }
    }

    /// Record component parameter, filled from the field with the same name
    pub fn component(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
        }
    }

    /// Whether this parameter comes from the context
    pub fn is_context(&self) -> bool {
        self.context.is_some()
    }
}

/// Constructor of a host class
#[derive(Clone)]
pub struct HostConstructor {
    params: Vec<CtorParam>,
    invoke: ConstructorFn,
}

impl HostConstructor {
    /// Parameters in declaration order
    pub fn params(&self) -> &[CtorParam] {
        &self.params
    }

    /// Whether every parameter is injected from the context
    pub fn is_context_only(&self) -> bool {
        self.params.iter().all(CtorParam::is_context)
    }

    /// Construct a new object
    pub fn invoke(&self, args: Vec<HostValue>) -> Result<Box<dyn Any>, HostError> {
        let mut args = HostArgs::new(args);
        (self.invoke)(&mut args)
    }
}

impl fmt::Debug for HostConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostConstructor")
            .field("params", &self.params)
            .finish()
    }
}

/// Extension property attached to a host class
#[derive(Clone)]
pub struct HostProperty {
    name: String,
    ty: HostType,
    setter: Option<FieldSetter>,
}

impl HostProperty {
    /// Settable property of `T`
    pub fn settable<T: Any, V: FromHostValue + 'static>(
        name: impl Into<String>,
        ty: HostType,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            setter: Some(erase_setter(set)),
        }
    }

    /// Read-only property
    pub fn read_only(name: impl Into<String>, ty: HostType) -> Self {
        Self {
            name: name.into(),
            ty,
            setter: None,
        }
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property type
    pub fn ty(&self) -> &HostType {
        &self.ty
    }

    /// Whether the property can be assigned
    pub fn is_settable(&self) -> bool {
        self.setter.is_some()
    }

    /// Assign the property on `target`
    pub fn set(&self, target: &mut dyn Any, value: HostValue) -> Result<(), HostError> {
        match &self.setter {
            Some(setter) => setter(target, value),
            None => Err(HostError::Failed {
                message: format!("Property '{}' is read-only", self.name),
            }),
        }
    }
}

impl fmt::Debug for HostProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostProperty")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("settable", &self.is_settable())
            .finish()
    }
}

/// Type-erased extension method body, called with the receiver
pub type MethodFn = Rc<dyn Fn(&dyn Any, &mut HostArgs) -> Result<HostValue, HostError>>;

/// Extension method attached to a host class
#[derive(Clone)]
pub struct HostMethod {
    name: String,
    params: Vec<HostType>,
    ret: Option<HostType>,
    invoke: MethodFn,
}

impl HostMethod {
    /// Method `name` on receivers of type `T`
    ///
    /// `ret` is `None` for methods without a result.
    pub fn new<T: Any>(
        name: impl Into<String>,
        params: Vec<HostType>,
        ret: Option<HostType>,
        call: impl Fn(&T, &mut HostArgs) -> Result<HostValue, HostError> + 'static,
    ) -> Self {
        let invoke: MethodFn = Rc::new(move |receiver: &dyn Any, args: &mut HostArgs| {
            let receiver = receiver
                .downcast_ref::<T>()
                .ok_or(HostError::TargetMismatch {
                    expected: std::any::type_name::<T>(),
                })?;
            call(receiver, args)
        });
        Self {
            name: name.into(),
            params,
            ret,
            invoke,
        }
    }

    /// Method name, used verbatim in the DSL
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types
    pub fn params(&self) -> &[HostType] {
        &self.params
    }

    /// Result type
    pub fn ret(&self) -> Option<&HostType> {
        self.ret.as_ref()
    }

    /// Call the method on a host object
    pub fn call(&self, receiver: &HostValue, args: Vec<HostValue>) -> Result<HostValue, HostError> {
        let HostValue::Object(object) = receiver else {
            return Err(HostError::TypeMismatch {
                expected: "object".to_string(),
                actual: receiver.kind_name().to_string(),
            });
        };
        if args.len() != self.params.len() {
            return Err(HostError::Failed {
                message: format!(
                    "Method '{}' expects {} arguments, got {}",
                    self.name,
                    self.params.len(),
                    args.len()
                ),
            });
        }
        let mut args = HostArgs::new(args);
        (self.invoke)(&**object, &mut args)
    }
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethod")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish()
    }
}

/// Variants of a host enumeration and their host values
#[derive(Clone)]
pub struct HostEnum {
    names: Vec<String>,
    values: Vec<HostValue>,
    index_of: Rc<dyn Fn(&dyn Any) -> Option<usize>>,
}

impl HostEnum {
    /// Enumeration with the given `(variant name, host value)` pairs
    pub fn new<T: Any + Clone + PartialEq>(variants: &[(&str, T)]) -> Self {
        let names = variants.iter().map(|(name, _)| name.to_string()).collect();
        let values = variants
            .iter()
            .map(|(_, value)| HostValue::object(value.clone()))
            .collect();
        let known: Vec<T> = variants.iter().map(|(_, value)| value.clone()).collect();
        let index_of = Rc::new(move |object: &dyn Any| {
            let value = object.downcast_ref::<T>()?;
            known.iter().position(|candidate| candidate == value)
        });
        Self {
            names,
            values,
            index_of,
        }
    }

    /// Variant names in declaration order
    pub fn variants(&self) -> &[String] {
        &self.names
    }

    /// Host value of the variant `name`
    pub fn value_of(&self, name: &str) -> Option<HostValue> {
        let index = self.names.iter().position(|n| n == name)?;
        self.values.get(index).cloned()
    }

    /// Variant name of a host enum object
    pub fn variant_of(&self, value: &HostValue) -> Option<&str> {
        let HostValue::Object(object) = value else {
            return None;
        };
        let index = (self.index_of)(&**object)?;
        self.names.get(index).map(String::as_str)
    }
}

impl PartialEq for HostEnum {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for HostEnum {}

impl fmt::Debug for HostEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostEnum").field(&self.names).finish()
    }
}

/// Structural kind of a host class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    /// Ordinary class: constructed, then assigned field by field
    Class,
    /// Record: every component is passed to the canonical constructor
    Record,
    /// Member class that needs an enclosing instance
    Member,
    /// Enumeration
    Enum(HostEnum),
}

/// Registered description of a host class
#[derive(Clone, Debug)]
pub struct HostClass {
    key: HostClassKey,
    marker: Option<Option<String>>,
    kind: ClassKind,
    fields: Vec<HostField>,
    constructors: Vec<HostConstructor>,
    properties: Vec<HostProperty>,
    methods: Vec<HostMethod>,
}

impl HostClass {
    /// Start describing the host type `T`
    pub fn build<T: Any>() -> ClassBuilder<T> {
        ClassBuilder {
            class: HostClass {
                key: HostClassKey::of::<T>(),
                marker: None,
                kind: ClassKind::Class,
                fields: Vec::new(),
                constructors: Vec::new(),
                properties: Vec::new(),
                methods: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// Key of the described type
    pub fn key(&self) -> HostClassKey {
        self.key
    }

    /// Simple type name
    pub fn simple_name(&self) -> &'static str {
        self.key.simple_name()
    }

    /// Whether the class carries the DSL type marker
    pub fn is_dsl_type(&self) -> bool {
        self.marker.is_some()
    }

    /// DSL type name override
    pub fn name_override(&self) -> Option<&str> {
        self.marker.as_ref().and_then(|name| name.as_deref())
    }

    /// Structural kind
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Whether this is a record
    pub fn is_record(&self) -> bool {
        self.kind == ClassKind::Record
    }

    /// Whether this is a member (inner) class
    pub fn is_member_class(&self) -> bool {
        self.kind == ClassKind::Member
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[HostField] {
        &self.fields
    }

    /// Look up a declared field by host name
    pub fn field(&self, name: &str) -> Option<&HostField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared constructors
    pub fn constructors(&self) -> &[HostConstructor] {
        &self.constructors
    }

    /// Extension properties
    pub fn properties(&self) -> &[HostProperty] {
        &self.properties
    }

    /// Look up an extension property by name
    pub fn property(&self, name: &str) -> Option<&HostProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub(crate) fn add_property(&mut self, property: HostProperty) {
        self.properties.push(property);
    }

    /// Extension methods
    pub fn methods(&self) -> &[HostMethod] {
        &self.methods
    }

    /// Look up an extension method by name
    pub fn method(&self, name: &str) -> Option<&HostMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub(crate) fn add_method(&mut self, method: HostMethod) {
        self.methods.push(method);
    }
}

fn erase_setter<T: Any, V: FromHostValue + 'static>(
    set: impl Fn(&mut T, V) + 'static,
) -> FieldSetter {
    Rc::new(move |target: &mut dyn Any, value: HostValue| {
        let target = target
            .downcast_mut::<T>()
            .ok_or(HostError::TargetMismatch {
                expected: std::any::type_name::<T>(),
            })?;
        set(target, V::from_host(value)?);
        Ok(())
    })
}

/// Builder for [`HostClass`]
pub struct ClassBuilder<T> {
    class: HostClass,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> ClassBuilder<T> {
    /// Mark the class as a DSL type named after the class
    pub fn dsl_type(mut self) -> Self {
        self.class.marker = Some(None);
        self
    }

    /// Mark the class as a DSL type with an explicit name
    pub fn dsl_type_named(mut self, name: impl Into<String>) -> Self {
        self.class.marker = Some(Some(name.into()));
        self
    }

    /// Declare the class as a record
    pub fn record(mut self) -> Self {
        self.class.kind = ClassKind::Record;
        self
    }

    /// Declare the class as a member class
    pub fn member_class(mut self) -> Self {
        self.class.kind = ClassKind::Member;
        self
    }

    fn push_field(mut self, name: &str, ty: HostType, marker: MemberMarker, setter: Option<FieldSetter>) -> Self {
        self.class.fields.push(HostField {
            name: name.to_string(),
            ty,
            marker,
            setter,
        });
        self
    }

    /// DSL-visible data field
    pub fn data_field<V: FromHostValue + 'static>(
        self,
        name: &str,
        ty: HostType,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        self.push_field(name, ty, MemberMarker::Data { name: None }, Some(erase_setter(set)))
    }

    /// DSL-visible data field with a DSL name override
    pub fn data_field_as<V: FromHostValue + 'static>(
        self,
        name: &str,
        dsl_name: &str,
        ty: HostType,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        let marker = MemberMarker::Data {
            name: Some(dsl_name.to_string()),
        };
        self.push_field(name, ty, marker, Some(erase_setter(set)))
    }

    /// DSL-visible record component, passed to the canonical constructor
    pub fn component(self, name: &str, ty: HostType) -> Self {
        self.push_field(name, ty, MemberMarker::Data { name: None }, None)
    }

    /// DSL-visible record component with a DSL name override
    pub fn component_as(self, name: &str, dsl_name: &str, ty: HostType) -> Self {
        let marker = MemberMarker::Data {
            name: Some(dsl_name.to_string()),
        };
        self.push_field(name, ty, marker, None)
    }

    /// DSL-visible callback field
    pub fn callback_field<V: FromHostValue + 'static>(
        self,
        name: &str,
        signature: CallbackSignature,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        self.push_field(
            name,
            HostType::Callback(signature),
            MemberMarker::Callback { name: None },
            Some(erase_setter(set)),
        )
    }

    /// DSL-visible callback record component
    pub fn callback_component(self, name: &str, signature: CallbackSignature) -> Self {
        self.push_field(
            name,
            HostType::Callback(signature),
            MemberMarker::Callback { name: None },
            None,
        )
    }

    /// Field that is not visible in the DSL
    pub fn hidden_field(self, name: &str, ty: HostType) -> Self {
        self.push_field(name, ty, MemberMarker::Hidden, None)
    }

    /// Declare a constructor
    pub fn constructor(
        mut self,
        params: Vec<CtorParam>,
        construct: impl Fn(&mut HostArgs) -> Result<T, HostError> + 'static,
    ) -> Self {
        let invoke: ConstructorFn =
            Rc::new(move |args: &mut HostArgs| Ok(Box::new(construct(args)?) as Box<dyn Any>));
        self.class.constructors.push(HostConstructor { params, invoke });
        self
    }

    /// Declare an extension property
    pub fn property(mut self, property: HostProperty) -> Self {
        self.class.properties.push(property);
        self
    }

    /// Declare an extension method
    pub fn method(mut self, method: HostMethod) -> Self {
        self.class.methods.push(method);
        self
    }

    /// Finish the description
    pub fn finish(self) -> HostClass {
        self.class
    }
}

impl<T: Any + Clone + PartialEq> ClassBuilder<T> {
    /// Declare the class as an enumeration of the given variants
    pub fn enumeration(mut self, variants: &[(&str, T)]) -> Self {
        self.class.kind = ClassKind::Enum(HostEnum::new(variants));
        self
    }
}

impl<T: Any + Default> ClassBuilder<T> {
    /// Declare the parameterless constructor `T::default()`
    pub fn default_constructor(self) -> Self {
        self.constructor(Vec::new(), |_| Ok(T::default()))
    }
}

/// Registered host classes, keyed by host type
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    classes: FxHashMap<HostClassKey, HostClass>,
}

impl HostRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, returning a previous registration for the same type
    pub fn register(&mut self, class: HostClass) -> Option<HostClass> {
        self.classes.insert(class.key, class)
    }

    /// Look up a class
    pub fn get(&self, key: HostClassKey) -> Option<&HostClass> {
        self.classes.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: HostClassKey) -> Option<&mut HostClass> {
        self.classes.get_mut(&key)
    }

    /// Check if a class is registered
    pub fn contains(&self, key: HostClassKey) -> bool {
        self.classes.contains_key(&key)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
