//! Adapter classes: static builder methods producing host objects

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::value::{HostArgs, HostError, HostValue};
use super::{HostClassKey, HostType};
use crate::naming::convert_to_dsl_name;

type BuilderFn = Rc<dyn Fn(&mut HostArgs) -> Result<HostValue, HostError>>;

/// Invocable builder method of an adapter type
#[derive(Clone)]
pub struct BuilderMethod {
    name: String,
    invoke: BuilderFn,
}

impl BuilderMethod {
    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the builder with positional arguments
    pub fn call(&self, args: Vec<HostValue>) -> Result<HostValue, HostError> {
        let mut args = HostArgs::new(args);
        (self.invoke)(&mut args)
    }
}

impl fmt::Debug for BuilderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuilderMethod({})", self.name)
    }
}

/// Parameter of an adapter method
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterParam {
    /// Host parameter name
    pub name: String,
    /// Declared host type
    pub ty: HostType,
    /// DSL name override
    pub dsl_name: Option<String>,
}

impl AdapterParam {
    /// DSL-facing parameter name
    pub fn dsl_name(&self) -> String {
        self.dsl_name
            .clone()
            .unwrap_or_else(|| convert_to_dsl_name(&self.name))
    }
}

/// Method declared on an adapter class
#[derive(Clone)]
pub struct AdapterMethod {
    builder: BuilderMethod,
    produces: HostClassKey,
    params: Vec<AdapterParam>,
    marker: Option<Option<String>>,
    is_static: bool,
}

impl AdapterMethod {
    /// Static method `name` producing a `P`
    pub fn new<P: Any>(
        name: impl Into<String>,
        build: impl Fn(&mut HostArgs) -> Result<P, HostError> + 'static,
    ) -> Self {
        let invoke: BuilderFn =
            Rc::new(move |args: &mut HostArgs| Ok(HostValue::object(build(args)?)));
        Self {
            builder: BuilderMethod {
                name: name.into(),
                invoke,
            },
            produces: HostClassKey::of::<P>(),
            params: Vec::new(),
            marker: None,
            is_static: true,
        }
    }

    /// Mark as the adapter method; the produced type is named after its class
    pub fn marked(mut self) -> Self {
        self.marker = Some(None);
        self
    }

    /// Mark as the adapter method with an explicit produced type name
    pub fn marked_as(mut self, type_name: impl Into<String>) -> Self {
        self.marker = Some(Some(type_name.into()));
        self
    }

    /// Declare the method as an instance method
    pub fn instance(mut self) -> Self {
        self.is_static = false;
        self
    }

    /// Append a parameter
    pub fn param(mut self, name: impl Into<String>, ty: HostType) -> Self {
        self.params.push(AdapterParam {
            name: name.into(),
            ty,
            dsl_name: None,
        });
        self
    }

    /// Append a parameter with a DSL name override
    pub fn param_as(mut self, name: impl Into<String>, dsl_name: impl Into<String>, ty: HostType) -> Self {
        self.params.push(AdapterParam {
            name: name.into(),
            ty,
            dsl_name: Some(dsl_name.into()),
        });
        self
    }

    /// Method name
    pub fn name(&self) -> &str {
        self.builder.name()
    }

    /// Produced host class
    pub fn produces(&self) -> HostClassKey {
        self.produces
    }

    /// Declared parameters
    pub fn params(&self) -> &[AdapterParam] {
        &self.params
    }

    /// Whether this method carries the adapter marker
    pub fn is_marked(&self) -> bool {
        self.marker.is_some()
    }

    /// Produced type name override
    pub fn name_override(&self) -> Option<&str> {
        self.marker.as_ref().and_then(|name| name.as_deref())
    }

    /// Whether the method is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The invocable builder
    pub fn builder(&self) -> &BuilderMethod {
        &self.builder
    }
}

impl fmt::Debug for AdapterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterMethod")
            .field("name", &self.name())
            .field("produces", &self.produces)
            .field("params", &self.params)
            .field("marked", &self.is_marked())
            .field("static", &self.is_static)
            .finish()
    }
}

/// Adapter class: a host type grouping adapter methods
#[derive(Debug, Clone)]
pub struct HostAdapter {
    key: HostClassKey,
    methods: Vec<AdapterMethod>,
}

impl HostAdapter {
    /// Adapter class `A`
    pub fn new<A: Any>() -> Self {
        Self {
            key: HostClassKey::of::<A>(),
            methods: Vec::new(),
        }
    }

    /// Declare a method
    pub fn method(mut self, method: AdapterMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Adapter class key
    pub fn key(&self) -> HostClassKey {
        self.key
    }

    /// Declared methods
    pub fn methods(&self) -> &[AdapterMethod] {
        &self.methods
    }

    /// The first marked static method
    pub fn adapter_method(&self) -> Option<&AdapterMethod> {
        self.methods.iter().find(|m| m.is_marked() && m.is_static())
    }
}
