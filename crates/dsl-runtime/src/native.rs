//! The `instantiate` and `instantiate_named` built-ins
//!
//! Both turn a prototype value into an entity: the embedder creates the
//! entity, every component of the prototype is instantiated with the entity
//! available as a context member, and each component is attached to it.
//! Deferred components (see [`EngineConfig::deferred_components`]) are
//! instantiated after all others so they can rely on their siblings.

use log::{debug, warn};

use dsl_types::{HostError, HostValue, Type, TypeEnvironment};

use crate::config::EngineConfig;
use crate::error::InstantiationError;
use crate::instantiator::TypeInstantiator;
use crate::value::{MemorySpace, Value};

/// Entity storage of the embedding engine
pub trait EntityHost {
    /// Create a new entity, optionally named
    fn create_entity(&mut self, name: Option<&str>) -> Result<HostValue, HostError>;

    /// Attach an instantiated component to an entity
    fn attach_component(&mut self, entity: &HostValue, component: HostValue) -> Result<(), HostError>;
}

/// Builds entities from prototype values
pub struct EntityInstantiator<'a> {
    env: &'a TypeEnvironment,
    instantiator: &'a mut TypeInstantiator,
    config: &'a EngineConfig,
}

impl<'a> EntityInstantiator<'a> {
    /// Create an entity instantiator
    pub fn new(
        env: &'a TypeEnvironment,
        instantiator: &'a mut TypeInstantiator,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            env,
            instantiator,
            config,
        }
    }

    /// `instantiate(prototype)`
    pub fn instantiate(
        &mut self,
        host: &mut dyn EntityHost,
        prototype: &Value,
    ) -> Result<HostValue, InstantiationError> {
        self.build(host, prototype, None)
    }

    /// `instantiate_named(prototype, name)`
    pub fn instantiate_named(
        &mut self,
        host: &mut dyn EntityHost,
        prototype: &Value,
        name: &str,
    ) -> Result<HostValue, InstantiationError> {
        self.build(host, prototype, Some(name))
    }

    fn build(
        &mut self,
        host: &mut dyn EntityHost,
        prototype: &Value,
        name: Option<&str>,
    ) -> Result<HostValue, InstantiationError> {
        let env = self.env;
        let config = self.config;
        let space = prototype_space(env, prototype)?;

        let entity = host
            .create_entity(name)
            .map_err(|source| InstantiationError::Host {
                class: env.types().name_of(prototype.ty()).to_string(),
                source,
            })?;
        debug!(
            "Instantiating entity of prototype '{}'",
            env.types().name_of(prototype.ty())
        );

        self.instantiator
            .with_context(&config.entity_context_name, entity.clone(), |instantiator| {
                attach_components(env, config, instantiator, host, &entity, prototype, space)
            })?;
        Ok(entity)
    }
}

fn prototype_space<'v>(env: &TypeEnvironment, prototype: &'v Value) -> Result<&'v MemorySpace, InstantiationError> {
    let type_name = || env.types().name_of(prototype.ty()).to_string();
    match env.types().get(prototype.ty()) {
        Some(Type::Aggregate(aggregate)) if aggregate.origin().is_none() => {
            prototype.memory_space().ok_or_else(|| InstantiationError::UnexpectedValue {
                ty: type_name(),
                reason: "prototype value without members".to_string(),
            })
        }
        _ => Err(InstantiationError::NotAPrototype { ty: type_name() }),
    }
}

fn attach_components(
    env: &TypeEnvironment,
    config: &EngineConfig,
    instantiator: &mut TypeInstantiator,
    host: &mut dyn EntityHost,
    entity: &HostValue,
    prototype: &Value,
    space: &MemorySpace,
) -> Result<(), InstantiationError> {
    let types = env.types();
    let Some(members) = types.get(prototype.ty()).and_then(Type::members) else {
        return Ok(());
    };

    let mut deferred = Vec::new();
    for member in members.symbols() {
        let Some(component) = space.resolve(&member.name) else {
            warn!(
                "Prototype '{}' has no value for component '{}'",
                types.name_of(prototype.ty()),
                member.name
            );
            continue;
        };
        if config.is_deferred(types.name_of(member.ty)) {
            deferred.push(component);
            continue;
        }
        attach(env, instantiator, host, entity, component)?;
    }

    for component in deferred {
        attach(env, instantiator, host, entity, component)?;
    }
    Ok(())
}

fn attach(
    env: &TypeEnvironment,
    instantiator: &TypeInstantiator,
    host: &mut dyn EntityHost,
    entity: &HostValue,
    component: &Value,
) -> Result<(), InstantiationError> {
    let object = instantiator.instantiate(env, component)?;
    host.attach_component(entity, object)
        .map_err(|source| InstantiationError::Host {
            class: env.types().name_of(component.ty()).to_string(),
            source,
        })
}
