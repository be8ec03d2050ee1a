//! Dungeon DSL Type System
//!
//! Type model, host type registration and host type derivation for the
//! dungeon DSL. Host types are described through explicit registration
//! (see [`host`]) and turned into DSL types by the [`TypeBuilder`].

#![warn(missing_docs)]

pub mod ty;
pub mod scope;
pub mod context;
pub mod error;
pub mod host;
pub mod naming;
pub mod builder;
pub mod function_types;
pub mod environment;

pub use ty::{
    AdaptedType, AggregateType, AggregateTypeAdapter, BasicType, EnumType, FunctionType, ListType,
    MapType, SetType, Type, TypeId, TypeKind,
};
pub use scope::{DuplicateSymbolError, Scope, ScopeRef, Symbol, SymbolKey, SymbolKind};
pub use context::TypeContext;
pub use error::TypeError;
pub use host::{
    AdapterMethod, AdapterParam, BiFunction, BuilderMethod, CallbackKind, CallbackSignature,
    ClassBuilder, ClassKind, Consumer, CtorParam, FromHostValue, Function, HostAdapter, HostArgs,
    HostCallback, HostClass, HostClassKey, HostConstructor, HostEnum, HostError, HostField,
    HostMethod, HostProperty, HostRegistry, HostType, HostValue, IntoHostValue, MemberMarker,
    TriConsumer,
};
pub use naming::convert_to_dsl_name;
pub use builder::{RegisteredAdapter, TypeBuilder};
pub use function_types::{FunctionTypeBuilder, SignatureParts};
pub use environment::TypeEnvironment;
