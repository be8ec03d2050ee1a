//! Function type builders for callback members
//!
//! Each functional interface kind decides which of its generic type arguments
//! are parameters and which one, if any, is the result.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::TypeError;
use crate::host::{CallbackKind, CallbackSignature, HostType};

/// Parameter and result host types of a callback signature
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParts<'a> {
    /// Parameter types in order
    pub params: Vec<&'a HostType>,
    /// Result type, `None` for callbacks without a result
    pub ret: Option<&'a HostType>,
}

/// Splits a callback signature into function type parts
pub trait FunctionTypeBuilder {
    /// Split `signature` into parameters and result
    fn split<'a>(&self, signature: &'a CallbackSignature) -> Result<SignatureParts<'a>, TypeError>;
}

fn check_arity(signature: &CallbackSignature, expected: usize) -> Result<(), TypeError> {
    if signature.type_args.len() != expected {
        return Err(TypeError::CallbackArity {
            kind: signature.kind.name().to_string(),
            expected,
            actual: signature.type_args.len(),
        });
    }
    Ok(())
}

/// Consumer-like interfaces: every type argument is a parameter
#[derive(Debug, Clone, Copy)]
pub struct ConsumerTypeBuilder {
    arity: usize,
}

impl ConsumerTypeBuilder {
    /// Builder for consumers taking `arity` arguments
    pub fn new(arity: usize) -> Self {
        Self { arity }
    }
}

impl FunctionTypeBuilder for ConsumerTypeBuilder {
    fn split<'a>(&self, signature: &'a CallbackSignature) -> Result<SignatureParts<'a>, TypeError> {
        check_arity(signature, self.arity)?;
        Ok(SignatureParts {
            params: signature.type_args.iter().collect(),
            ret: None,
        })
    }
}

/// Function-like interfaces: the last type argument is the result
#[derive(Debug, Clone, Copy)]
pub struct FunctionTypeWithResult {
    arity: usize,
}

impl FunctionTypeWithResult {
    /// Builder for functions taking `arity` arguments
    pub fn new(arity: usize) -> Self {
        Self { arity }
    }
}

impl FunctionTypeBuilder for FunctionTypeWithResult {
    fn split<'a>(&self, signature: &'a CallbackSignature) -> Result<SignatureParts<'a>, TypeError> {
        check_arity(signature, self.arity + 1)?;
        let (ret, params) = signature
            .type_args
            .split_last()
            .ok_or_else(|| TypeError::CallbackArity {
                kind: signature.kind.name().to_string(),
                expected: self.arity + 1,
                actual: 0,
            })?;
        Ok(SignatureParts {
            params: params.iter().collect(),
            ret: Some(ret),
        })
    }
}

/// Builders for every supported callback kind
pub fn default_builders() -> FxHashMap<CallbackKind, Rc<dyn FunctionTypeBuilder>> {
    let mut builders: FxHashMap<CallbackKind, Rc<dyn FunctionTypeBuilder>> = FxHashMap::default();
    builders.insert(CallbackKind::Consumer, Rc::new(ConsumerTypeBuilder::new(1)));
    builders.insert(CallbackKind::TriConsumer, Rc::new(ConsumerTypeBuilder::new(3)));
    builders.insert(CallbackKind::Function, Rc::new(FunctionTypeWithResult::new(1)));
    builders.insert(CallbackKind::BiFunction, Rc::new(FunctionTypeWithResult::new(2)));
    builders
}
