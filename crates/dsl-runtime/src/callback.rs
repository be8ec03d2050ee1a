//! Host callbacks backed by DSL functions
//!
//! A [`CallbackAdapter`] lets host code call a DSL function as if it were a
//! native callback. The [`CallbackAdapterBuilder`] creates adapters and wraps
//! them into [`HostCallback`]s of the shape a host field expects.

use std::cell::Cell;
use std::rc::Rc;

use log::trace;
use rustc_hash::FxHashMap;

use dsl_checker::NodeId;
use dsl_types::{CallbackKind, FunctionType, HostCallback, HostValue};

use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::value::{Callable, MemorySpace};

/// Wraps an adapter into a host callback of one kind
pub type CallbackWrapper = Rc<dyn Fn(Rc<CallbackAdapter>) -> HostCallback>;

/// Nesting depth shared by all adapters of one builder
#[derive(Debug, Clone)]
struct Depth {
    current: Rc<Cell<usize>>,
    limit: usize,
}

impl Depth {
    fn enter(&self) -> Result<DepthGuard, RuntimeError> {
        let depth = self.current.get();
        if depth >= self.limit {
            return Err(RuntimeError::DepthLimit { limit: self.limit });
        }
        self.current.set(depth + 1);
        Ok(DepthGuard(Rc::clone(&self.current)))
    }
}

struct DepthGuard(Rc<Cell<usize>>);

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// DSL function callable from host code
pub struct CallbackAdapter {
    interpreter: Rc<dyn Interpreter>,
    function_type: FunctionType,
    node: NodeId,
    enclosing: Rc<MemorySpace>,
    depth: Depth,
}

impl CallbackAdapter {
    /// Function type of the wrapped DSL function
    pub fn function_type(&self) -> &FunctionType {
        &self.function_type
    }

    /// Defining node of the wrapped DSL function
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Call the DSL function with host arguments
    ///
    /// Arguments are translated to DSL values of the parameter types, the
    /// function runs to completion and the raw value of its result is
    /// returned.
    pub fn call(&self, args: Vec<HostValue>) -> Result<HostValue, RuntimeError> {
        let params = self.function_type.params();
        if args.len() != params.len() {
            return Err(RuntimeError::ArgumentCount {
                function: self.function_type.name().to_string(),
                expected: params.len(),
                actual: args.len(),
            });
        }

        let _guard = self.depth.enter()?;
        let values = args
            .into_iter()
            .zip(params)
            .map(|(arg, &ty)| self.interpreter.translate_host_value(arg, ty, &self.enclosing))
            .collect::<Result<Vec<_>, _>>()?;

        let symbol = self
            .interpreter
            .function_symbol(self.node)
            .ok_or(RuntimeError::UnresolvedFunction { node: self.node.0 })?;
        trace!("Callback into DSL function '{}'", symbol.name);

        let result = self
            .interpreter
            .execute_user_function(&symbol, &self.enclosing, values)?;
        result.to_host().ok_or_else(|| RuntimeError::Marshal {
            ty: self.function_type.name().to_string(),
            reason: format!("result of '{}' has no raw host value", symbol.name),
        })
    }
}

/// Creates callback adapters and their host-callable wrappers
pub struct CallbackAdapterBuilder {
    interpreter: Rc<dyn Interpreter>,
    wrappers: FxHashMap<CallbackKind, CallbackWrapper>,
    depth: Depth,
}

impl CallbackAdapterBuilder {
    /// Default nesting limit for callback re-entry
    pub const DEFAULT_DEPTH_LIMIT: usize = 64;

    /// Create a builder with wrappers for every callback kind
    pub fn new(interpreter: Rc<dyn Interpreter>) -> Self {
        let mut builder = Self {
            interpreter,
            wrappers: FxHashMap::default(),
            depth: Depth {
                current: Rc::new(Cell::new(0)),
                limit: Self::DEFAULT_DEPTH_LIMIT,
            },
        };
        for kind in [CallbackKind::Consumer, CallbackKind::TriConsumer] {
            builder.register_wrapper(kind, Rc::new(move |adapter: Rc<CallbackAdapter>| {
                consumer_wrapper(kind, adapter)
            }));
        }
        for kind in [CallbackKind::Function, CallbackKind::BiFunction] {
            builder.register_wrapper(kind, Rc::new(move |adapter: Rc<CallbackAdapter>| {
                function_wrapper(kind, adapter)
            }));
        }
        builder
    }

    /// Set the nesting limit for callback re-entry
    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth.limit = limit;
        self
    }

    /// Register (or replace) the wrapper for a callback kind
    pub fn register_wrapper(&mut self, kind: CallbackKind, wrapper: CallbackWrapper) {
        self.wrappers.insert(kind, wrapper);
    }

    /// Remove the wrapper for a callback kind
    pub fn remove_wrapper(&mut self, kind: CallbackKind) -> bool {
        self.wrappers.remove(&kind).is_some()
    }

    /// Check if a wrapper is registered for a callback kind
    pub fn has_wrapper(&self, kind: CallbackKind) -> bool {
        self.wrappers.contains_key(&kind)
    }

    /// Create an adapter for a function value
    pub fn build_adapter(
        &self,
        function_type: &FunctionType,
        callable: &Callable,
    ) -> Result<CallbackAdapter, RuntimeError> {
        match callable {
            Callable::User { node, enclosing } => Ok(CallbackAdapter {
                interpreter: Rc::clone(&self.interpreter),
                function_type: function_type.clone(),
                node: *node,
                enclosing: Rc::clone(enclosing),
                depth: self.depth.clone(),
            }),
            Callable::Native { name } => Err(RuntimeError::UnsupportedCallable { name: name.clone() }),
        }
    }

    /// Wrap an adapter into a host callback of `kind`
    ///
    /// Returns `None` if no wrapper is registered for `kind`.
    pub fn wrap(&self, kind: CallbackKind, adapter: CallbackAdapter) -> Option<HostCallback> {
        let wrapper = self.wrappers.get(&kind)?;
        Some(wrapper(Rc::new(adapter)))
    }
}

fn consumer_wrapper(kind: CallbackKind, adapter: Rc<CallbackAdapter>) -> HostCallback {
    HostCallback::new(kind, move |args| {
        adapter.call(args)?;
        Ok(HostValue::None)
    })
}

fn function_wrapper(kind: CallbackKind, adapter: Rc<CallbackAdapter>) -> HostCallback {
    HostCallback::new(kind, move |args| Ok(adapter.call(args)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use dsl_types::{Symbol, SymbolKind, TypeContext, TypeId};
    use std::cell::RefCell;

    /// Doubles its int argument and records every call
    struct Doubler {
        types: TypeContext,
        calls: RefCell<Vec<Value>>,
    }

    impl Interpreter for Doubler {
        fn function_symbol(&self, node: NodeId) -> Option<Symbol> {
            (node == NodeId(1)).then(|| Symbol::new("double", SymbolKind::Function, self.types.int_type()))
        }

        fn translate_host_value(
            &self,
            value: HostValue,
            ty: TypeId,
            _enclosing: &MemorySpace,
        ) -> Result<Value, RuntimeError> {
            Value::from_host(&self.types, ty, value)
        }

        fn execute_user_function(
            &self,
            _function: &Symbol,
            _enclosing: &MemorySpace,
            args: Vec<Value>,
        ) -> Result<Value, RuntimeError> {
            self.calls.borrow_mut().extend(args.iter().cloned());
            match args[0].to_host() {
                Some(HostValue::Int(n)) => Ok(Value::host(self.types.int_type(), HostValue::Int(n * 2))),
                _ => Err(RuntimeError::Interpreter {
                    message: "expected int".to_string(),
                }),
            }
        }
    }

    fn setup() -> (Rc<Doubler>, CallbackAdapterBuilder, FunctionType) {
        let mut types = TypeContext::new();
        let int = types.int_type();
        let fn_ty = types.function_type(vec![int], int);
        let function_type = types.get(fn_ty).unwrap().as_function().unwrap().clone();
        let interpreter = Rc::new(Doubler {
            types,
            calls: RefCell::new(Vec::new()),
        });
        let builder = CallbackAdapterBuilder::new(interpreter.clone());
        (interpreter, builder, function_type)
    }

    fn user(node: u32, ty: TypeId) -> Callable {
        Callable::User {
            node: NodeId(node),
            enclosing: Rc::new(MemorySpace::new(ty)),
        }
    }

    #[test]
    fn test_function_wrapper_returns_result() {
        let (interpreter, builder, function_type) = setup();
        let adapter = builder
            .build_adapter(&function_type, &user(1, function_type.ret()))
            .unwrap();
        let callback = builder.wrap(CallbackKind::Function, adapter).unwrap();

        assert_eq!(callback.invoke(vec![HostValue::Int(21)]).unwrap(), HostValue::Int(42));
        assert_eq!(interpreter.calls.borrow()[0].ty(), function_type.params()[0]);
    }

    #[test]
    fn test_consumer_wrapper_discards_result() {
        let (_, builder, function_type) = setup();
        let adapter = builder
            .build_adapter(&function_type, &user(1, function_type.ret()))
            .unwrap();
        let callback = builder.wrap(CallbackKind::Consumer, adapter).unwrap();
        assert_eq!(callback.invoke(vec![HostValue::Int(1)]).unwrap(), HostValue::None);
    }

    #[test]
    fn test_unresolved_function() {
        let (_, builder, function_type) = setup();
        let adapter = builder
            .build_adapter(&function_type, &user(9, function_type.ret()))
            .unwrap();
        assert_eq!(
            adapter.call(vec![HostValue::Int(1)]).unwrap_err(),
            RuntimeError::UnresolvedFunction { node: 9 }
        );
    }

    #[test]
    fn test_argument_count() {
        let (_, builder, function_type) = setup();
        let adapter = builder
            .build_adapter(&function_type, &user(1, function_type.ret()))
            .unwrap();
        assert!(matches!(
            adapter.call(Vec::new()),
            Err(RuntimeError::ArgumentCount { expected: 1, actual: 0, .. })
        ));
    }

    #[test]
    fn test_native_callable_rejected() {
        let (_, builder, function_type) = setup();
        let native = Callable::Native {
            name: "print".to_string(),
        };
        assert!(matches!(
            builder.build_adapter(&function_type, &native),
            Err(RuntimeError::UnsupportedCallable { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let (_, builder, function_type) = setup();
        let builder = builder.with_depth_limit(0);
        let adapter = builder
            .build_adapter(&function_type, &user(1, function_type.ret()))
            .unwrap();
        assert_eq!(
            adapter.call(vec![HostValue::Int(1)]).unwrap_err(),
            RuntimeError::DepthLimit { limit: 0 }
        );
    }

    #[test]
    fn test_removed_wrapper() {
        let (_, mut builder, function_type) = setup();
        assert!(builder.remove_wrapper(CallbackKind::Function));
        assert!(!builder.has_wrapper(CallbackKind::Function));
        let adapter = builder
            .build_adapter(&function_type, &user(1, function_type.ret()))
            .unwrap();
        assert!(builder.wrap(CallbackKind::Function, adapter).is_none());
    }
}
