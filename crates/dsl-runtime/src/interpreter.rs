//! Re-entry into the DSL interpreter

use dsl_checker::NodeId;
use dsl_types::{HostValue, Symbol, TypeId};

use crate::error::RuntimeError;
use crate::value::{MemorySpace, Value};

/// The parts of the DSL interpreter that host callbacks re-enter
///
/// All methods take `&self` so that a DSL function may trigger host code
/// that calls back into the interpreter while it is still executing.
pub trait Interpreter {
    /// Function symbol created by a defining node
    fn function_symbol(&self, node: NodeId) -> Option<Symbol>;

    /// DSL value of type `ty` for a host value, as seen from `enclosing`
    fn translate_host_value(
        &self,
        value: HostValue,
        ty: TypeId,
        enclosing: &MemorySpace,
    ) -> Result<Value, RuntimeError>;

    /// Execute a user-defined function with concrete parameter values
    fn execute_user_function(
        &self,
        function: &Symbol,
        enclosing: &MemorySpace,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}
