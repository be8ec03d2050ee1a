//! Symbols and scopes
//!
//! A scope is an ordered name → symbol map. The global scope lives in the
//! [`TypeContext`](crate::TypeContext); aggregate and adapter types own the
//! scope holding their members.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ty::TypeId;

/// Symbol kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Named type bound in the global scope
    Type,
    /// Data or callback member of an aggregate type
    Member,
    /// Extension property of an aggregate type
    Property,
    /// Extension method of an aggregate type
    Method,
    /// Parameter of an adapter builder method
    Parameter,
    /// User-defined DSL function
    Function,
    /// Built-in function implemented by the runtime
    NativeFunction,
    /// Variable or object definition
    Variable,
}

/// Scope a symbol was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    /// The global scope
    Global,
    /// Member scope of a type
    Type(TypeId),
    /// Scope of a type that has not been registered yet
    Pending,
}

/// Symbol information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name
    pub name: String,
    /// Symbol kind
    pub kind: SymbolKind,
    /// Data type of the symbol (the type itself for [`SymbolKind::Type`])
    pub ty: TypeId,
    /// Scope where this symbol was defined
    pub scope: ScopeRef,
}

impl Symbol {
    /// Create a symbol; the scope is set when it is bound
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            scope: ScopeRef::Pending,
        }
    }

    /// Whether this symbol names a type
    pub fn is_type(&self) -> bool {
        self.kind == SymbolKind::Type
    }

    /// Identity of this symbol across scopes
    pub fn key(&self) -> SymbolKey {
        SymbolKey {
            scope: self.scope,
            name: self.name.clone(),
        }
    }
}

/// Identity of a symbol: declaring scope and name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    /// Declaring scope
    pub scope: ScopeRef,
    /// Symbol name
    pub name: String,
}

/// Error for duplicate symbol definitions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Duplicate symbol '{name}'")]
pub struct DuplicateSymbolError {
    /// Symbol name
    pub name: String,
}

/// Ordered symbol scope
#[derive(Debug, Clone, Default)]
pub struct Scope {
    symbols: Vec<Symbol>,
    index: FxHashMap<String, usize>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol
    ///
    /// Returns an error if a symbol with the same name already exists in this scope.
    pub fn bind(&mut self, symbol: Symbol) -> Result<(), DuplicateSymbolError> {
        if self.index.contains_key(&symbol.name) {
            return Err(DuplicateSymbolError { name: symbol.name });
        }
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Resolve a symbol by name
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    /// Check if a name is bound
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Symbols in binding order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Number of bound symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the scope is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub(crate) fn set_owner(&mut self, scope: ScopeRef) {
        for symbol in &mut self.symbols {
            symbol.scope = scope;
        }
    }
}
