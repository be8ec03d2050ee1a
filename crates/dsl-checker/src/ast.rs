//! Syntax tree of the definitions the binder works on
//!
//! Only the node kinds that reach the binder are modelled. Every node carries
//! a [`NodeId`] that symbol↔node relations refer to.

use serde::{Deserialize, Serialize};

/// Byte range in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a span
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Identity of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Hands out fresh node ids
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    /// Create a generator starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused id
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// Node id
    pub id: NodeId,
    /// Name
    pub name: String,
    /// Location
    pub span: Span,
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
    /// String literal
    String(String),
    /// Name reference
    Ident(String),
    /// Function call
    Call {
        /// Called function
        callee: Ident,
        /// Arguments
        args: Vec<Expr>,
    },
    /// Inline aggregate value: `type_name { prop: value, ... }`
    Aggregate {
        /// Aggregate type name
        type_name: Ident,
        /// Property assignments
        properties: Vec<PropertyDefinition>,
    },
    /// List literal
    List(Vec<Expr>),
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Node id
    pub id: NodeId,
    /// Expression kind
    pub kind: ExprKind,
    /// Location
    pub span: Span,
}

/// `name: value`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    /// Node id
    pub id: NodeId,
    /// Property name
    pub name: Ident,
    /// Assigned value
    pub value: Expr,
}

/// Component reference inside a prototype: `type_name { properties }`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    /// Node id
    pub id: NodeId,
    /// Referenced component type
    pub type_name: Ident,
    /// Default values
    pub properties: Vec<PropertyDefinition>,
}

/// `entity_type name { components }`
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeDefinition {
    /// Node id
    pub id: NodeId,
    /// Prototype name
    pub name: Ident,
    /// Component references
    pub components: Vec<ComponentDefinition>,
    /// Location
    pub span: Span,
}

/// `type_name name { properties }`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefinition {
    /// Node id
    pub id: NodeId,
    /// Object type
    pub type_name: Ident,
    /// Object name
    pub name: Ident,
    /// Property assignments
    pub properties: Vec<PropertyDefinition>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Ident,
    /// Declared type name
    pub type_name: Ident,
}

/// `fn name(params) -> ret { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// Node id
    pub id: NodeId,
    /// Function name
    pub name: Ident,
    /// Parameters
    pub params: Vec<Param>,
    /// Declared return type
    pub ret: Option<Ident>,
    /// Body statements
    pub body: Vec<Expr>,
}

/// Top-level definition
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// Entity prototype
    Prototype(PrototypeDefinition),
    /// Object definition
    Object(ObjectDefinition),
    /// Function definition
    Function(FunctionDefinition),
}

/// A parsed program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level definitions in source order
    pub definitions: Vec<Definition>,
}

/// Visitor over every node kind
///
/// There are no default methods: every implementor decides for each node
/// kind what, if anything, it does.
pub trait AstVisitor {
    /// Visit the program root
    fn visit_program(&mut self, program: &Program);
    /// Visit a prototype definition
    fn visit_prototype(&mut self, prototype: &PrototypeDefinition);
    /// Visit a component reference
    fn visit_component(&mut self, component: &ComponentDefinition);
    /// Visit a property definition
    fn visit_property(&mut self, property: &PropertyDefinition);
    /// Visit an object definition
    fn visit_object(&mut self, object: &ObjectDefinition);
    /// Visit a function definition
    fn visit_function(&mut self, function: &FunctionDefinition);
    /// Visit an expression
    fn visit_expr(&mut self, expr: &Expr);
}

impl Definition {
    /// Dispatch to the matching visitor method
    pub fn accept<V: AstVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Definition::Prototype(prototype) => visitor.visit_prototype(prototype),
            Definition::Object(object) => visitor.visit_object(object),
            Definition::Function(function) => visitor.visit_function(function),
        }
    }

    /// Node id of the definition
    pub fn id(&self) -> NodeId {
        match self {
            Definition::Prototype(prototype) => prototype.id,
            Definition::Object(object) => object.id,
            Definition::Function(function) => function.id,
        }
    }
}

impl Program {
    /// Dispatch to [`AstVisitor::visit_program`]
    pub fn accept<V: AstVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_program(self);
    }

    /// All prototype definitions
    pub fn prototypes(&self) -> impl Iterator<Item = &PrototypeDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Prototype(prototype) => Some(prototype),
            _ => None,
        })
    }
}
