//! Type binding for prototype definitions
//!
//! The binder walks a program and turns every prototype definition into an
//! aggregate type whose members are the referenced component types. Errors do
//! not stop binding: they are collected and the rest of the program is bound.

use log::{debug, trace};

use dsl_types::{AggregateType, Scope, ScopeRef, Symbol, SymbolKind, Type, TypeContext};

use crate::ast::*;
use crate::error::BindError;
use crate::symbols::SymbolTable;

/// Result of binding a program
#[derive(Debug, Default)]
pub struct BindOutcome {
    /// Symbol↔node relations of everything that bound
    pub symbols: SymbolTable,
    /// Errors in source order
    pub errors: Vec<BindError>,
}

impl BindOutcome {
    /// Check if binding produced no errors
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Symbol table if binding produced no errors
    pub fn into_result(self) -> Result<SymbolTable, Vec<BindError>> {
        if self.errors.is_empty() {
            Ok(self.symbols)
        } else {
            Err(self.errors)
        }
    }
}

/// Binder from prototype definitions to aggregate types
pub struct TypeBinder<'a> {
    symbols: SymbolTable,
    errors: Vec<BindError>,
    type_ctx: &'a mut TypeContext,
}

impl<'a> TypeBinder<'a> {
    /// Create a new binder
    pub fn new(type_ctx: &'a mut TypeContext) -> Self {
        Self::with_symbols(type_ctx, SymbolTable::new())
    }

    /// Create a binder that adds to an existing symbol table
    pub fn with_symbols(type_ctx: &'a mut TypeContext, symbols: SymbolTable) -> Self {
        TypeBinder {
            symbols,
            errors: Vec::new(),
            type_ctx,
        }
    }

    /// Bind a program (entry point)
    pub fn bind_program(mut self, program: &Program) -> BindOutcome {
        program.accept(&mut self);
        debug!(
            "Bound {} definitions with {} errors",
            program.definitions.len(),
            self.errors.len()
        );
        BindOutcome {
            symbols: self.symbols,
            errors: self.errors,
        }
    }

    fn bind_prototype(&mut self, prototype: &PrototypeDefinition) {
        let name = &prototype.name.name;
        if self.type_ctx.resolve_global(name).is_some() {
            self.errors.push(BindError::DuplicateDefinition {
                name: name.clone(),
                span: prototype.name.span,
            });
            return;
        }

        let mut members = Scope::new();
        let mut bound = Vec::with_capacity(prototype.components.len());
        for component in &prototype.components {
            let Some(member) = self.resolve_component(name, &members, component) else {
                continue;
            };
            trace!("{}: component {}", name, member.name);
            // Names were checked against the scope above
            if members.bind(member.clone()).is_ok() {
                bound.push((member, component.id));
            }
        }

        let ty = Type::Aggregate(AggregateType::new(name.clone(), None, members));
        let id = match self.type_ctx.add_type(ty) {
            Ok(id) => id,
            Err(source) => {
                self.errors.push(BindError::Registration {
                    name: name.clone(),
                    source,
                    span: prototype.span,
                });
                return;
            }
        };

        if let Some(symbol) = self.type_ctx.resolve_global(name) {
            self.symbols.add_symbol_node_relation(symbol, prototype.id);
        }
        for (mut member, node) in bound {
            member.scope = ScopeRef::Type(id);
            self.symbols.add_symbol_node_relation(&member, node);
        }
        debug!("Bound prototype {}", name);
    }

    /// Member symbol for one component reference, or `None` after recording an error
    fn resolve_component(
        &mut self,
        prototype: &str,
        members: &Scope,
        component: &ComponentDefinition,
    ) -> Option<Symbol> {
        let reference = &component.type_name;
        let ty = match self.type_ctx.resolve_global(&reference.name) {
            None => {
                self.errors.push(BindError::UnresolvedType {
                    name: reference.name.clone(),
                    span: reference.span,
                });
                return None;
            }
            Some(symbol) if !symbol.is_type() => {
                self.errors.push(BindError::NotAType {
                    name: reference.name.clone(),
                    span: reference.span,
                });
                return None;
            }
            Some(symbol) => symbol.ty,
        };

        if members.contains(&reference.name) {
            self.errors.push(BindError::DuplicateComponent {
                prototype: prototype.to_string(),
                name: reference.name.clone(),
                span: reference.span,
            });
            return None;
        }
        Some(Symbol::new(reference.name.clone(), SymbolKind::Member, ty))
    }
}

impl AstVisitor for TypeBinder<'_> {
    fn visit_program(&mut self, program: &Program) {
        for definition in &program.definitions {
            definition.accept(self);
        }
    }

    fn visit_prototype(&mut self, prototype: &PrototypeDefinition) {
        self.bind_prototype(prototype);
    }

    // Component references are bound as part of their prototype
    fn visit_component(&mut self, _component: &ComponentDefinition) {}

    fn visit_property(&mut self, _property: &PropertyDefinition) {}

    fn visit_object(&mut self, _object: &ObjectDefinition) {}

    fn visit_function(&mut self, _function: &FunctionDefinition) {}

    fn visit_expr(&mut self, _expr: &Expr) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsl_types::TypeKind;

    struct Ast {
        ids: NodeIds,
    }

    impl Ast {
        fn new() -> Self {
            Ast { ids: NodeIds::new() }
        }

        fn ident(&mut self, name: &str, start: u32) -> Ident {
            Ident {
                id: self.ids.fresh(),
                name: name.to_string(),
                span: Span::new(start, start + name.len() as u32),
            }
        }

        fn prototype(&mut self, name: &str, components: &[&str]) -> PrototypeDefinition {
            let name = self.ident(name, 0);
            let components = components
                .iter()
                .map(|c| ComponentDefinition {
                    id: self.ids.fresh(),
                    type_name: self.ident(c, 10),
                    properties: Vec::new(),
                })
                .collect();
            PrototypeDefinition {
                id: self.ids.fresh(),
                name,
                components,
                span: Span::new(0, 40),
            }
        }
    }

    #[test]
    fn test_bind_prototype_with_basic_components() {
        let mut ctx = TypeContext::new();
        let mut ast = Ast::new();
        let prototype = ast.prototype("monster", &["int", "string"]);
        let program = Program {
            definitions: vec![Definition::Prototype(prototype.clone())],
        };

        let outcome = TypeBinder::new(&mut ctx).bind_program(&program);
        assert!(outcome.is_ok());

        let id = ctx.lookup_type("monster").unwrap();
        let ty = ctx.get(id).unwrap();
        assert_eq!(ty.kind(), TypeKind::Aggregate);
        assert!(ty.origin().is_none());
        let names: Vec<_> = ty.members().unwrap().symbols().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["int", "string"]);

        let symbol = outcome.symbols.symbol_for_node(prototype.id).unwrap();
        assert_eq!(symbol.ty, id);
        let member = outcome
            .symbols
            .symbol_for_node(prototype.components[0].id)
            .unwrap();
        assert_eq!(member.scope, ScopeRef::Type(id));
        assert_eq!(member.ty, ctx.int_type());
    }

    #[test]
    fn test_unresolved_component_is_skipped() {
        let mut ctx = TypeContext::new();
        let mut ast = Ast::new();
        let program = Program {
            definitions: vec![Definition::Prototype(
                ast.prototype("monster", &["missing", "int"]),
            )],
        };

        let outcome = TypeBinder::new(&mut ctx).bind_program(&program);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(&outcome.errors[0], BindError::UnresolvedType { name, .. } if name == "missing"));

        let id = ctx.lookup_type("monster").unwrap();
        assert_eq!(ctx.get(id).unwrap().members().unwrap().len(), 1);
    }

    #[test]
    fn test_non_type_component() {
        let mut ctx = TypeContext::new();
        ctx.bind_global(Symbol::new("helper", SymbolKind::Function, ctx.none_type()))
            .unwrap();
        let mut ast = Ast::new();
        let program = Program {
            definitions: vec![Definition::Prototype(ast.prototype("monster", &["helper"]))],
        };

        let outcome = TypeBinder::new(&mut ctx).bind_program(&program);
        assert!(matches!(&outcome.errors[0], BindError::NotAType { name, .. } if name == "helper"));
    }

    #[test]
    fn test_duplicate_prototype_keeps_first() {
        let mut ctx = TypeContext::new();
        let mut ast = Ast::new();
        let program = Program {
            definitions: vec![
                Definition::Prototype(ast.prototype("monster", &["int"])),
                Definition::Prototype(ast.prototype("monster", &["string"])),
            ],
        };

        let outcome = TypeBinder::new(&mut ctx).bind_program(&program);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], BindError::DuplicateDefinition { .. }));

        let id = ctx.lookup_type("monster").unwrap();
        assert!(ctx.get(id).unwrap().members().unwrap().contains("int"));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_duplicate_component() {
        let mut ctx = TypeContext::new();
        let mut ast = Ast::new();
        let program = Program {
            definitions: vec![Definition::Prototype(ast.prototype("monster", &["int", "int"]))],
        };

        let outcome = TypeBinder::new(&mut ctx).bind_program(&program);
        assert!(matches!(outcome.errors[0], BindError::DuplicateComponent { .. }));
        let id = ctx.lookup_type("monster").unwrap();
        assert_eq!(ctx.get(id).unwrap().members().unwrap().len(), 1);
    }

    #[test]
    fn test_other_definitions_bind_nothing() {
        let mut ctx = TypeContext::new();
        let before = ctx.len();
        let mut ast = Ast::new();
        let function = FunctionDefinition {
            id: ast.ids.fresh(),
            name: ast.ident("on_hit", 0),
            params: Vec::new(),
            ret: None,
            body: Vec::new(),
        };
        let program = Program {
            definitions: vec![Definition::Function(function)],
        };

        let outcome = TypeBinder::new(&mut ctx).bind_program(&program);
        assert!(outcome.is_ok());
        assert!(outcome.symbols.is_empty());
        assert_eq!(ctx.len(), before);
    }
}
