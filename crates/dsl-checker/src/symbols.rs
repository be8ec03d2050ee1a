//! Symbol ↔ syntax node relations
//!
//! Records which node created a symbol and which nodes refer to it, so that
//! later passes (and the runtime) can get from a node back to its symbol.

use rustc_hash::FxHashMap;

use dsl_types::{Symbol, SymbolKey};

use crate::ast::NodeId;

/// Relation table between symbols and syntax nodes
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Symbol for each related node
    node_to_symbol: FxHashMap<NodeId, Symbol>,
    /// Related nodes per symbol, creation node first
    symbol_to_nodes: FxHashMap<SymbolKey, Vec<NodeId>>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Relate a symbol to a node
    ///
    /// The first node related to a symbol is its creation node.
    pub fn add_symbol_node_relation(&mut self, symbol: &Symbol, node: NodeId) {
        let nodes = self.symbol_to_nodes.entry(symbol.key()).or_default();
        if !nodes.contains(&node) {
            nodes.push(node);
        }
        self.node_to_symbol.insert(node, symbol.clone());
    }

    /// Symbol related to a node
    pub fn symbol_for_node(&self, node: NodeId) -> Option<&Symbol> {
        self.node_to_symbol.get(&node)
    }

    /// Node that created a symbol
    pub fn creation_node(&self, symbol: &SymbolKey) -> Option<NodeId> {
        self.symbol_to_nodes
            .get(symbol)
            .and_then(|nodes| nodes.first().copied())
    }

    /// Every node related to a symbol
    pub fn nodes_for(&self, symbol: &SymbolKey) -> &[NodeId] {
        self.symbol_to_nodes
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of related nodes
    pub fn len(&self) -> usize {
        self.node_to_symbol.len()
    }

    /// Check if no relation was recorded
    pub fn is_empty(&self) -> bool {
        self.node_to_symbol.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsl_types::{SymbolKind, TypeContext};

    #[test]
    fn test_relations() {
        let ctx = TypeContext::new();
        let symbol = Symbol::new("monster", SymbolKind::Type, ctx.int_type());
        let mut table = SymbolTable::new();

        table.add_symbol_node_relation(&symbol, NodeId(3));
        table.add_symbol_node_relation(&symbol, NodeId(7));
        table.add_symbol_node_relation(&symbol, NodeId(3));

        assert_eq!(table.creation_node(&symbol.key()), Some(NodeId(3)));
        assert_eq!(table.nodes_for(&symbol.key()), &[NodeId(3), NodeId(7)]);
        assert_eq!(table.symbol_for_node(NodeId(7)).map(|s| s.name.as_str()), Some("monster"));
        assert!(table.symbol_for_node(NodeId(1)).is_none());
    }
}
