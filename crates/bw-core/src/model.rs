//! Diagram data model: block kinds, nodes, wires, and the `Diagram`
//! container that owns them.
//!
//! Nodes are weights in a `StableDiGraph` and every wire between two blocks
//! is an edge weight on the same graph, so removing a node drops its
//! incident wires in one operation. Id→index maps give O(1) lookup by the
//! interned string ids the rendering host speaks.

use crate::id::{EdgeId, NodeId};
use kurbo::Point;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

// ─── Block kinds ─────────────────────────────────────────────────────────

/// The two palette block templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    A,
    B,
}

impl BlockKind {
    /// The raw token a palette drag payload transports.
    pub fn token(self) -> &'static str {
        match self {
            Self::A => "blockA",
            Self::B => "blockB",
        }
    }

    /// Display label derived from the kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "Block A",
            Self::B => "Block B",
        }
    }

    /// Resolve a raw drag payload token. Unknown tokens resolve to `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "blockA" => Some(Self::A),
            "blockB" => Some(Self::B),
            _ => None,
        }
    }
}

// ─── Edge style ──────────────────────────────────────────────────────────

/// Visual variant of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeStyle {
    #[default]
    Default,
    Emphasized,
}

impl EdgeStyle {
    fn token(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Emphasized => "emphasized",
        }
    }
}

// ─── Nodes & wires ───────────────────────────────────────────────────────

/// A placed block instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, immutable once assigned.
    pub id: NodeId,
    pub kind: BlockKind,
    /// Canvas-space position, independent of viewport pan/zoom.
    pub position: Point,
    /// Derived from the kind at creation.
    pub label: String,
    /// Renderer-driven selection flag.
    pub selected: bool,
}

impl Node {
    pub fn new(id: NodeId, kind: BlockKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            label: kind.label().to_string(),
            selected: false,
        }
    }
}

/// A directed wire between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub style: EdgeStyle,
    /// Renderer-driven selection flag.
    pub selected: bool,
}

impl Edge {
    /// Build a wire with its id derived from (source, target, style), so
    /// duplicate submissions of the same wire share an id.
    pub fn between(source: NodeId, target: NodeId, style: EdgeStyle) -> Self {
        let id = EdgeId::intern(&format!(
            "{}-{}.{}",
            source.as_str(),
            target.as_str(),
            style.token()
        ));
        Self {
            id,
            source,
            target,
            style,
            selected: false,
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────

/// An insert collided with a node id already present. Ids come from a
/// monotonically increasing allocator, so this indicates allocator or
/// caller misuse rather than anything a user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate node id {0}")]
pub struct DuplicateId(pub NodeId);

/// An edge referenced a node the diagram does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown endpoint {0}")]
pub struct UnknownEndpoint(pub NodeId);

/// Outcome of inserting an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Inserted(EdgeId),
    /// A wire with the same (source, target, style) already exists;
    /// nothing was mutated.
    Duplicate(EdgeId),
}

impl EdgeInsert {
    pub fn id(self) -> EdgeId {
        match self {
            Self::Inserted(id) | Self::Duplicate(id) => id,
        }
    }
}

// ─── Diagram ─────────────────────────────────────────────────────────────

/// The authoritative node and edge sets.
///
/// Structural rules only — which wires are *compatible* is the wiring
/// policy's business, not the container's. Every mutation here is atomic:
/// a failed insert leaves the diagram untouched, and removing a node takes
/// its incident wires with it in the same call.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    graph: StableDiGraph<Node, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. The diagram is untouched on a duplicate id.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeIndex, DuplicateId> {
        if self.node_index.contains_key(&node.id) {
            return Err(DuplicateId(node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(idx)
    }

    /// Insert a wire, collapsing exact duplicates. Both endpoints must be
    /// present.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<EdgeInsert, UnknownEndpoint> {
        let source = self
            .index_of(edge.source)
            .ok_or(UnknownEndpoint(edge.source))?;
        let target = self
            .index_of(edge.target)
            .ok_or(UnknownEndpoint(edge.target))?;

        if let Some(existing) = self.wire_between(edge.source, edge.target, edge.style) {
            return Ok(EdgeInsert::Duplicate(existing));
        }

        let id = edge.id;
        let idx = self.graph.add_edge(source, target, edge);
        self.edge_index.insert(id, idx);
        Ok(EdgeInsert::Inserted(id))
    }

    /// Remove a node together with every incident wire.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.node_index.remove(&id)?;
        // The incident edge weights disappear with the node; drop their
        // index entries first. A self-loop shows up in both directions,
        // which is harmless here.
        let incident: SmallVec<[EdgeId; 4]> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        log::trace!("removing node {id} with {} incident wires", incident.len());
        for edge_id in incident {
            self.edge_index.remove(&edge_id);
        }
        self.graph.remove_node(idx)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let idx = self.edge_index.remove(&id)?;
        self.graph.remove_edge(idx)
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Look up a node mutably by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index
            .get(&id)
            .and_then(|idx| self.graph.edge_weight(*idx))
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edge_index
            .get(&id)
            .copied()
            .and_then(|idx| self.graph.edge_weight_mut(idx))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Find an existing wire with the same endpoints and style.
    pub fn wire_between(&self, source: NodeId, target: NodeId, style: EdgeStyle) -> Option<EdgeId> {
        let source = self.index_of(source)?;
        let target = self.index_of(target)?;
        self.graph
            .edges_connecting(source, target)
            .find(|e| e.weight().style == style)
            .map(|e| e.weight().id)
    }

    fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str, kind: BlockKind) -> Node {
        Node::new(NodeId::intern(id), kind, Point::new(0.0, 0.0))
    }

    #[test]
    fn label_is_derived_from_kind() {
        let n = node("n1", BlockKind::A);
        assert_eq!(n.label, "Block A");
        assert_eq!(node("n2", BlockKind::B).label, "Block B");
    }

    #[test]
    fn token_roundtrip() {
        assert_eq!(BlockKind::from_token("blockA"), Some(BlockKind::A));
        assert_eq!(BlockKind::from_token("blockB"), Some(BlockKind::B));
        assert_eq!(BlockKind::from_token("blockC"), None);
        assert_eq!(BlockKind::from_token(""), None);
        assert_eq!(BlockKind::from_token(BlockKind::A.token()), Some(BlockKind::A));
    }

    #[test]
    fn duplicate_node_id_is_rejected_atomically() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("n1", BlockKind::A)).unwrap();

        let result = diagram.insert_node(node("n1", BlockKind::B));
        assert_eq!(result, Err(DuplicateId(NodeId::intern("n1"))));
        assert_eq!(diagram.node_count(), 1);
        // The original node is intact.
        assert_eq!(diagram.node(NodeId::intern("n1")).unwrap().kind, BlockKind::A);
    }

    #[test]
    fn edge_requires_both_endpoints() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("n1", BlockKind::A)).unwrap();

        let missing = NodeId::intern("ghost");
        let result = diagram.insert_edge(Edge::between(
            NodeId::intern("n1"),
            missing,
            EdgeStyle::Default,
        ));
        assert_eq!(result, Err(UnknownEndpoint(missing)));
        assert_eq!(diagram.edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_collapses_to_existing() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("n1", BlockKind::A)).unwrap();
        diagram.insert_node(node("n2", BlockKind::B)).unwrap();

        let a = NodeId::intern("n1");
        let b = NodeId::intern("n2");
        let first = diagram
            .insert_edge(Edge::between(a, b, EdgeStyle::Default))
            .unwrap();
        let second = diagram
            .insert_edge(Edge::between(a, b, EdgeStyle::Default))
            .unwrap();

        assert!(matches!(first, EdgeInsert::Inserted(_)));
        assert_eq!(second, EdgeInsert::Duplicate(first.id()));
        assert_eq!(diagram.edge_count(), 1);
    }

    #[test]
    fn same_pair_different_style_is_a_distinct_wire() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("n1", BlockKind::A)).unwrap();
        diagram.insert_node(node("n2", BlockKind::B)).unwrap();

        let a = NodeId::intern("n1");
        let b = NodeId::intern("n2");
        diagram
            .insert_edge(Edge::between(a, b, EdgeStyle::Default))
            .unwrap();
        let emphasized = diagram
            .insert_edge(Edge::between(a, b, EdgeStyle::Emphasized))
            .unwrap();

        assert!(matches!(emphasized, EdgeInsert::Inserted(_)));
        assert_eq!(diagram.edge_count(), 2);
    }

    #[test]
    fn removing_a_node_removes_incident_wires() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("a1", BlockKind::A)).unwrap();
        diagram.insert_node(node("b1", BlockKind::B)).unwrap();
        diagram.insert_node(node("a2", BlockKind::A)).unwrap();

        let a1 = NodeId::intern("a1");
        let b1 = NodeId::intern("b1");
        let a2 = NodeId::intern("a2");
        let kept = diagram
            .insert_edge(Edge::between(a1, b1, EdgeStyle::Default))
            .unwrap()
            .id();
        diagram
            .insert_edge(Edge::between(a2, b1, EdgeStyle::Default))
            .unwrap();

        let removed = diagram.remove_node(a2);
        assert!(removed.is_some());
        assert_eq!(diagram.node_count(), 2);
        assert_eq!(diagram.edge_count(), 1);
        assert!(diagram.edge(kept).is_some());

        // No dangling endpoints survive the cascade.
        for edge in diagram.edges() {
            assert!(diagram.contains_node(edge.source));
            assert!(diagram.contains_node(edge.target));
        }
    }

    #[test]
    fn remove_unknown_node_is_a_noop() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("n1", BlockKind::A)).unwrap();
        assert!(diagram.remove_node(NodeId::intern("ghost")).is_none());
        assert_eq!(diagram.node_count(), 1);
    }

    #[test]
    fn node_and_edge_serde_roundtrip() {
        let n = Node::new(
            NodeId::intern("node_3"),
            BlockKind::B,
            Point::new(12.5, -4.0),
        );
        let json = serde_json::to_string(&n).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);

        let e = Edge::between(
            NodeId::intern("node_3"),
            NodeId::intern("node_4"),
            EdgeStyle::Emphasized,
        );
        let json = serde_json::to_string(&e).unwrap();
        let back: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn remove_edge_keeps_endpoints() {
        let mut diagram = Diagram::new();
        diagram.insert_node(node("n1", BlockKind::A)).unwrap();
        diagram.insert_node(node("n2", BlockKind::B)).unwrap();
        let id = diagram
            .insert_edge(Edge::between(
                NodeId::intern("n1"),
                NodeId::intern("n2"),
                EdgeStyle::Default,
            ))
            .unwrap()
            .id();

        let removed = diagram.remove_edge(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(diagram.edge_count(), 0);
        assert_eq!(diagram.node_count(), 2);
    }
}
