//! Diagram engine: the single mutable owner of the diagram state.
//!
//! All mutations — drop-controller commands, connect attempts, renderer
//! deltas — funnel through the engine in dispatch order. Every committed
//! batch bumps the revision and hands each subscriber a fresh snapshot;
//! readers only ever see point-in-time clones, never a half-applied
//! mutation.

use crate::audit::AuditLog;
use bw_core::Point;
use bw_core::id::{EdgeId, NodeId};
use bw_core::model::{Diagram, DuplicateId, Edge, EdgeInsert, EdgeStyle, Node};
use bw_core::policy::{ConnectionRejected, ProducerConsumer, WiringPolicy};
use serde::Serialize;
use thiserror::Error;

/// A mutation produced by the drop controller or routed in by the host.
#[derive(Debug, Clone)]
pub enum DiagramCommand {
    /// Commit a freshly built node.
    AddNode { node: Box<Node> },
    /// Attempt a wire between two committed nodes.
    Connect {
        source: NodeId,
        target: NodeId,
        style: EdgeStyle,
    },
    /// Append a dropped-block label to the audit trail.
    RecordDrop { label: String },
}

/// Incremental node deltas in the renderer's format. Unknown ids are
/// skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// Drag-move to an absolute canvas position.
    Moved { id: NodeId, position: Point },
    Selected { id: NodeId, selected: bool },
    /// Removes the node and every incident wire in the same batch.
    Removed { id: NodeId },
}

/// Incremental edge deltas in the renderer's format.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeChange {
    Selected { id: EdgeId, selected: bool },
    Removed { id: EdgeId },
}

/// A consistent point-in-time copy of the diagram.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Increases by one per committed mutation batch.
    pub rev: u64,
}

/// Why a command failed to apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    DuplicateId(#[from] DuplicateId),
    #[error(transparent)]
    Rejected(#[from] ConnectionRejected),
}

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// Owns the diagram, the wiring policy, the audit trail, and the
/// subscriber list.
pub struct DiagramEngine {
    diagram: Diagram,
    policy: Box<dyn WiringPolicy>,
    audit: AuditLog,
    subscribers: Vec<Subscriber>,
    rev: u64,
}

impl Default for DiagramEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramEngine {
    /// Engine with the shipped producer→consumer wiring rule.
    pub fn new() -> Self {
        Self::with_policy(Box::new(ProducerConsumer))
    }

    pub fn with_policy(policy: Box<dyn WiringPolicy>) -> Self {
        Self {
            diagram: Diagram::new(),
            policy,
            audit: AuditLog::new(),
            subscribers: Vec::new(),
            rev: 0,
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Apply a single command.
    pub fn apply(&mut self, command: DiagramCommand) -> Result<(), EngineError> {
        match command {
            DiagramCommand::AddNode { node } => {
                self.add_node(*node)?;
            }
            DiagramCommand::Connect {
                source,
                target,
                style,
            } => {
                self.connect(source, target, style)?;
            }
            DiagramCommand::RecordDrop { label } => {
                self.audit.record(label);
            }
        }
        Ok(())
    }

    /// Apply commands in dispatch order, stopping at the first failure.
    /// Earlier commits stay in place.
    pub fn apply_all(&mut self, commands: Vec<DiagramCommand>) -> Result<(), EngineError> {
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }

    /// Commit a node. `DuplicateId` means a broken allocator; the insert is
    /// refused atomically and the diagram is left exactly as it was.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, DuplicateId> {
        let id = node.id;
        self.diagram.insert_node(node)?;
        log::debug!("node {id} committed");
        self.notify();
        Ok(id)
    }

    /// Attempt a wire. Missing endpoints and policy refusals reject without
    /// mutating; an exact duplicate returns the existing id and notifies
    /// nobody.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        style: EdgeStyle,
    ) -> Result<EdgeId, ConnectionRejected> {
        let (src, tgt) = match (self.diagram.node(source), self.diagram.node(target)) {
            (Some(s), Some(t)) => (s, t),
            (None, _) => return Err(ConnectionRejected::UnknownEndpoint(source)),
            (_, None) => return Err(ConnectionRejected::UnknownEndpoint(target)),
        };
        if let Err(rejected) = self.policy.check(src, tgt) {
            log::debug!("wire {source} -> {target} refused: {rejected}");
            return Err(rejected);
        }

        // Endpoints were just resolved, so insert_edge cannot see an
        // unknown endpoint; map that arm anyway rather than panic.
        match self.diagram.insert_edge(Edge::between(source, target, style)) {
            Ok(EdgeInsert::Inserted(id)) => {
                log::debug!("wire {id} committed");
                self.notify();
                Ok(id)
            }
            Ok(EdgeInsert::Duplicate(id)) => {
                log::trace!("wire {id} already present");
                Ok(id)
            }
            Err(missing) => Err(ConnectionRejected::UnknownEndpoint(missing.0)),
        }
    }

    // ─── Renderer deltas ─────────────────────────────────────────────────

    /// Apply a batch of node deltas. One notification per non-empty
    /// applied batch.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
        let mut touched = false;
        for change in changes {
            match change {
                NodeChange::Moved { id, position } => {
                    if let Some(node) = self.diagram.node_mut(*id) {
                        node.position = *position;
                        touched = true;
                    }
                }
                NodeChange::Selected { id, selected } => {
                    if let Some(node) = self.diagram.node_mut(*id) {
                        node.selected = *selected;
                        touched = true;
                    }
                }
                NodeChange::Removed { id } => {
                    if self.diagram.remove_node(*id).is_some() {
                        log::debug!("node {id} removed with incident wires");
                        touched = true;
                    }
                }
            }
        }
        if touched {
            self.notify();
        }
    }

    /// Apply a batch of edge deltas.
    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
        let mut touched = false;
        for change in changes {
            match change {
                EdgeChange::Selected { id, selected } => {
                    if let Some(edge) = self.diagram.edge_mut(*id) {
                        edge.selected = *selected;
                        touched = true;
                    }
                }
                EdgeChange::Removed { id } => {
                    if self.diagram.remove_edge(*id).is_some() {
                        touched = true;
                    }
                }
            }
        }
        if touched {
            self.notify();
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// Point-in-time copy of the node and edge sets.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.diagram.nodes().cloned().collect(),
            edges: self.diagram.edges().cloned().collect(),
            rev: self.rev,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Register for a snapshot after every committed mutation batch.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self) {
        self.rev += 1;
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for subscriber in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }
}
