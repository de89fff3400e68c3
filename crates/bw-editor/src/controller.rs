//! Drop controller: turns a palette drag gesture into diagram commands.
//!
//! Nothing mutates until the pointer is released — `Start` only arms the
//! recognized kind and `Over` never yields commands. A `Drop` resolves its
//! own payload (the authoritative token), projects the pointer through the
//! canvas view, allocates an id, and emits the node commit followed by the
//! audit record.

use crate::engine::DiagramCommand;
use crate::input::DragEvent;
use bw_core::Point;
use bw_core::id::IdAllocator;
use bw_core::model::{BlockKind, Node};
use bw_core::view::CanvasView;
use thiserror::Error;

/// The drop payload could not be resolved to a block kind. The gesture is
/// ignored: no id is consumed and no state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDropPayload {
    #[error("drop carried no payload")]
    Missing,
    #[error("unrecognized block kind token `{0}`")]
    Unrecognized(String),
}

/// Orchestrates drag-and-drop node creation. Owns the id allocator, so
/// every controller hands out its own `node_<n>` sequence.
#[derive(Debug, Default)]
pub struct DropController {
    allocator: IdAllocator,
    /// Kind armed by the in-flight gesture, if the palette token was
    /// recognized at drag start.
    armed: Option<BlockKind>,
}

impl DropController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-seeded allocator (custom prefix, resumed counter).
    pub fn with_allocator(allocator: IdAllocator) -> Self {
        Self {
            allocator,
            armed: None,
        }
    }

    /// Feed one gesture event. Only `Drop` ever yields commands.
    pub fn handle(&mut self, event: &DragEvent, view: &CanvasView) -> Vec<DiagramCommand> {
        match event {
            DragEvent::Start { payload } => {
                self.armed = BlockKind::from_token(payload);
                Vec::new()
            }
            DragEvent::Over { .. } => Vec::new(),
            DragEvent::Drop { payload, x, y } => {
                self.armed = None;
                match self.resolve_drop(payload.as_deref(), Point::new(*x, *y), view) {
                    Ok(commands) => commands,
                    Err(err) => {
                        log::debug!("ignoring drop: {err}");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Resolve a release into the node commit and its audit record.
    pub fn resolve_drop(
        &mut self,
        payload: Option<&str>,
        viewport: Point,
        view: &CanvasView,
    ) -> Result<Vec<DiagramCommand>, InvalidDropPayload> {
        let token = payload.ok_or(InvalidDropPayload::Missing)?;
        let kind = BlockKind::from_token(token)
            .ok_or_else(|| InvalidDropPayload::Unrecognized(token.to_string()))?;

        // Allocate only after the payload is known good, so ignored drops
        // don't burn ids.
        let position = view.to_canvas(viewport);
        let node = Node::new(self.allocator.next(), kind, position);
        log::trace!("drop resolved: {} ({}) at {:?}", node.id, node.label, node.position);

        Ok(vec![
            DiagramCommand::AddNode {
                node: Box::new(node),
            },
            DiagramCommand::RecordDrop {
                label: kind.label().to_string(),
            },
        ])
    }

    /// Kind armed by the in-flight gesture, if any.
    pub fn armed(&self) -> Option<BlockKind> {
        self.armed
    }
}
