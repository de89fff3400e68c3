//! Drag gesture events forwarded by the rendering host.
//!
//! The host owns the actual windowing/DOM drag machinery; this layer only
//! sees the normalized gesture, carrying the raw block-kind token the
//! palette wrote into the drag payload.

use bw_core::Point;

/// One event in a palette drag-and-drop gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// A palette item started dragging; carries the raw kind token.
    Start { payload: String },

    /// The dragged item is over the canvas. Nothing mutates until release.
    Over { x: f64, y: f64 },

    /// The item was released over the canvas at a viewport position.
    /// `payload` is `None` when the drag carried no token at all (a drop
    /// that originated outside the palette).
    Drop {
        payload: Option<String>,
        x: f64,
        y: f64,
    },
}

impl DragEvent {
    /// Viewport position, when the event has one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Start { .. } => None,
            Self::Over { x, y } | Self::Drop { x, y, .. } => Some(Point::new(*x, *y)),
        }
    }
}
