//! Viewport ↔ canvas projection.
//!
//! Pointer positions arrive in viewport (page) pixels; node positions live
//! in canvas space, independent of how the canvas is panned or zoomed. The
//! mapping is `canvas = (viewport - origin - pan) / zoom`, with the
//! identity view (no origin, no pan, zoom 1) as the degenerate case.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Where the canvas sits on the page and how it is panned and zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasView {
    /// Top-left of the canvas element in page coordinates. Zero when the
    /// host already reports pointer positions relative to the canvas.
    pub origin: Point,
    /// Pan offset in viewport pixels.
    pub pan: Vec2,
    /// Zoom scale; 1.0 is unzoomed. Must be finite and nonzero.
    pub zoom: f64,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CanvasView {
    /// View for a canvas whose pointer positions are already
    /// canvas-relative.
    pub fn new(pan: Vec2, zoom: f64) -> Self {
        Self {
            origin: Point::ORIGIN,
            pan,
            zoom,
        }
    }

    pub fn with_origin(origin: Point, pan: Vec2, zoom: f64) -> Self {
        Self { origin, pan, zoom }
    }

    /// The canvas→viewport affine: scale by zoom, then translate by
    /// origin + pan.
    pub fn projection(&self) -> Affine {
        Affine::translate(self.origin.to_vec2() + self.pan) * Affine::scale(self.zoom)
    }

    /// Map a viewport-space pointer position into canvas space.
    pub fn to_canvas(&self, viewport: Point) -> Point {
        self.projection().inverse() * viewport
    }

    /// Map a canvas-space position back to viewport space.
    pub fn to_viewport(&self, canvas: Point) -> Point {
        self.projection() * canvas
    }
}
