//! Integration tests: viewport ↔ canvas projection round-trips.

use bw_core::view::CanvasView;
use kurbo::{Point, Vec2};

const TOLERANCE: f64 = 1e-9;

fn assert_close(a: Point, b: Point, context: &str) {
    assert!(
        (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE,
        "{context}: {a:?} != {b:?}"
    );
}

#[test]
fn roundtrip_over_pan_zoom_grid() {
    let pans = [Vec2::ZERO, Vec2::new(50.0, -30.0)];
    let zooms = [1.0, 2.0, 0.5];
    let points = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(-37.5, 412.0),
    ];

    for pan in pans {
        for zoom in zooms {
            let view = CanvasView::new(pan, zoom);
            for p in points {
                let there_and_back = view.to_viewport(view.to_canvas(p));
                assert_close(there_and_back, p, &format!("pan {pan:?}, zoom {zoom}"));
            }
        }
    }
}

#[test]
fn degenerate_view_is_bounding_rect_subtraction() {
    // With zoom 1 and no pan, the projection collapses to subtracting the
    // canvas element's page offset.
    let view = CanvasView::with_origin(Point::new(320.0, 64.0), Vec2::ZERO, 1.0);
    let p = view.to_canvas(Point::new(420.0, 164.0));
    assert_close(p, Point::new(100.0, 100.0), "degenerate view");
}

#[test]
fn zoomed_out_view_expands_coordinates() {
    // Zoom 0.5 means one viewport pixel covers two canvas units.
    let view = CanvasView::new(Vec2::ZERO, 0.5);
    let p = view.to_canvas(Point::new(100.0, 50.0));
    assert_close(p, Point::new(200.0, 100.0), "zoom 0.5");
}
