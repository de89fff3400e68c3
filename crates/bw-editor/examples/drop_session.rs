//! Drives a complete drop-and-wire session against the engine and prints
//! the resulting snapshot as JSON.
//!
//! Run with `RUST_LOG=debug cargo run --example drop_session` to watch the
//! engine log each commit.

use bw_core::model::EdgeStyle;
use bw_core::view::CanvasView;
use bw_core::Vec2;
use bw_editor::{DiagramEngine, DragEvent, DropController};

fn main() {
    env_logger::init();

    // A canvas panned right and slightly up, zoomed in a notch.
    let view = CanvasView::new(Vec2::new(40.0, -12.5), 1.25);
    let mut engine = DiagramEngine::new();
    engine.subscribe(|snapshot| {
        log::info!(
            "rev {} — {} nodes, {} edges",
            snapshot.rev,
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
    });
    let mut controller = DropController::new();

    for (token, x, y) in [
        ("blockA", 320.0, 180.0),
        ("blockB", 540.0, 360.0),
        ("blockA", 260.0, 420.0),
    ] {
        let events = [
            DragEvent::Start {
                payload: token.to_string(),
            },
            DragEvent::Over { x, y },
            DragEvent::Drop {
                payload: Some(token.to_string()),
                x,
                y,
            },
        ];
        for event in &events {
            let commands = controller.handle(event, &view);
            engine.apply_all(commands).expect("drop commits");
        }
    }

    let snapshot = engine.snapshot();
    let first = snapshot.nodes[0].id;
    let second = snapshot.nodes[1].id;

    match engine.connect(first, second, EdgeStyle::Default) {
        Ok(id) => println!("wired {first} -> {second} as {id}"),
        Err(reason) => println!("refused {first} -> {second}: {reason}"),
    }
    // The reverse direction is refused by the producer→consumer rule.
    match engine.connect(second, first, EdgeStyle::Default) {
        Ok(id) => println!("wired {second} -> {first} as {id}"),
        Err(reason) => println!("refused {second} -> {first}: {reason}"),
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&engine.snapshot()).expect("snapshot serializes")
    );
    println!("dropped: {:?}", engine.audit().entries());
}
