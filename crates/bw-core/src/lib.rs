pub mod id;
pub mod model;
pub mod policy;
pub mod view;

pub use id::{EdgeId, IdAllocator, NodeId};
pub use model::*;
pub use policy::{ConnectionRejected, ProducerConsumer, WiringPolicy};
pub use view::CanvasView;

// Re-export kurbo's point types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Vec2};
