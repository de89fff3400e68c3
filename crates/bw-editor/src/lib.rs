pub mod audit;
pub mod controller;
pub mod engine;
pub mod input;

pub use audit::AuditLog;
pub use controller::{DropController, InvalidDropPayload};
pub use engine::{DiagramCommand, DiagramEngine, EdgeChange, EngineError, NodeChange, Snapshot};
pub use input::DragEvent;
