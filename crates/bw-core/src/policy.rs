//! Wiring compatibility rules.
//!
//! A policy is a pure predicate over the two endpoint nodes — it never
//! looks at existing wires, so parallel wires and self-loops are the
//! diagram's concern, not the policy's. The trait seam lets a host swap in
//! a different rule without touching the store or the drop controller.

use crate::id::NodeId;
use crate::model::{BlockKind, Node};
use std::fmt;

/// Why a proposed connection was refused. Expected and recoverable; the
/// display string is what the host shows the user.
///
/// Hand-written `Display`/`Error` impls instead of `derive(thiserror::Error)`:
/// the `source` field below is a `BlockKind`, but thiserror unconditionally
/// treats any field named `source` as the error's `Error` source, which
/// `BlockKind` is not. The impls below reproduce exactly what the derive
/// would generate for the original `#[error(...)]` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRejected {
    IncompatibleKinds {
        source: BlockKind,
        target: BlockKind,
    },
    UnknownEndpoint(NodeId),
}

impl fmt::Display for ConnectionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRejected::IncompatibleKinds { .. } => f.write_str("incompatible kinds"),
            ConnectionRejected::UnknownEndpoint(endpoint) => {
                write!(f, "unknown endpoint {}", endpoint)
            }
        }
    }
}

impl std::error::Error for ConnectionRejected {}

pub trait WiringPolicy {
    /// Decide a proposed wire from `source` to `target`.
    fn check(&self, source: &Node, target: &Node) -> Result<(), ConnectionRejected>;

    fn allows(&self, source: &Node, target: &Node) -> bool {
        self.check(source, target).is_ok()
    }
}

/// The shipped rule: a directed producer→consumer constraint. Only a
/// `Block A` source may feed a `Block B` target; every other combination
/// is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProducerConsumer;

impl WiringPolicy for ProducerConsumer {
    fn check(&self, source: &Node, target: &Node) -> Result<(), ConnectionRejected> {
        if source.kind == BlockKind::A && target.kind == BlockKind::B {
            Ok(())
        } else {
            Err(ConnectionRejected::IncompatibleKinds {
                source: source.kind,
                target: target.kind,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use kurbo::Point;

    fn node(id: &str, kind: BlockKind) -> Node {
        Node::new(NodeId::intern(id), kind, Point::new(0.0, 0.0))
    }

    #[test]
    fn only_a_to_b_is_allowed() {
        let policy = ProducerConsumer;
        let cases = [
            (BlockKind::A, BlockKind::B, true),
            (BlockKind::A, BlockKind::A, false),
            (BlockKind::B, BlockKind::A, false),
            (BlockKind::B, BlockKind::B, false),
        ];
        for (source_kind, target_kind, expected) in cases {
            let source = node("s", source_kind);
            let target = node("t", target_kind);
            assert_eq!(
                policy.allows(&source, &target),
                expected,
                "{source_kind:?} -> {target_kind:?}"
            );
        }
    }

    #[test]
    fn self_loop_on_a_is_refused() {
        let policy = ProducerConsumer;
        let a = node("solo", BlockKind::A);
        assert!(!policy.allows(&a, &a));
    }

    #[test]
    fn rejection_reason_reads_incompatible_kinds() {
        let policy = ProducerConsumer;
        let err = policy
            .check(&node("s", BlockKind::B), &node("t", BlockKind::A))
            .unwrap_err();
        assert_eq!(err.to_string(), "incompatible kinds");
    }
}
