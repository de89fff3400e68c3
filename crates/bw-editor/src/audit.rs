//! Append-only trail of dropped block labels.

use serde::Serialize;

/// Ordered record of every successful drop, for side-panel display.
/// Entries are never reordered, deduplicated, or truncated, and the trail
/// has no influence on any editor decision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditLog {
    entries: Vec<String>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one label. Insertion order is drop order.
    pub fn record(&mut self, label: impl Into<String>) {
        self.entries.push(label.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
