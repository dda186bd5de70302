//! Sinks for advisory configuration diagnostics.
//!
//! Diagnostics never fail construction. They are emitted once per offending
//! [`crate::Helmet::with_diagnostics`] call, never per request.

use std::sync::Mutex;

/// Receives deprecation warnings produced while composing the middleware.
pub trait DiagnosticsSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Process-wide default sink, forwarding to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "helmet", "{message}");
    }
}

/// Sink that keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn warn(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
