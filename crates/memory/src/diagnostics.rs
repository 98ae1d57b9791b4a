//! Diagnostic channel for recoverable allocator misuse
//!
//! Backends report capacity exhaustion, non-top-of-stack access and
//! unsupported operations here. Reporting is observability only: a sink
//! never changes what an allocator returns.
//!
//! ```
//! use std::sync::Arc;
//! use strata_memory::allocator::{Allocator, StackAllocator, StackConfig};
//! use strata_memory::diagnostics::{DiagnosticKind, Diagnostics, RecordingSink};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let config = StackConfig {
//!     diagnostics: Diagnostics::new(sink.clone()),
//!     ..StackConfig::default()
//! };
//!
//! let mut buf = [0u8; 32];
//! let stack = StackAllocator::with_config(&mut buf, config).unwrap();
//! assert!(stack.allocate(4096).is_err());
//! assert_eq!(sink.kinds(), vec![DiagnosticKind::CapacityExhausted]);
//! ```

use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::allocator::Operation;
use crate::error::MemoryError;

/// Category of a reported misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An allocation or resize did not fit in the remaining capacity
    CapacityExhausted,
    /// Free or resize targeted a pointer that is not the top of the stack
    NotTopOfStack,
    /// The backend does not implement the requested operation
    Unsupported,
}

impl DiagnosticKind {
    fn of(error: &MemoryError) -> Option<Self> {
        match error {
            MemoryError::CapacityExhausted { .. } => Some(Self::CapacityExhausted),
            MemoryError::NotTopOfStack { .. } => Some(Self::NotTopOfStack),
            MemoryError::Unsupported { .. } => Some(Self::Unsupported),
            _ => None,
        }
    }

    /// Short label used in log fields
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CapacityExhausted => "capacity_exhausted",
            Self::NotTopOfStack => "not_top_of_stack",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported misuse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the reporting backend
    pub allocator: &'static str,
    /// Operation that was rejected
    pub operation: Operation,
    /// Category of the misuse
    pub kind: DiagnosticKind,
    /// Human-readable context
    pub message: String,
}

impl Diagnostic {
    /// Builds a diagnostic for errors the channel reports, `None` otherwise
    pub fn from_error(allocator: &'static str, error: &MemoryError) -> Option<Self> {
        let kind = DiagnosticKind::of(error)?;
        let operation = error.operation()?;
        Some(Self {
            allocator,
            operation,
            kind,
            message: error.to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.allocator, self.kind, self.message)
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Called once per reported misuse
    fn report(&self, diagnostic: &Diagnostic);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Sink that forwards diagnostics to `tracing` as warnings
#[cfg(feature = "logging")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "logging")]
impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            allocator = diagnostic.allocator,
            operation = %diagnostic.operation,
            kind = diagnostic.kind.as_str(),
            "{}",
            diagnostic.message
        );
    }
}

/// Sink that keeps every diagnostic for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Creates an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Kinds reported so far, in order
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.records.lock().iter().map(|d| d.kind).collect()
    }

    /// Number of diagnostics reported so far
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// True if nothing was reported
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drops every recorded diagnostic
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.records.lock().push(diagnostic.clone());
    }
}

/// Per-instance handle to a diagnostic sink
///
/// The default handle has no sink attached and reports nothing.
#[derive(Clone, Default)]
pub struct Diagnostics {
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Diagnostics {
    /// Attaches a sink
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Handle that reports nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Handle forwarding to `tracing`
    #[cfg(feature = "logging")]
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// True if a sink is attached
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Reports `error` if it belongs to a reported category
    pub fn emit(&self, allocator: &'static str, error: &MemoryError) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Some(diagnostic) = Diagnostic::from_error(allocator, error) {
            sink.report(&diagnostic);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
