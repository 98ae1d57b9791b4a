//! Standalone error types for strata-memory
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Every failure
//! in the allocator protocol is a value of [`MemoryError`]; nothing in this
//! crate panics or aborts on misuse.

use core::alloc::Layout;
use thiserror::Error;

use crate::allocator::Operation;

// ============================================================================
// Main Error Types
// ============================================================================

/// Memory management errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    // --- Stack Errors ---
    #[error("{operation} of {requested} bytes exceeds remaining capacity ({available} bytes)")]
    CapacityExhausted {
        operation: Operation,
        requested: usize,
        available: usize,
    },

    #[error("{operation} rejected: {address:#x} ({size} bytes) is not the top of the stack")]
    NotTopOfStack {
        operation: Operation,
        address: usize,
        size: usize,
    },

    #[error("Stack buffer of {size} bytes is too small (needs more than {required})")]
    BufferTooSmall { size: usize, required: usize },

    #[error("Marker at offset {position} is no longer valid (stack top at offset {top})")]
    InvalidMarker { position: usize, top: usize },

    // --- Protocol Errors ---
    #[error("{allocator} does not support {operation}")]
    Unsupported {
        allocator: &'static str,
        operation: Operation,
    },

    // --- Host Errors ---
    #[error("Host allocation failed: {size} bytes with {align} byte alignment")]
    HostAllocationFailed { size: usize, align: usize },

    // --- Configuration Errors ---
    #[error("Invalid alignment: {alignment} is not a positive power of two")]
    InvalidAlignment { alignment: usize },

    #[error("Invalid memory layout: {reason}")]
    InvalidLayout { reason: String },
}

impl MemoryError {
    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CapacityExhausted { .. } => "MEM:STACK:EXHAUSTED",
            Self::NotTopOfStack { .. } => "MEM:STACK:NOT_TOP",
            Self::BufferTooSmall { .. } => "MEM:STACK:BUFFER",
            Self::InvalidMarker { .. } => "MEM:STACK:MARKER",
            Self::Unsupported { .. } => "MEM:OP:UNSUPPORTED",
            Self::HostAllocationFailed { .. } => "MEM:HOST:FAILED",
            Self::InvalidAlignment { .. } => "MEM:CONFIG:ALIGN",
            Self::InvalidLayout { .. } => "MEM:ALLOC:LAYOUT",
        }
    }

    /// The protocol operation that failed, when the error came from one
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::CapacityExhausted { operation, .. }
            | Self::NotTopOfStack { operation, .. }
            | Self::Unsupported { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create capacity exhausted error
    pub fn capacity_exhausted(operation: Operation, requested: usize, available: usize) -> Self {
        Self::CapacityExhausted {
            operation,
            requested,
            available,
        }
    }

    /// Create non-top-of-stack error
    pub fn not_top_of_stack(operation: Operation, address: usize, size: usize) -> Self {
        Self::NotTopOfStack {
            operation,
            address,
            size,
        }
    }

    /// Create buffer too small error
    pub fn buffer_too_small(size: usize, required: usize) -> Self {
        Self::BufferTooSmall { size, required }
    }

    /// Create invalid marker error
    pub fn invalid_marker(position: usize, top: usize) -> Self {
        Self::InvalidMarker { position, top }
    }

    /// Create unsupported operation error
    pub fn unsupported(allocator: &'static str, operation: Operation) -> Self {
        Self::Unsupported {
            allocator,
            operation,
        }
    }

    /// Create host allocation failure from layout
    pub fn host_allocation_failed(layout: Layout) -> Self {
        Self::HostAllocationFailed {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Create invalid alignment error
    pub fn invalid_alignment(alignment: usize) -> Self {
        Self::InvalidAlignment { alignment }
    }

    /// Create invalid layout error
    pub fn invalid_layout(reason: &str) -> Self {
        Self::InvalidLayout {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a capacity exhausted error
    #[must_use]
    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(self, Self::CapacityExhausted { .. })
    }

    /// Check if this is a non-top-of-stack rejection
    #[must_use]
    pub fn is_not_top_of_stack(&self) -> bool {
        matches!(self, Self::NotTopOfStack { .. })
    }

    /// Check if this is an unsupported operation error
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for memory operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

/// Generic result type alias
pub type Result<T> = MemoryResult<T>;

/// Type aliases for allocator call sites
pub type AllocError = MemoryError;
pub type AllocResult<T> = MemoryResult<T>;

// ============================================================================
// Tests
// ============================================================================
