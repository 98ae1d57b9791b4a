//! # strata-memory
//!
//! Pluggable allocators behind one small protocol.
//!
//! This crate provides:
//! - The [`Allocator`](allocator::Allocator) protocol: `Alloc`, `Free`,
//!   `Realloc` and `Empty`, callable through generics, `&dyn Allocator` or
//!   the [`Request`](allocator::Request)/[`dispatch`](allocator::dispatch)
//!   entry point
//! - A LIFO [`StackAllocator`](allocator::StackAllocator) over a
//!   caller-owned buffer, with markers and RAII frames
//! - A [`SystemAllocator`](allocator::SystemAllocator) wrapping the host heap
//! - [`move_allocation`](allocator::move_allocation) to relocate a live block
//!   between allocators
//! - An optional [diagnostic channel](diagnostics) for recoverable misuse
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_memory::prelude::*;
//!
//! let mut buf = [0u8; 256];
//! let stack = StackAllocator::new(&mut buf)?;
//!
//! let a = stack.allocate(10)?;
//! let b = stack.allocate(20)?;
//!
//! // Only the most recent allocation can be released
//! assert!(unsafe { stack.release(a.cast(), 10) }.is_err());
//! unsafe { stack.release(b.cast(), 20) }?;
//! unsafe { stack.release(a.cast(), 10) }?;
//! assert_eq!(stack.used(), 0);
//! # Ok::<(), strata_memory::error::MemoryError>(())
//! ```
//!
//! ## Features
//!
//! - `system` (default): host heap wrapper
//! - `logging` (default): structured logging and a diagnostic sink via
//!   `tracing`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(unsafe_code)]
#![warn(rust_2018_idioms)]

// Error types
pub mod error;

pub mod allocator;
pub mod diagnostics;
pub mod utils;

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "system")]
    pub use crate::allocator::SystemAllocator;
    pub use crate::allocator::{
        AllocResult, Allocator, MemoryUsage, Operation, Request, Response, StackAllocator,
        StackConfig, StackFrame, StackMarker, TrackedAllocator, dispatch, move_allocation,
    };
    pub use crate::diagnostics::{DiagnosticSink, Diagnostics};
    pub use crate::error::{MemoryError, MemoryResult};
}
