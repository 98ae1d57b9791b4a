//!
//! Pluggable allocators
//! This module defines the allocator protocol and the backends that
//! implement it.

// Core allocator types
mod protocol;
mod stats;
#[cfg(feature = "system")]
mod system;
mod tracked;
mod transfer;
mod traits;

// Allocator implementations
pub mod stack;

// Re-exports for convenience
pub use crate::error::{AllocError, AllocResult};
pub use protocol::{Operation, Request, Response, allocate, dispatch, release, reset, resize};
pub use stack::{StackAllocator, StackConfig, StackFrame, StackMarker};
pub use stats::AllocatorStats;
#[cfg(feature = "system")]
pub use system::SystemAllocator;
pub use tracked::TrackedAllocator;
pub use transfer::move_allocation;
pub use traits::{Allocator, BasicMemoryUsage, MemoryUsage};
