//! A stack allocator for LIFO (Last In, First Out) memory management
//! over a caller-supplied buffer.
//!
//! ## Modules
//! - `allocator` - Main `StackAllocator` implementation with LIFO semantics
//! - `config` - Alignment, fill patterns and diagnostics per instance
//! - `frame` - RAII helper for automatic stack restoration
//! - `marker` - Position markers for scoped deallocation
pub mod allocator;
pub mod config;
pub mod frame;
pub mod marker;
pub use allocator::StackAllocator;
pub use config::StackConfig;
pub use frame::StackFrame;
pub use marker::StackMarker;
