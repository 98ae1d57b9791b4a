//! System allocator implementation
//!
//! Adapts the host heap (`std::alloc::System`) to the allocator protocol.
//! The wrapper holds no allocation state; each allocation is owned by the
//! host. It cannot empty itself: `reset` is always rejected.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};
use std::alloc::System;

use super::{AllocError, AllocResult, Allocator, MemoryUsage, Operation};
use crate::diagnostics::Diagnostics;
use crate::utils::{DEFAULT_ALIGNMENT, validate_alignment};

const NAME: &str = "system";

/// Wrapper for the system's default allocator
///
/// Sizes are forwarded on release and resize because the host needs the
/// original layout; passing the size the block was requested with is part
/// of the protocol contract anyway.
///
/// # Thread Safety
/// The host heap is thread-safe, and so is this wrapper.
#[derive(Debug, Clone)]
pub struct SystemAllocator {
    alignment: usize,
    diagnostics: Diagnostics,
}

impl SystemAllocator {
    /// Creates a wrapper using the default 8-byte alignment
    #[inline]
    pub fn new() -> Self {
        Self::build(DEFAULT_ALIGNMENT)
    }

    /// Creates a wrapper that aligns every block to `alignment`
    pub fn with_alignment(alignment: usize) -> AllocResult<Self> {
        validate_alignment(alignment).map(Self::build)
    }

    fn build(alignment: usize) -> Self {
        #[cfg(feature = "logging")]
        tracing::debug!(alignment, "system allocator initialized");

        Self {
            alignment,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Creates a wrapper reporting misuse to `diagnostics`
    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        Self::new().diagnostics(diagnostics)
    }

    /// Replaces the diagnostics handle
    pub fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    fn layout(&self, size: usize) -> AllocResult<Layout> {
        Layout::from_size_align(size, self.alignment)
            .map_err(|_| AllocError::invalid_layout("size overflows isize once aligned"))
    }

    /// Aligned, zero-length block that owns nothing
    fn dangling(&self) -> NonNull<[u8]> {
        let ptr = NonNull::new(ptr::without_provenance_mut::<u8>(self.alignment))
            .unwrap_or(NonNull::dangling());
        NonNull::slice_from_raw_parts(ptr, 0)
    }

    fn host_failure(layout: Layout) -> AllocError {
        #[cfg(feature = "logging")]
        tracing::warn!(
            size = layout.size(),
            align = layout.align(),
            "host allocation failed"
        );
        AllocError::host_allocation_failed(layout)
    }
}

impl Default for SystemAllocator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: SystemAllocator forwards to the host heap.
// - Every non-empty layout uses the configured alignment
// - Zero-sized requests never reach the host
// - A failed host realloc leaves the original block untouched
unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        if size == 0 {
            return Ok(self.dangling());
        }

        let layout = self.layout(size)?;
        // SAFETY: layout has non-zero size
        let ptr = unsafe { System.alloc(layout) };

        NonNull::new(ptr)
            .map(|ptr| NonNull::slice_from_raw_parts(ptr, size))
            .ok_or_else(|| Self::host_failure(layout))
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) -> AllocResult<()> {
        if size == 0 {
            return Ok(());
        }

        let layout = self.layout(size)?;
        // SAFETY: ptr came from System with this layout (caller contract)
        unsafe { System.dealloc(ptr.as_ptr(), layout) };
        Ok(())
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        if old_size == 0 {
            return self.allocate(new_size);
        }
        if new_size == 0 {
            // SAFETY: forwarded from the caller
            unsafe { self.release(ptr, old_size)? };
            return Ok(self.dangling());
        }

        let old_layout = self.layout(old_size)?;
        let new_layout = self.layout(new_size)?;
        // SAFETY: ptr came from System with old_layout (caller contract) and
        // new_layout proves new_size is valid for this alignment
        let moved = unsafe { System.realloc(ptr.as_ptr(), old_layout, new_size) };

        NonNull::new(moved)
            .map(|ptr| NonNull::slice_from_raw_parts(ptr, new_size))
            .ok_or_else(|| Self::host_failure(new_layout))
    }

    fn reset(&self) -> AllocResult<()> {
        let error = AllocError::unsupported(NAME, Operation::Empty);
        self.diagnostics.emit(NAME, &error);
        Err(error)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn alignment(&self) -> usize {
        self.alignment
    }
}

// The host does not expose per-wrapper figures
impl MemoryUsage for SystemAllocator {
    fn used_memory(&self) -> usize {
        0
    }

    fn available_memory(&self) -> Option<usize> {
        None
    }

    fn total_memory(&self) -> Option<usize> {
        None
    }
}
