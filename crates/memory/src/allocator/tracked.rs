//! Tracked allocator implementation
//!
//! Wraps any [`Allocator`] and counts what passes through it.
//!
//! # Safety
//!
//! Every unsafe operation is forwarded to the inner allocator with the
//! caller's contract unchanged. Counting is a side effect only.
//!
//! ## Invariants
//!
//! - Every successful operation is counted under its own kind
//! - Rejected operations only bump the failure count
//! - `Realloc` is counted as one reallocation, not a free plus an alloc

use core::cell::Cell;
use core::ptr::NonNull;

use super::{AllocResult, Allocator, AllocatorStats, MemoryUsage};

/// A wrapper allocator that counts operations and live bytes
///
/// Counters are per wrapper; nothing is shared between instances.
///
/// ```
/// use strata_memory::allocator::{Allocator, Operation, SystemAllocator, TrackedAllocator};
///
/// let tracked = TrackedAllocator::new(SystemAllocator::new());
/// let block = tracked.allocate(32).unwrap();
/// unsafe { tracked.release(block.cast(), 32) }.unwrap();
///
/// assert_eq!(tracked.stats().count(Operation::Free), 1);
/// assert!(!tracked.has_leaks());
/// ```
#[derive(Debug)]
pub struct TrackedAllocator<A> {
    inner: A,
    stats: Cell<AllocatorStats>,
}

impl<A> TrackedAllocator<A> {
    /// Creates a new TrackedAllocator wrapping the provided allocator
    pub fn new(allocator: A) -> Self {
        Self {
            inner: allocator,
            stats: Cell::new(AllocatorStats::new()),
        }
    }

    /// Gets a reference to the underlying allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Consumes the tracker and returns the underlying allocator
    pub fn into_inner(self) -> A {
        self.inner
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> AllocatorStats {
        self.stats.get()
    }

    /// Returns the total bytes currently allocated
    pub fn allocated_bytes(&self) -> usize {
        self.stats.get().allocated_bytes
    }

    /// Returns the peak bytes allocated
    pub fn peak_allocated_bytes(&self) -> usize {
        self.stats.get().peak_allocated_bytes
    }

    /// Reset counters while keeping current allocations
    pub fn reset_stats(&self) {
        self.stats.set(AllocatorStats::new());
    }

    /// Check if anything allocated through the wrapper is still live
    pub fn has_leaks(&self) -> bool {
        self.stats.get().allocated_bytes > 0
    }

    fn record<T>(
        &self,
        result: AllocResult<T>,
        on_success: impl FnOnce(&mut AllocatorStats),
    ) -> AllocResult<T> {
        let mut stats = self.stats.get();
        match &result {
            Ok(_) => on_success(&mut stats),
            Err(_) => stats.record_failure(),
        }
        self.stats.set(stats);
        result
    }
}

// SAFETY: TrackedAllocator implements Allocator by forwarding to inner allocator.
// - All unsafe trait methods forward to A's implementation with same contracts
// - Statistics tracking is side-effect only (no memory safety impact)
unsafe impl<A: Allocator> Allocator for TrackedAllocator<A> {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        self.record(self.inner.allocate(size), |stats| {
            stats.record_allocation(size);
        })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) -> AllocResult<()> {
        // SAFETY: forwarded from the caller
        let result = unsafe { self.inner.release(ptr, size) };
        self.record(result, |stats| stats.record_deallocation(size))
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: forwarded from the caller
        let result = unsafe { self.inner.resize(ptr, old_size, new_size) };
        self.record(result, |stats| {
            stats.record_reallocation(old_size, new_size);
        })
    }

    fn reset(&self) -> AllocResult<()> {
        self.record(self.inner.reset(), AllocatorStats::record_reset)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }
}

impl<A: MemoryUsage> MemoryUsage for TrackedAllocator<A> {
    fn used_memory(&self) -> usize {
        self.inner.used_memory()
    }

    fn available_memory(&self) -> Option<usize> {
        self.inner.available_memory()
    }

    fn total_memory(&self) -> Option<usize> {
        self.inner.total_memory()
    }
}
