//! Allocator statistics
//!
//! Plain counters collected per allocator instance by
//! [`TrackedAllocator`](super::TrackedAllocator).

use core::fmt;

use super::Operation;

/// Statistics for one allocator instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Bytes currently allocated
    pub allocated_bytes: usize,
    /// Peak bytes allocated
    pub peak_allocated_bytes: usize,
    /// Successful `Alloc` operations
    pub allocation_count: usize,
    /// Successful `Free` operations
    pub deallocation_count: usize,
    /// Successful `Realloc` operations
    pub reallocation_count: usize,
    /// Successful `Empty` operations
    pub reset_count: usize,
    /// Rejected operations of any kind
    pub failed_operations: usize,
    /// Total bytes ever handed out by `Alloc` (cumulative)
    pub total_bytes_allocated: usize,
}

impl AllocatorStats {
    /// Creates a new empty stats object
    pub const fn new() -> Self {
        Self {
            allocated_bytes: 0,
            peak_allocated_bytes: 0,
            allocation_count: 0,
            deallocation_count: 0,
            reallocation_count: 0,
            reset_count: 0,
            failed_operations: 0,
            total_bytes_allocated: 0,
        }
    }

    /// Successful operations of the given kind
    pub fn count(&self, operation: Operation) -> usize {
        match operation {
            Operation::Alloc => self.allocation_count,
            Operation::Free => self.deallocation_count,
            Operation::Realloc => self.reallocation_count,
            Operation::Empty => self.reset_count,
        }
    }

    /// Successful operations of every kind
    pub fn successful_operations(&self) -> usize {
        Operation::ALL.iter().map(|op| self.count(*op)).sum()
    }

    /// Calculate the average allocation size
    pub fn average_allocation_size(&self) -> Option<f64> {
        (self.allocation_count > 0)
            .then(|| self.total_bytes_allocated as f64 / self.allocation_count as f64)
    }

    /// Share of operations that succeeded (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        let succeeded = self.successful_operations();
        let attempts = succeeded + self.failed_operations;
        if attempts > 0 {
            succeeded as f64 / attempts as f64
        } else {
            1.0
        }
    }

    pub(crate) fn record_allocation(&mut self, size: usize) {
        self.allocation_count += 1;
        self.total_bytes_allocated = self.total_bytes_allocated.saturating_add(size);
        self.grow_to(self.allocated_bytes.saturating_add(size));
    }

    pub(crate) fn record_deallocation(&mut self, size: usize) {
        self.deallocation_count += 1;
        self.allocated_bytes = self.allocated_bytes.saturating_sub(size);
    }

    pub(crate) fn record_reallocation(&mut self, old_size: usize, new_size: usize) {
        self.reallocation_count += 1;
        self.grow_to(
            self.allocated_bytes
                .saturating_sub(old_size)
                .saturating_add(new_size),
        );
    }

    pub(crate) fn record_reset(&mut self) {
        self.reset_count += 1;
        self.allocated_bytes = 0;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_operations += 1;
    }

    fn grow_to(&mut self, allocated: usize) {
        self.allocated_bytes = allocated;
        self.peak_allocated_bytes = self.peak_allocated_bytes.max(allocated);
    }
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Allocator Statistics:")?;
        writeln!(f, "  Current allocated: {} bytes", self.allocated_bytes)?;
        writeln!(f, "  Peak allocated: {} bytes", self.peak_allocated_bytes)?;
        writeln!(f, "  Allocations: {}", self.allocation_count)?;
        writeln!(f, "  Deallocations: {}", self.deallocation_count)?;
        writeln!(f, "  Reallocations: {}", self.reallocation_count)?;
        writeln!(f, "  Resets: {}", self.reset_count)?;
        writeln!(f, "  Failed operations: {}", self.failed_operations)?;

        if let Some(avg) = self.average_allocation_size() {
            writeln!(f, "  Average allocation size: {avg:.2} bytes")?;
        }

        writeln!(f, "  Success rate: {:.2}%", self.success_rate() * 100.0)
    }
}
