//! Allocator traits
//!
//! Every backend implements [`Allocator`], one method per protocol operation.
//! Calling code only ever holds `&A` or `&dyn Allocator` and never branches
//! on the concrete backend.
//!
//! # Safety
//!
//! `Allocator` is an unsafe trait. Implementors promise that:
//! - a successful `allocate`/`resize` returns memory valid for reads and
//!   writes of the returned length, aligned to [`Allocator::alignment`]
//! - live allocations never overlap
//! - a rejected `release`/`resize` leaves the allocation and the allocator
//!   state untouched
//!
//! The blanket impl for `&A` forwards every call, so the contract carries
//! over unchanged.

use core::fmt;
use core::ptr::NonNull;

use super::AllocResult;

/// Pluggable allocator protocol
///
/// # Safety
///
/// See the module docs for the contract implementors must uphold.
pub unsafe trait Allocator {
    /// Allocates at least `size` bytes
    ///
    /// On failure the allocator state is unchanged. Memory content is
    /// unspecified.
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>>;

    /// Releases an allocation
    ///
    /// Returns an error if the backend rejects the release; the allocation
    /// then stays live.
    ///
    /// # Safety
    /// - `ptr` must have been returned by this allocator and not yet released
    /// - `size` must be the size it was requested with
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) -> AllocResult<()>;

    /// Changes the size of an allocation, possibly moving it
    ///
    /// On failure `ptr` stays valid with `old_size` bytes.
    ///
    /// # Safety
    /// - `ptr` must have been returned by this allocator and not yet released
    /// - `old_size` must be the size it was requested (or last resized) with
    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>>;

    /// Invalidates every outstanding allocation at once
    ///
    /// Backends that cannot do this return [`MemoryError::Unsupported`].
    ///
    /// [`MemoryError::Unsupported`]: crate::error::MemoryError::Unsupported
    fn reset(&self) -> AllocResult<()>;

    /// Static backend name, used in diagnostics
    fn name(&self) -> &'static str;

    /// Boundary every returned address is a multiple of
    fn alignment(&self) -> usize;
}

// SAFETY: Forwarding every call to `A`.
// - No state is added; `A`'s guarantees hold for the same pointers
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        (**self).allocate(size)
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) -> AllocResult<()> {
        // SAFETY: caller upholds `release`'s contract for `A`
        unsafe { (**self).release(ptr, size) }
    }

    #[inline]
    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: caller upholds `resize`'s contract for `A`
        unsafe { (**self).resize(ptr, old_size, new_size) }
    }

    #[inline]
    fn reset(&self) -> AllocResult<()> {
        (**self).reset()
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn alignment(&self) -> usize {
        (**self).alignment()
    }
}

/// Memory usage reporting
pub trait MemoryUsage {
    /// Get currently used memory in bytes
    fn used_memory(&self) -> usize;

    /// Get available memory in bytes (if known)
    fn available_memory(&self) -> Option<usize>;

    /// Get total memory capacity in bytes (if known)
    fn total_memory(&self) -> Option<usize> {
        self.available_memory()
            .map(|available| self.used_memory() + available)
    }

    /// Returns memory usage as a percentage (0.0 to 100.0)
    ///
    /// Returns `None` if total memory is unknown.
    fn memory_usage_percent(&self) -> Option<f32> {
        self.total_memory().map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.used_memory() as f32 / total as f32) * 100.0
            }
        })
    }

    /// Snapshot of the figures above
    fn memory_usage(&self) -> BasicMemoryUsage {
        BasicMemoryUsage {
            used: self.used_memory(),
            available: self.available_memory(),
            total: self.total_memory(),
            usage_percent: self.memory_usage_percent(),
        }
    }
}

impl<T: MemoryUsage + ?Sized> MemoryUsage for &T {
    fn used_memory(&self) -> usize {
        (**self).used_memory()
    }

    fn available_memory(&self) -> Option<usize> {
        (**self).available_memory()
    }

    fn total_memory(&self) -> Option<usize> {
        (**self).total_memory()
    }
}

/// Basic memory usage information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMemoryUsage {
    /// Currently used memory in bytes
    pub used: usize,
    /// Available memory in bytes (None if unbounded)
    pub available: Option<usize>,
    /// Total memory capacity in bytes (None if unbounded)
    pub total: Option<usize>,
    /// Memory usage as percentage (None if it cannot be calculated)
    pub usage_percent: Option<f32>,
}

impl fmt::Display for BasicMemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "used: {} bytes", self.used)?;

        if let Some(total) = self.total {
            write!(f, ", total: {total} bytes")?;
        }

        if let Some(percent) = self.usage_percent {
            write!(f, " ({percent:.1}%)")?;
        }

        Ok(())
    }
}
