//! Request/response form of the allocator protocol
//!
//! [`dispatch`] is the single entry point: one [`Request`] in, one
//! [`Response`] (or error) out. The free functions [`allocate`],
//! [`release`], [`resize`] and [`reset`] are thin wrappers for callers that
//! prefer a function per operation.
//!
//! ```
//! use strata_memory::allocator::{Allocator, Request, StackAllocator, dispatch};
//!
//! let mut buf = [0u8; 64];
//! let stack = StackAllocator::new(&mut buf).unwrap();
//! let backend: &dyn Allocator = &stack;
//!
//! let block = unsafe { dispatch(backend, Request::Alloc { size: 12 }) }
//!     .unwrap()
//!     .into_allocation()
//!     .unwrap();
//! assert_eq!(block.len(), 12);
//! ```

use core::fmt;
use core::ptr::NonNull;

use super::{AllocResult, Allocator};

/// Kind of protocol operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reserve a new block
    Alloc,
    /// Give back the block at a pointer
    Free,
    /// Grow or shrink a live block
    Realloc,
    /// Drop every allocation at once
    Empty,
}

impl Operation {
    /// All operation kinds, in protocol order
    pub const ALL: [Operation; 4] = [Self::Alloc, Self::Free, Self::Realloc, Self::Empty];

    /// Lowercase name used in logs and diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alloc => "alloc",
            Self::Free => "free",
            Self::Realloc => "realloc",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protocol request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Allocate `size` bytes
    Alloc { size: usize },
    /// Release `size` bytes at `ptr`
    Free { ptr: NonNull<u8>, size: usize },
    /// Resize the allocation at `ptr` from `old_size` to `new_size` bytes
    Realloc {
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    },
    /// Invalidate every allocation at once
    Empty,
}

impl Request {
    /// Kind of operation this request asks for
    pub fn operation(&self) -> Operation {
        match self {
            Self::Alloc { .. } => Operation::Alloc,
            Self::Free { .. } => Operation::Free,
            Self::Realloc { .. } => Operation::Realloc,
            Self::Empty => Operation::Empty,
        }
    }
}

/// Successful outcome of a [`Request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// `Alloc` or `Realloc` produced this block
    Allocated(NonNull<[u8]>),
    /// `Free` was accepted
    Released,
    /// `Empty` was accepted
    Emptied,
}

impl Response {
    /// The block produced by `Alloc`/`Realloc`, if any
    pub fn into_allocation(self) -> Option<NonNull<[u8]>> {
        match self {
            Self::Allocated(block) => Some(block),
            Self::Released | Self::Emptied => None,
        }
    }
}

/// Routes `request` to the matching [`Allocator`] method
///
/// # Safety
///
/// For `Free` and `Realloc`, `ptr` and the sizes must satisfy the contract of
/// [`Allocator::release`] and [`Allocator::resize`] respectively.
pub unsafe fn dispatch<A: Allocator + ?Sized>(
    allocator: &A,
    request: Request,
) -> AllocResult<Response> {
    match request {
        Request::Alloc { size } => allocator.allocate(size).map(Response::Allocated),
        Request::Free { ptr, size } => {
            // SAFETY: forwarded from the caller
            let released = unsafe { allocator.release(ptr, size) };
            released.map(|()| Response::Released)
        }
        Request::Realloc {
            ptr,
            old_size,
            new_size,
        } => {
            // SAFETY: forwarded from the caller
            let resized = unsafe { allocator.resize(ptr, old_size, new_size) };
            resized.map(Response::Allocated)
        }
        Request::Empty => allocator.reset().map(|()| Response::Emptied),
    }
}

/// Allocates `size` bytes from any backend
#[inline]
pub fn allocate<A: Allocator + ?Sized>(allocator: &A, size: usize) -> AllocResult<NonNull<[u8]>> {
    allocator.allocate(size)
}

/// Releases an allocation on any backend
///
/// # Safety
///
/// See [`Allocator::release`].
#[inline]
pub unsafe fn release<A: Allocator + ?Sized>(
    allocator: &A,
    ptr: NonNull<u8>,
    size: usize,
) -> AllocResult<()> {
    // SAFETY: forwarded from the caller
    unsafe { allocator.release(ptr, size) }
}

/// Resizes an allocation on any backend
///
/// # Safety
///
/// See [`Allocator::resize`].
#[inline]
pub unsafe fn resize<A: Allocator + ?Sized>(
    allocator: &A,
    ptr: NonNull<u8>,
    old_size: usize,
    new_size: usize,
) -> AllocResult<NonNull<[u8]>> {
    // SAFETY: forwarded from the caller
    unsafe { allocator.resize(ptr, old_size, new_size) }
}

/// Empties any backend
#[inline]
pub fn reset<A: Allocator + ?Sized>(allocator: &A) -> AllocResult<()> {
    allocator.reset()
}
