//! Moving live allocations between allocator instances

use core::ptr::{self, NonNull};

use super::{AllocResult, Allocator};

/// Moves `size` bytes at `ptr` from `from` into a fresh block owned by `to`
///
/// The move is all-or-nothing:
/// - if `to` cannot allocate, nothing is copied and `ptr` stays owned by
///   `from`
/// - if `from` rejects the release (e.g. `ptr` is not the top of a stack
///   allocator), the new block is given back to `to` and `ptr` stays valid
///
/// On success `ptr` is released and the returned block is the only handle
/// to the data.
///
/// # Safety
///
/// `ptr` must be a live allocation of `from`, requested with `size` bytes.
///
/// ```
/// use strata_memory::allocator::{Allocator, StackAllocator, SystemAllocator, move_allocation};
///
/// let mut buf = [0u8; 64];
/// let stack = StackAllocator::new(&mut buf).unwrap();
/// let heap = SystemAllocator::new();
///
/// let src = stack.allocate(5).unwrap().cast::<u8>();
/// unsafe { src.as_ptr().copy_from_nonoverlapping(b"hello".as_ptr(), 5) };
///
/// let moved = unsafe { move_allocation(src, 5, &stack, &heap) }.unwrap();
/// assert_eq!(unsafe { moved.as_ref() }, b"hello");
/// assert_eq!(stack.used(), 0);
/// unsafe { heap.release(moved.cast(), 5) }.unwrap();
/// ```
pub unsafe fn move_allocation<F, T>(
    ptr: NonNull<u8>,
    size: usize,
    from: &F,
    to: &T,
) -> AllocResult<NonNull<[u8]>>
where
    F: Allocator + ?Sized,
    T: Allocator + ?Sized,
{
    let block = to.allocate(size)?;
    let dest = block.cast::<u8>();

    // SAFETY: ptr is readable for size bytes (caller contract), dest was just
    // allocated with size bytes, and two live allocations never overlap
    unsafe { ptr::copy_nonoverlapping(ptr.as_ptr(), dest.as_ptr(), size) };

    // SAFETY: forwarded from the caller
    if let Err(error) = unsafe { from.release(ptr, size) } {
        // SAFETY: dest is the most recent allocation of `to`
        let rollback = unsafe { to.release(dest, size) };
        #[cfg(feature = "logging")]
        if let Err(rollback_error) = &rollback {
            tracing::warn!(
                allocator = to.name(),
                error = %rollback_error,
                "could not roll back destination block after failed move"
            );
        }
        #[cfg(not(feature = "logging"))]
        let _ = rollback;
        return Err(error);
    }

    #[cfg(feature = "logging")]
    tracing::trace!(size, from = from.name(), to = to.name(), "allocation moved");

    Ok(block)
}
