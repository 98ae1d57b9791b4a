//! RAII-based stack frame for automatic restoration

use super::{StackAllocator, StackMarker};

/// Scope guard that rewinds the stack when dropped
///
/// Everything allocated through the frame's allocator after the frame was
/// opened is released at once on drop. If the stack was unwound below the
/// frame in the meantime, the drop leaves the allocator alone.
///
/// ```
/// use strata_memory::allocator::{Allocator, StackAllocator, StackFrame};
///
/// let mut buf = [0u8; 128];
/// let stack = StackAllocator::new(&mut buf).unwrap();
/// stack.allocate(8).unwrap();
/// {
///     let frame = StackFrame::new(&stack);
///     frame.allocator().allocate(32).unwrap();
///     assert_eq!(stack.used(), 40);
/// }
/// assert_eq!(stack.used(), 8);
/// ```
#[must_use = "the frame rewinds the stack as soon as it is dropped"]
pub struct StackFrame<'a, 'buf> {
    allocator: &'a StackAllocator<'buf>,
    marker: StackMarker,
}

impl<'a, 'buf> StackFrame<'a, 'buf> {
    /// Opens a frame at the allocator's current position
    pub fn new(allocator: &'a StackAllocator<'buf>) -> Self {
        let marker = allocator.mark();
        Self { allocator, marker }
    }

    /// Gets the underlying allocator
    pub fn allocator(&self) -> &'a StackAllocator<'buf> {
        self.allocator
    }

    /// Position the frame rewinds to
    pub fn marker(&self) -> StackMarker {
        self.marker
    }

    /// Manually restore and consume this frame
    pub fn restore(self) {
        drop(self);
    }
}

impl Drop for StackFrame<'_, '_> {
    fn drop(&mut self) {
        // A stale marker is rejected without moving the head
        let _ = self.allocator.restore(self.marker);
    }
}
