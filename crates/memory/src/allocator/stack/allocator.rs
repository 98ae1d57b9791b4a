//! Main stack allocator implementation
//!
//! # Safety
//!
//! This module implements a single-threaded LIFO stack allocator over a
//! borrowed buffer:
//! - The buffer is borrowed mutably for `'buf`, so the caller cannot touch it
//!   while the allocator is alive
//! - The cursor is a `Cell` offset from `base`, making the allocator `!Sync`
//! - Only the most recent allocation can be released or resized
//! - Markers rewind the cursor to an earlier position, and only while the
//!   stack has not been unwound below them since they were taken
//!
//! ## Invariants
//!
//! - `0 <= top <= capacity`, i.e. `base <= head <= base + capacity`
//! - `[base, head)` is exactly the set of allocated bytes
//! - Every offset handed out is a multiple of the configured alignment, and
//!   `base` itself is aligned, so every returned address is aligned
//! - A rejected operation never moves the cursor
//! - Every live checkpoint lies at or below `top`, positions strictly
//!   increasing

use core::cell::{Cell, RefCell};
use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use super::{StackConfig, StackMarker};
use crate::allocator::{AllocError, AllocResult, Allocator, MemoryUsage, Operation};
use crate::utils::{checked_align_up, validate_alignment};

const NAME: &str = "stack";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    position: usize,
    id: u64,
}

/// Stack allocator that supports LIFO allocation and deallocation
///
/// The allocator never owns the buffer. The start of the buffer is aligned
/// up to the configured boundary; the skipped prefix is the header region
/// and is never handed out.
///
/// # Memory Layout
/// ```text
/// [buffer][header][alloc1][alloc2][alloc3][head]-----free-----[end]
///                 ^base   <----- allocated ----->  <-- available -->
/// ```
///
/// Deallocations must happen in reverse order: alloc3, then alloc2, then
/// alloc1. Anything else is rejected with
/// [`MemoryError::NotTopOfStack`](crate::error::MemoryError::NotTopOfStack).
pub struct StackAllocator<'buf> {
    /// First usable byte (aligned)
    base: NonNull<u8>,

    /// Offset of the head from `base`
    top: Cell<usize>,

    /// Usable bytes after the header region
    capacity: usize,

    /// Bytes skipped at the start of the buffer to reach alignment
    header: usize,

    config: StackConfig,

    /// Positions that markers may still restore to, oldest first
    checkpoints: RefCell<Vec<Checkpoint>>,

    /// Identity handed to the next checkpoint
    next_checkpoint: Cell<u64>,

    _buffer: PhantomData<&'buf mut [u8]>,
}

impl<'buf> StackAllocator<'buf> {
    /// Creates a stack allocator with default configuration
    pub fn new(buffer: &'buf mut [u8]) -> AllocResult<Self> {
        Self::with_config(buffer, StackConfig::default())
    }

    /// Creates a stack allocator with custom configuration
    pub fn with_config(buffer: &'buf mut [u8], config: StackConfig) -> AllocResult<Self> {
        let alignment = validate_alignment(config.alignment)?;

        let size = buffer.len();
        let start = buffer.as_ptr().addr();
        let header = checked_align_up(start, alignment).map_or(usize::MAX, |aligned| aligned - start);
        if size <= header {
            return Err(AllocError::buffer_too_small(size, header));
        }

        let usable = &mut buffer[header..];
        if let Some(pattern) = config.dealloc_pattern {
            usable.fill(pattern);
        }
        let capacity = usable.len();
        let base = NonNull::from(usable).cast::<u8>();

        #[cfg(feature = "logging")]
        tracing::debug!(capacity, alignment, header, "stack allocator initialized");

        Ok(Self {
            base,
            top: Cell::new(0),
            capacity,
            header,
            config,
            checkpoints: RefCell::new(Vec::new()),
            next_checkpoint: Cell::new(0),
            _buffer: PhantomData,
        })
    }

    /// Creates a debug-configured stack allocator
    pub fn debug(buffer: &'buf mut [u8]) -> AllocResult<Self> {
        Self::with_config(buffer, StackConfig::debug())
    }

    /// Start of the usable region
    pub fn base(&self) -> NonNull<u8> {
        self.base
    }

    /// Next free byte
    pub fn head(&self) -> NonNull<u8> {
        // SAFETY: top <= capacity, so the result is in bounds or one past
        // the end of the borrowed buffer
        unsafe { self.base.add(self.top.get()) }
    }

    /// Returns the total usable capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the amount of memory currently allocated
    pub fn used(&self) -> usize {
        self.top.get()
    }

    /// Returns the amount of memory available for allocation
    pub fn available(&self) -> usize {
        self.capacity - self.top.get()
    }

    /// Bytes skipped at the start of the buffer to align `base`
    pub fn header_size(&self) -> usize {
        self.header
    }

    /// Configuration the allocator was created with
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Creates a marker at the current stack position
    ///
    /// Markers taken at the same position with no rewind in between share
    /// one checkpoint.
    pub fn mark(&self) -> StackMarker {
        let top = self.top.get();
        let mut checkpoints = self.checkpoints.borrow_mut();

        let checkpoint = match checkpoints.last().copied() {
            Some(last) if last.position == top => last,
            _ => {
                let id = self.next_checkpoint.get();
                self.next_checkpoint.set(id.wrapping_add(1));
                let checkpoint = Checkpoint { position: top, id };
                checkpoints.push(checkpoint);
                checkpoint
            }
        };

        StackMarker {
            position: top,
            slot: checkpoints.len() - 1,
            id: checkpoint.id,
        }
    }

    /// Rewinds the stack to a previous marker
    ///
    /// Everything allocated after the marker is released. Fails with
    /// [`MemoryError::InvalidMarker`](crate::error::MemoryError::InvalidMarker)
    /// once the stack has been unwound below the marker, even if it has
    /// grown past it again: the bytes above the marker may then belong to a
    /// block allocated after the rewind.
    pub fn restore(&self, marker: StackMarker) -> AllocResult<()> {
        let top = self.top.get();
        let live = self.checkpoints.borrow().get(marker.slot).is_some_and(|checkpoint| {
            checkpoint.position == marker.position && checkpoint.id == marker.id
        });
        if !live {
            return Err(AllocError::invalid_marker(marker.position, top));
        }

        // SAFETY: live checkpoints satisfy position <= top <= capacity
        unsafe { self.fill(marker.position, top, self.config.dealloc_pattern) };
        self.set_top(marker.position);
        Ok(())
    }

    /// Moves the cursor, dropping checkpoints left above it
    fn set_top(&self, top: usize) {
        if top < self.top.get() {
            let mut checkpoints = self.checkpoints.borrow_mut();
            while checkpoints.last().is_some_and(|checkpoint| checkpoint.position > top) {
                checkpoints.pop();
            }
        }
        self.top.set(top);
    }

    /// Offset of `ptr` from `base`, if it lies within `[base, base + capacity]`
    fn offset_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        let offset = ptr.as_ptr().addr().checked_sub(self.base.as_ptr().addr())?;
        (offset <= self.capacity).then_some(offset)
    }

    /// Offset of `ptr` if it is the top allocation of `size` bytes
    fn top_offset(&self, ptr: NonNull<u8>, size: usize) -> Option<usize> {
        let offset = self.offset_of(ptr)?;
        let rounded = checked_align_up(size, self.config.alignment)?;
        (offset.checked_add(rounded)? == self.top.get()).then_some(offset)
    }

    fn reject(&self, error: AllocError) -> AllocError {
        self.config.diagnostics.emit(NAME, &error);
        error
    }

    /// Writes `pattern` over `[from, to)` if one is configured
    ///
    /// # Safety
    /// `from <= to <= capacity`
    unsafe fn fill(&self, from: usize, to: usize, pattern: Option<u8>) {
        if let Some(pattern) = pattern {
            // SAFETY: the range lies inside the borrowed buffer (caller contract)
            unsafe { ptr::write_bytes(self.base.as_ptr().add(from), pattern, to - from) };
        }
    }
}

// SAFETY: StackAllocator hands out disjoint ranges of its buffer.
// - Every range is [top, top + rounded) with top + rounded <= capacity
// - `base` is aligned and every offset is a multiple of the alignment
// - release/resize only move the cursor after the top-of-stack check passes
unsafe impl Allocator for StackAllocator<'_> {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        let top = self.top.get();
        let available = self.capacity - top;

        let Some(rounded) = checked_align_up(size, self.config.alignment).filter(|r| *r <= available)
        else {
            return Err(self.reject(AllocError::capacity_exhausted(
                Operation::Alloc,
                size,
                available,
            )));
        };

        // SAFETY: top + rounded <= capacity (checked above)
        let ptr = unsafe {
            self.fill(top, top + rounded, self.config.alloc_pattern);
            self.base.add(top)
        };
        self.top.set(top + rounded);

        Ok(NonNull::slice_from_raw_parts(ptr, size))
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) -> AllocResult<()> {
        let Some(offset) = self.top_offset(ptr, size) else {
            return Err(self.reject(AllocError::not_top_of_stack(
                Operation::Free,
                ptr.as_ptr().addr(),
                size,
            )));
        };

        let top = self.top.get();
        // SAFETY: offset <= top <= capacity
        unsafe { self.fill(offset, top, self.config.dealloc_pattern) };
        self.set_top(offset);
        Ok(())
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        let Some(offset) = self.top_offset(ptr, old_size) else {
            return Err(self.reject(AllocError::not_top_of_stack(
                Operation::Realloc,
                ptr.as_ptr().addr(),
                old_size,
            )));
        };

        let available = self.capacity - offset;
        let Some(rounded) =
            checked_align_up(new_size, self.config.alignment).filter(|r| *r <= available)
        else {
            return Err(self.reject(AllocError::capacity_exhausted(
                Operation::Realloc,
                new_size,
                available,
            )));
        };

        let top = self.top.get();
        let new_top = offset + rounded;
        // SAFETY: offset <= top <= capacity and new_top <= capacity
        let block = unsafe {
            if new_top > top {
                self.fill(top, new_top, self.config.alloc_pattern);
            } else {
                self.fill(new_top, top, self.config.dealloc_pattern);
            }
            self.base.add(offset)
        };
        self.set_top(new_top);

        Ok(NonNull::slice_from_raw_parts(block, new_size))
    }

    fn reset(&self) -> AllocResult<()> {
        // SAFETY: 0 <= top <= capacity
        unsafe { self.fill(0, self.top.get(), self.config.dealloc_pattern) };
        self.set_top(0);
        Ok(())
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn alignment(&self) -> usize {
        self.config.alignment
    }
}

impl MemoryUsage for StackAllocator<'_> {
    fn used_memory(&self) -> usize {
        self.used()
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.available())
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.capacity())
    }
}

impl fmt::Debug for StackAllocator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackAllocator")
            .field("base", &self.base)
            .field("used", &self.used())
            .field("capacity", &self.capacity)
            .field("alignment", &self.config.alignment)
            .finish_non_exhaustive()
    }
}

// SAFETY: StackAllocator can be sent between threads.
// - It holds the only access path to the borrowed buffer for 'buf
// - The diagnostics sink is Send + Sync
// - The checkpoint list is owned and only touched through &self on one thread
// It is not Sync: the Cell cursor has no synchronization.
unsafe impl Send for StackAllocator<'_> {}
