//! Integration tests for moving live allocations between allocators
#![cfg(feature = "system")]

use std::ptr::NonNull;

use strata_memory::allocator::{
    Allocator, Operation, StackAllocator, SystemAllocator, TrackedAllocator, move_allocation,
};

fn fill_sequence(block: NonNull<[u8]>) {
    let len = block.len();
    let ptr = block.cast::<u8>().as_ptr();
    for i in 0..len {
        unsafe { ptr.add(i).write((i % 251) as u8) };
    }
}

fn is_sequence(block: NonNull<[u8]>, len: usize) -> bool {
    let bytes = unsafe { std::slice::from_raw_parts(block.cast::<u8>().as_ptr(), len) };
    bytes.iter().enumerate().all(|(i, &b)| b == (i % 251) as u8)
}

#[test]
fn test_stack_to_heap_preserves_bytes() {
    let mut buf = [0u8; 1024];
    let stack = TrackedAllocator::new(StackAllocator::new(&mut buf).expect("stack"));
    let heap = TrackedAllocator::new(SystemAllocator::new());

    let src = stack.allocate(600).expect("source block");
    fill_sequence(src);

    let moved = unsafe { move_allocation(src.cast(), 600, &stack, &heap) }.expect("move");
    assert!(is_sequence(moved, 600));

    assert_eq!(stack.stats().count(Operation::Free), 1);
    assert_eq!(stack.inner().used(), 0);
    assert_eq!(heap.stats().count(Operation::Alloc), 1);
    assert_eq!(heap.allocated_bytes(), 600);

    unsafe { heap.release(moved.cast(), 600) }.expect("release moved block");
    assert!(!heap.has_leaks());
}

#[test]
fn test_heap_to_stack_preserves_bytes() {
    let mut buf = [0u8; 256];
    let stack = TrackedAllocator::new(StackAllocator::new(&mut buf).expect("stack"));
    let heap = TrackedAllocator::new(SystemAllocator::new());

    let src = heap.allocate(100).expect("source block");
    fill_sequence(src);

    let moved = unsafe { move_allocation(src.cast(), 100, &heap, &stack) }.expect("move");
    assert!(is_sequence(moved, 100));
    assert_eq!(heap.stats().count(Operation::Free), 1);
    assert!(!heap.has_leaks());
    assert_eq!(stack.inner().used(), 104);
}

#[test]
fn test_destination_full_aborts_before_touching_source() {
    let mut small = [0u8; 24];
    let stack = TrackedAllocator::new(StackAllocator::new(&mut small).expect("stack"));
    let heap = TrackedAllocator::new(SystemAllocator::new());

    let src = heap.allocate(64).expect("source block");
    fill_sequence(src);

    let err = unsafe { move_allocation(src.cast(), 64, &heap, &stack) }.expect_err("no room");
    assert!(err.is_capacity_exhausted());
    assert_eq!(heap.stats().count(Operation::Free), 0);
    assert!(is_sequence(src, 64), "source untouched");

    unsafe { heap.release(src.cast(), 64) }.expect("source still owned by heap");
}

#[test]
fn test_rejected_source_release_rolls_back_destination() {
    let mut buf = [0u8; 128];
    let stack = StackAllocator::new(&mut buf).expect("stack");
    let heap = TrackedAllocator::new(SystemAllocator::new());

    let buried = stack.allocate(16).expect("buried block");
    fill_sequence(buried);
    stack.allocate(16).expect("top block");

    let err = unsafe { move_allocation(buried.cast(), 16, &stack, &heap) }
        .expect_err("buried block cannot be released");
    assert!(err.is_not_top_of_stack());

    let stats = heap.stats();
    assert_eq!(stats.count(Operation::Alloc), 1);
    assert_eq!(stats.count(Operation::Free), 1);
    assert!(!heap.has_leaks());
    assert_eq!(stack.used(), 32);
    assert!(is_sequence(buried, 16));
}

#[test]
fn test_move_within_one_stack_is_rejected_cleanly() {
    let mut buf = [0u8; 128];
    let stack = StackAllocator::new(&mut buf).expect("stack");

    let src = stack.allocate(8).expect("source block");
    let err = unsafe { move_allocation(src.cast(), 8, &stack, &stack) }
        .expect_err("the copy sits above the source");
    assert!(err.is_not_top_of_stack());
    assert_eq!(stack.used(), 8);
}

#[test]
fn test_zero_sized_move() {
    let mut buf = [0u8; 64];
    let stack = StackAllocator::new(&mut buf).expect("stack");
    let heap = SystemAllocator::new();

    let src = heap.allocate(0).expect("empty block");
    let moved = unsafe { move_allocation(src.cast(), 0, &heap, &stack) }.expect("move");
    assert_eq!(moved.len(), 0);
    assert_eq!(stack.used(), 0);
}
