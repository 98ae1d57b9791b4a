//! Backend-agnostic protocol tests
//!
//! Every scenario here only sees `&dyn Allocator` and runs against each
//! built-in backend.
#![cfg(feature = "system")]

use rstest::rstest;
use strata_memory::allocator::{
    self, Allocator, Operation, Request, Response, StackAllocator, SystemAllocator, dispatch,
};

#[derive(Debug, Clone, Copy)]
enum Backend {
    Stack,
    System,
}

fn with_backend<R>(backend: Backend, test: impl FnOnce(&dyn Allocator) -> R) -> R {
    match backend {
        Backend::Stack => {
            let mut buf = [0u8; 64];
            let stack = StackAllocator::new(&mut buf).expect("Failed to create stack allocator");
            test(&stack)
        }
        Backend::System => test(&SystemAllocator::new()),
    }
}

/// Two one-byte blocks, written, checked, released newest first
fn alloc_free_scenario(a: &dyn Allocator) {
    let data_a = allocator::allocate(a, 1).expect("alloc A").cast::<u8>();
    unsafe { data_a.write(b'A') };

    let data_b = allocator::allocate(a, 1).expect("alloc B").cast::<u8>();
    unsafe { data_b.write(b'B') };

    unsafe {
        assert_eq!(data_a.read(), b'A', "A survives the allocation of B");
        assert_eq!(data_b.read(), b'B');

        allocator::release(a, data_b, 1).expect("free B");
        assert_eq!(data_a.read(), b'A', "A survives the release of B");

        allocator::release(a, data_a, 1).expect("free A");
    }
}

#[rstest]
#[case::stack(Backend::Stack)]
#[case::system(Backend::System)]
fn test_alloc_free_on_every_backend(#[case] backend: Backend) {
    with_backend(backend, alloc_free_scenario);
}

#[rstest]
#[case::stack(Backend::Stack)]
#[case::system(Backend::System)]
fn test_returned_addresses_are_aligned(#[case] backend: Backend) {
    with_backend(backend, |a| {
        let align = a.alignment();
        let mut live = Vec::new();
        for size in [1, 2, 3, 5, 8] {
            let block = a.allocate(size).expect("allocation");
            assert_eq!(block.cast::<u8>().as_ptr().addr() % align, 0, "{}", a.name());
            live.push((block, size));
        }
        for (block, size) in live.into_iter().rev() {
            unsafe { a.release(block.cast(), size) }.expect("release newest first");
        }
    });
}

#[rstest]
#[case::stack(Backend::Stack)]
#[case::system(Backend::System)]
fn test_dispatch_matches_direct_calls(#[case] backend: Backend) {
    with_backend(backend, |a| unsafe {
        let block = dispatch(a, Request::Alloc { size: 8 })
            .expect("alloc")
            .into_allocation()
            .expect("alloc returns a block");
        assert_eq!(block.len(), 8);

        let ptr = block.cast::<u8>();
        ptr.write(7);
        let grown = dispatch(
            a,
            Request::Realloc {
                ptr,
                old_size: 8,
                new_size: 16,
            },
        )
        .expect("realloc")
        .into_allocation()
        .expect("realloc returns a block");
        assert_eq!(grown.cast::<u8>().read(), 7);

        let freed = dispatch(
            a,
            Request::Free {
                ptr: grown.cast(),
                size: 16,
            },
        )
        .expect("free");
        assert_eq!(freed, Response::Released);
    });
}

#[test]
fn test_empty_outcome_depends_on_backend() {
    let emptied = with_backend(Backend::Stack, |a| unsafe { dispatch(a, Request::Empty) });
    assert_eq!(emptied, Ok(Response::Emptied));

    let err = with_backend(Backend::System, |a| allocator::reset(a)).expect_err("unsupported");
    assert_eq!(err.operation(), Some(Operation::Empty));
    assert!(err.is_unsupported());
}

#[test]
fn test_request_operation_kinds() {
    let kinds: Vec<Operation> = [Request::Alloc { size: 0 }, Request::Empty]
        .iter()
        .map(Request::operation)
        .collect();
    assert_eq!(kinds, [Operation::Alloc, Operation::Empty]);
}

#[test]
fn test_heterogeneous_backends_in_one_collection() {
    let mut buf = [0u8; 128];
    let stack = StackAllocator::new(&mut buf).expect("Failed to create stack allocator");
    let heap = SystemAllocator::new();

    let backends: [&dyn Allocator; 2] = [&stack, &heap];

    for backend in backends {
        alloc_free_scenario(backend);
    }
    assert_eq!(stack.used(), 0);
}
