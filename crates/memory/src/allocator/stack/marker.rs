//! Stack marker for position tracking

/// Saved stack position
///
/// Restoring a marker releases everything allocated after it was taken.
/// Markers carry no ownership and may be copied freely. A marker stops
/// being restorable once its allocator is unwound below it, so a stale copy
/// can never cut into a block allocated after that rewind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StackMarker {
    pub(super) position: usize,
    /// Index of the allocator checkpoint backing this marker
    pub(super) slot: usize,
    pub(super) id: u64,
}

impl StackMarker {
    /// Offset of the marked position from the allocator's base
    pub fn offset(&self) -> usize {
        self.position
    }
}
