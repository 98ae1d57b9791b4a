//! Utility functions and helpers for strata-memory
//!
//! Alignment helpers shared by the allocator backends.

/// Alignment boundary used when a configuration does not name one
pub const DEFAULT_ALIGNMENT: usize = 8;

/// Aligns a value up to the nearest multiple of alignment
///
/// # Examples
/// ```
/// use strata_memory::utils::align_up;
///
/// assert_eq!(align_up(7, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 8), 16);
/// ```
#[inline(always)]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// Aligns a value up, returning `None` instead of wrapping on overflow
///
/// # Examples
/// ```
/// use strata_memory::utils::checked_align_up;
///
/// assert_eq!(checked_align_up(1, 8), Some(8));
/// assert_eq!(checked_align_up(0, 8), Some(0));
/// assert_eq!(checked_align_up(usize::MAX, 8), None);
/// ```
#[inline(always)]
pub const fn checked_align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    match value.checked_add(alignment - 1) {
        Some(bumped) => Some(bumped & !(alignment - 1)),
        None => None,
    }
}

/// Checks if a value is aligned to the given alignment
///
/// # Examples
/// ```
/// use strata_memory::utils::is_aligned;
///
/// assert!(is_aligned(16, 8));
/// assert!(is_aligned(32, 16));
/// assert!(!is_aligned(17, 8));
/// ```
#[inline(always)]
pub const fn is_aligned(value: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    value & (alignment - 1) == 0
}

/// Check if a pointer is properly aligned
#[inline(always)]
pub fn is_aligned_ptr<T>(ptr: *const T, alignment: usize) -> bool {
    is_aligned(ptr as usize, alignment)
}

/// Validates a configured alignment boundary
pub(crate) fn validate_alignment(alignment: usize) -> crate::error::AllocResult<usize> {
    if alignment.is_power_of_two() {
        Ok(alignment)
    } else {
        Err(crate::error::MemoryError::invalid_alignment(alignment))
    }
}
