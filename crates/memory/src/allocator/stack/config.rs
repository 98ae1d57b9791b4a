//! Stack allocator configuration

use crate::diagnostics::Diagnostics;
use crate::utils::DEFAULT_ALIGNMENT;

/// Configuration for stack allocator
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Boundary every address and size is rounded to (power of two)
    pub alignment: usize,

    /// Fill patterns for debugging
    pub alloc_pattern: Option<u8>,
    pub dealloc_pattern: Option<u8>,

    /// Where misuse is reported
    pub diagnostics: Diagnostics,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            alloc_pattern: None,
            dealloc_pattern: None,
            diagnostics: Diagnostics::default(),
        }
    }
}

impl StackConfig {
    /// Debug configuration - fill patterns on, misuse logged
    pub fn debug() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            alloc_pattern: Some(0xCC),
            dealloc_pattern: Some(0xDD),
            #[cfg(feature = "logging")]
            diagnostics: Diagnostics::tracing(),
            #[cfg(not(feature = "logging"))]
            diagnostics: Diagnostics::default(),
        }
    }

    /// Default configuration with a different alignment boundary
    pub fn with_alignment(alignment: usize) -> Self {
        Self {
            alignment,
            ..Self::default()
        }
    }

    /// Replaces the diagnostics handle
    pub fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}
