//! Object Handles - Typed References Into the Object Table
//!
//! A handle names a slot in the heap's object table together with the
//! generation the slot had when the object was allocated. Reclaiming the
//! object bumps the slot generation, so every handle issued for it turns
//! stale instead of silently aliasing whatever reuses the slot.

use serde::Serialize;
use std::fmt;

/// Opaque reference to a heap value
///
/// Handles are `Copy` and carry no ownership: holding one does not keep
/// the object alive. Only the root stack and pair edges do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the object table
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation this handle was issued for
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    #[inline]
    pub(crate) fn slot(self) -> u32 {
        self.index
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
