//! Root Stack - GC Root Management
//!
//! Roots are the starting points for marking. The embedding program
//! announces a value it holds "in hand" by pushing its handle here and
//! releases it by popping. A popped value is not necessarily dead: it may
//! still be reachable through another root or a pair edge.
//!
//! Order only matters for the program's LIFO discipline; the mark phase
//! treats the stack as an unordered set.

use crate::error::{GcError, Result};
use crate::object::Handle;

/// RootStack - bounded LIFO stack of root handles
#[derive(Debug)]
pub struct RootStack {
    roots: Vec<Handle>,
    capacity: usize,
}

impl RootStack {
    /// Create an empty root stack holding at most `capacity` roots
    pub fn new(capacity: usize) -> Self {
        Self {
            roots: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Push a root
    ///
    /// # Errors
    /// `RootStackOverflow` when the stack is full; the stack is unchanged.
    pub fn push(&mut self, handle: Handle) -> Result<()> {
        if self.is_full() {
            return Err(GcError::RootStackOverflow {
                capacity: self.capacity,
            });
        }
        self.roots.push(handle);
        Ok(())
    }

    /// Pop the most recently pushed root
    ///
    /// # Errors
    /// `RootStackUnderflow` when the stack is empty.
    pub fn pop(&mut self) -> Result<Handle> {
        self.roots.pop().ok_or(GcError::RootStackUnderflow)
    }

    /// Most recently pushed root, without removing it
    pub fn peek(&self) -> Option<Handle> {
        self.roots.last().copied()
    }

    /// Root `depth` entries below the top (0 is the top)
    pub fn peek_at(&self, depth: usize) -> Option<Handle> {
        let len = self.roots.len();
        if depth >= len {
            return None;
        }
        self.roots.get(len - 1 - depth).copied()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.roots.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Roots from bottom to top
    pub fn as_slice(&self) -> &[Handle] {
        &self.roots
    }

    /// Iterate roots from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.roots.iter().copied()
    }
}
