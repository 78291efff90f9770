//! Mark Stack - Work List for Marking
//!
//! Marking walks the object graph with an explicit stack of pending
//! handles instead of native recursion, so a long chain of pairs cannot
//! exhaust the thread stack. The buffer is kept between cycles to avoid
//! reallocating on every collection.

use crate::object::Handle;

/// MarkStack - LIFO work list of handles waiting to be traced
#[derive(Debug, Default)]
pub(crate) struct MarkStack {
    pending: Vec<Handle>,
    /// Pushes since the last reset
    enqueued: usize,
    /// Deepest the stack got since the last reset
    high_water: usize,
}

impl MarkStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn push(&mut self, handle: Handle) {
        self.pending.push(handle);
        self.enqueued += 1;
        self.high_water = self.high_water.max(self.pending.len());
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Handle> {
        self.pending.pop()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn enqueued(&self) -> usize {
        self.enqueued
    }

    pub(crate) fn high_water(&self) -> usize {
        self.high_water
    }

    /// Clear counters and pending work, keeping the allocation
    pub(crate) fn reset(&mut self) {
        self.pending.clear();
        self.enqueued = 0;
        self.high_water = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_and_counters() {
        let mut stack = MarkStack::new();
        stack.push(Handle::new(1, 0));
        stack.push(Handle::new(2, 0));
        assert_eq!(stack.pop(), Some(Handle::new(2, 0)));
        stack.push(Handle::new(3, 0));

        assert_eq!(stack.enqueued(), 3);
        assert_eq!(stack.high_water(), 2);

        stack.reset();
        assert!(stack.is_empty());
        assert_eq!(stack.enqueued(), 0);
        assert_eq!(stack.high_water(), 0);
    }
}
