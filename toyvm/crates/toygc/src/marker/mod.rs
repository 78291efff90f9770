//! Marker Module - Mark Phase
//!
//! Identifies which objects are still reachable from the roots.
//!
//! Marking Algorithm:
//! - Depth-first traversal from every root
//! - The per-object `marked` flag is the visited set, so cycles and shared
//!   substructure are traced once
//! - Explicit work stack instead of recursion
//!
//! The marker only sees the object table and a list of roots. It has no
//! path back to the allocator, so nothing can allocate mid-collection.

pub mod mark_stack;
pub mod roots;

pub use roots::RootStack;

use crate::heap::ObjectTable;
use crate::object::Handle;
use mark_stack::MarkStack;

/// Result of one mark phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MarkStats {
    /// Objects newly flagged as reached
    pub marked: usize,
    /// Handles popped off the work stack (including already-marked ones)
    pub visited: usize,
    /// Deepest the work stack got
    pub peak_depth: usize,
}

/// Marker - owns the mark work stack between cycles
#[derive(Debug, Default)]
pub(crate) struct Marker {
    stack: MarkStack,
}

impl Marker {
    pub(crate) fn new() -> Self {
        Self {
            stack: MarkStack::new(),
        }
    }

    /// Mark everything reachable from `roots`
    ///
    /// Roots may repeat; repeated visits cost one flag check.
    pub(crate) fn mark_all<I>(&mut self, objects: &mut ObjectTable, roots: I) -> MarkStats
    where
        I: IntoIterator<Item = Handle>,
    {
        self.stack.reset();
        let mut stats = MarkStats::default();

        for root in roots {
            self.mark(objects, root, &mut stats);
        }

        debug_assert!(self.stack.is_empty());
        stats.peak_depth = self.stack.high_water();
        log::trace!(
            "mark: {} marked, {} visited, {} enqueued, peak depth {}",
            stats.marked,
            stats.visited,
            self.stack.enqueued(),
            stats.peak_depth
        );
        stats
    }

    /// Mark `root` and everything reachable from it
    fn mark(&mut self, objects: &mut ObjectTable, root: Handle, stats: &mut MarkStats) {
        self.stack.push(root);

        while let Some(handle) = self.stack.pop() {
            stats.visited += 1;

            let object = match objects.resolve_mut(handle) {
                Ok(object) => object,
                Err(e) => {
                    // Live objects only ever point at live objects.
                    log::error!("mark: skipping unresolvable edge: {}", e);
                    continue;
                },
            };

            if object.marked {
                continue;
            }
            object.marked = true;
            stats.marked += 1;

            for edge in object.value.edges() {
                self.stack.push(edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Value;

    fn is_marked(objects: &ObjectTable, handle: Handle) -> bool {
        objects.resolve(handle).unwrap().marked
    }

    #[test]
    fn test_marks_transitively() {
        let mut objects = ObjectTable::new();
        let a = objects.insert(Value::scalar(1)).unwrap();
        let b = objects.insert(Value::scalar(2)).unwrap();
        let pair = objects.insert(Value::pair(a, b)).unwrap();
        let lonely = objects.insert(Value::scalar(3)).unwrap();

        let stats = Marker::new().mark_all(&mut objects, [pair]);

        assert_eq!(stats.marked, 3);
        assert!(is_marked(&objects, pair));
        assert!(is_marked(&objects, a));
        assert!(is_marked(&objects, b));
        assert!(!is_marked(&objects, lonely));
    }

    #[test]
    fn test_self_cycle_terminates() {
        let mut objects = ObjectTable::new();
        let a = objects.insert(Value::scalar(1)).unwrap();
        let pair = objects.insert(Value::pair(a, a)).unwrap();
        objects.resolve_mut(pair).unwrap().value = Value::pair(pair, pair);

        let stats = Marker::new().mark_all(&mut objects, [pair]);

        assert_eq!(stats.marked, 1);
        assert!(!is_marked(&objects, a));
    }

    #[test]
    fn test_repeated_roots_marked_once() {
        let mut objects = ObjectTable::new();
        let a = objects.insert(Value::scalar(1)).unwrap();

        let stats = Marker::new().mark_all(&mut objects, [a, a, a]);

        assert_eq!(stats.marked, 1);
        assert_eq!(stats.visited, 3);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut objects = ObjectTable::new();
        let leaf = objects.insert(Value::scalar(0)).unwrap();
        let mut tail = leaf;
        for _ in 0..100_000 {
            tail = objects.insert(Value::pair(tail, leaf)).unwrap();
        }

        let stats = Marker::new().mark_all(&mut objects, [tail]);

        assert_eq!(stats.marked, 100_001);
        assert!(stats.peak_depth <= 3);
    }
}
