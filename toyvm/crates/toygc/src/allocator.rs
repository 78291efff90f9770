//! Allocator - Object Materialization
//!
//! Turns a `Value` description into a registered heap object and enforces
//! the optional hard object limit. The decision to collect before
//! allocating belongs to the heap controller; the allocator only answers
//! whether there is room and performs the insertion.

use crate::error::Result;
use crate::heap::ObjectTable;
use crate::object::{Handle, Value};

/// Allocator - object limit and allocation counters
#[derive(Debug)]
pub(crate) struct Allocator {
    /// Hard cap on live objects, if any
    limit: Option<usize>,
    /// Objects created over the heap's lifetime
    total_allocated: u64,
}

impl Allocator {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            total_allocated: 0,
        }
    }

    pub(crate) fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether one more object fits under the limit
    pub(crate) fn has_room(&self, live: usize) -> bool {
        match self.limit {
            Some(limit) => live < limit,
            None => true,
        }
    }

    /// Create the object and prepend it to the registry
    pub(crate) fn materialize(&mut self, objects: &mut ObjectTable, value: Value) -> Result<Handle> {
        let handle = objects.insert(value)?;
        self.total_allocated += 1;
        Ok(handle)
    }

    pub(crate) fn total_allocated(&self) -> u64 {
        self.total_allocated
    }
}
