//! Heap Module - Object Table and Registry
//!
//! The object table is an index-based arena owning every heap value.
//! Handles are `(index, generation)` pairs into it.
//!
//! # Registry
//!
//! Live objects are additionally threaded into a singly-linked list
//! through the table (`HeapObject::next`), newest first:
//!
//! ```text
//!  head
//!   │
//!   ▼
//! ┌─────┐    ┌─────┐    ┌─────┐
//! │  5  │───▶│  2  │───▶│  0  │───▶ None
//! └─────┘    └─────┘    └─────┘
//! ```
//!
//! Insertion prepends in O(1). The sweeper unlinks in O(1) per object by
//! carrying the previous index through a single forward pass.
//!
//! # Slot Reuse
//!
//! Reclaiming an object empties its slot, bumps the slot generation and
//! pushes the index on a free list. Handles issued for the old object no
//! longer match the slot and resolve to `StaleHandle`.

use crate::error::{GcError, Result};
use crate::object::{Handle, HeapObject, Value};

/// One arena slot
#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<HeapObject>,
}

/// ObjectTable - arena plus intrusive registry
#[derive(Debug, Default)]
pub(crate) struct ObjectTable {
    slots: Vec<Slot>,
    /// Indices of empty slots, reused LIFO
    free: Vec<u32>,
    /// First object of the registry
    head: Option<u32>,
    /// Number of objects in the registry
    live: usize,
}

impl ObjectTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of live objects
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Number of slots ever created (live + free)
    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots waiting for reuse
    #[inline]
    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<u32> {
        self.head
    }

    /// Materialize a value and prepend it to the registry
    ///
    /// Fails only when the table has run out of addressable slots.
    pub(crate) fn insert(&mut self, value: Value) -> Result<Handle> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| GcError::OutOfMemory {
                    live: self.live,
                    limit: u32::MAX as usize,
                })?;
                self.slots.push(Slot {
                    generation: 0,
                    object: None,
                });
                index
            },
        };

        let head = self.head;
        let slot = &mut self.slots[index as usize];
        slot.object = Some(HeapObject::new(value, head));
        let handle = Handle::new(index, slot.generation);

        self.head = Some(index);
        self.live += 1;

        log::trace!("insert {} ({})", handle, value.kind());
        Ok(handle)
    }

    /// Resolve a handle to its object
    pub(crate) fn resolve(&self, handle: Handle) -> Result<&HeapObject> {
        let slot = self.check(handle)?;
        slot.object
            .as_ref()
            .ok_or(GcError::StaleHandle { handle })
    }

    /// Resolve a handle to its object, mutably
    pub(crate) fn resolve_mut(&mut self, handle: Handle) -> Result<&mut HeapObject> {
        self.check(handle)?;
        self.object_at_mut(handle.slot())
            .ok_or(GcError::StaleHandle { handle })
    }

    fn check(&self, handle: Handle) -> Result<&Slot> {
        let slot = self
            .slots
            .get(handle.index())
            .ok_or(GcError::InvalidHandle { handle })?;

        if handle.generation() > slot.generation {
            return Err(GcError::InvalidHandle { handle });
        }
        if handle.generation() != slot.generation {
            return Err(GcError::StaleHandle { handle });
        }
        Ok(slot)
    }

    /// Object stored at a raw slot index
    pub(crate) fn object_at_mut(&mut self, index: u32) -> Option<&mut HeapObject> {
        self.slots
            .get_mut(index as usize)
            .and_then(|slot| slot.object.as_mut())
    }

    /// Point the link that preceded a removed object at its successor
    ///
    /// `prev == None` means the removed object was the registry head.
    pub(crate) fn relink(&mut self, prev: Option<u32>, next: Option<u32>) {
        match prev {
            None => self.head = next,
            Some(prev) => {
                if let Some(object) = self.object_at_mut(prev) {
                    object.next = next;
                }
            },
        }
    }

    /// Reclaim the object at `index`
    ///
    /// The caller must already have unlinked it from the registry.
    pub(crate) fn release(&mut self, index: u32) -> Option<Value> {
        let slot = self.slots.get_mut(index as usize)?;
        let object = slot.object.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;

        Some(object.value)
    }

    /// Walk the registry, newest object first
    pub(crate) fn iter(&self) -> RegistryIter<'_> {
        RegistryIter {
            table: self,
            cursor: self.head,
        }
    }

    /// Number of occupied slots, counted without the registry
    pub(crate) fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.object.is_some()).count()
    }
}

/// Iterator over the registry
pub(crate) struct RegistryIter<'a> {
    table: &'a ObjectTable,
    cursor: Option<u32>,
}

impl<'a> Iterator for RegistryIter<'a> {
    type Item = (Handle, &'a HeapObject);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = self.table.slots.get(index as usize)?;
        let object = slot.object.as_ref()?;

        self.cursor = object.next;
        Some((Handle::new(index, slot.generation), object))
    }
}
