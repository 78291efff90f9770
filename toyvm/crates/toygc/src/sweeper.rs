//! Sweeper - Sweep Phase
//!
//! One forward pass over the registry:
//! - unreached objects are unlinked and their slots reclaimed
//! - reached objects have their mark cleared for the next cycle
//!
//! The successor link is read before an object is released, so removing
//! the current object never skips or revisits the next one.

use crate::heap::ObjectTable;

/// Result of one sweep phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SweepStats {
    pub reclaimed: usize,
    pub survivors: usize,
}

/// Sweep the registry of `objects`
pub(crate) fn sweep(objects: &mut ObjectTable) -> SweepStats {
    let mut stats = SweepStats::default();
    let mut prev: Option<u32> = None;
    let mut cursor = objects.head();

    while let Some(index) = cursor {
        let (reached, next) = match objects.object_at_mut(index) {
            Some(object) => {
                let reached = object.marked;
                object.marked = false;
                (reached, object.next)
            },
            None => {
                log::error!("sweep: registry links to empty slot {}", index);
                objects.relink(prev, None);
                break;
            },
        };

        if reached {
            stats.survivors += 1;
            prev = Some(index);
        } else {
            objects.relink(prev, next);
            if let Some(value) = objects.release(index) {
                log::trace!("sweep: reclaimed slot {} ({})", index, value.kind());
            }
            stats.reclaimed += 1;
        }

        cursor = next;
    }

    stats
}
