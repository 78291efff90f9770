//! # toygc - Mark-Sweep Garbage Collector for a Toy Stack Machine
//!
//! toygc manages a heap of two kinds of values, integer scalars and pairs of
//! references, on behalf of a small stack machine. Anything reachable from
//! the root stack survives a collection; everything else, cycles included,
//! is reclaimed.
//!
//! ## Quick Start
//!
//! ```rust
//! use toygc::{GcConfig, Heap, Value};
//!
//! fn main() -> Result<(), toygc::GcError> {
//!     let mut heap = Heap::new(GcConfig::default())?;
//!
//!     // Allocate and root two scalars, then pair them
//!     heap.push_scalar(1)?;
//!     heap.push_scalar(2)?;
//!     let pair = heap.push_pair()?;
//!
//!     let stats = heap.collect();
//!     assert_eq!(stats.reclaimed, 0);
//!     assert!(matches!(heap.get(pair)?, Value::Pair { .. }));
//!
//!     // Dropping the only root makes all three objects garbage
//!     heap.pop_root()?;
//!     heap.collect();
//!     assert_eq!(heap.live_object_count(), 0);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────── Heap ─────────────────────────┐
//! │                                                        │
//! │   RootStack ──┐                                        │
//! │               ▼                                        │
//! │   Marker (explicit work stack) ──▶ ObjectTable         │
//! │                                     ├─ slots + generations
//! │   Sweeper (one registry pass) ────▶ ├─ registry (newest first)
//! │                                     └─ free list       │
//! │   ThresholdPolicy ◀── live count after each sweep      │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Objects are addressed by [`Handle`]s: a slot index plus the generation
//! the slot had when the object was created. A handle to a reclaimed object
//! is reported as [`GcError::StaleHandle`] rather than aliasing whatever
//! reuses the slot.
//!
//! ## Collection Triggers
//!
//! - Allocation when the live count has reached the threshold
//! - [`Heap::collect`]
//! - Allocation at the `max_objects` limit (one retry, then `OutOfMemory`)
//!
//! After each cycle the threshold becomes `live * growth_factor`, floored at
//! the initial threshold unless `floor_at_initial` is turned off.
//!
//! ## Modules
//!
//! - [`config`]: GC configuration parameters and validation
//! - [`error`]: Error types for all heap operations
//! - [`gc`]: The heap and its collection cycle
//! - [`logging`]: Structured GC events
//! - [`marker`]: Root stack and mark phase
//! - [`object`]: Handles and heap values
//! - [`policy`]: Collection threshold policy
//! - [`stats`]: Cycle and lifetime statistics

// Core GC modules
pub mod config;
pub mod error;
pub mod gc;

// Object storage
pub mod object;
pub(crate) mod allocator;
pub(crate) mod heap;

// GC algorithm components
pub mod marker;
pub mod policy;
pub(crate) mod sweeper;

// Monitoring
pub mod logging;
pub mod stats;

// Re-export main types for convenience
pub use config::{EventFormat, GcConfig};
pub use error::{GcError, Result};
pub use gc::{GcReason, GcState, Heap};
pub use logging::{GcEvent, GcLogger};
pub use marker::RootStack;
pub use object::{Handle, ObjectKind, Value};
pub use policy::ThresholdPolicy;
pub use stats::{CycleStats, GcStats, GcSummary};

/// toygc version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
