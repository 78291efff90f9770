//! GC Core Module - Heap and Collection Cycle Management
//!
//! `Heap` is the collector instance: it owns the object table, the root
//! stack, the threshold policy and the statistics, and it is the only
//! component that runs the mark and sweep phases.
//!
//! # Cycle
//!
//! ```text
//!   Idle ──(allocation reaches threshold / collect())──▶ Marking
//!     ▲                                                    │
//!     └──────────── threshold = f(live) ◀── Sweeping ◀─────┘
//! ```
//!
//! A cycle runs to completion inside a single `&mut self` call. Mark and
//! sweep never see the heap itself, so no allocation can happen while a
//! cycle is in progress.

use crate::allocator::Allocator;
use crate::config::GcConfig;
use crate::error::{GcError, Result};
use crate::heap::ObjectTable;
use crate::logging::{GcEvent, GcLogger};
use crate::marker::{Marker, RootStack};
use crate::object::{Handle, ObjectKind, Value};
use crate::policy::ThresholdPolicy;
use crate::stats::{CycleStats, GcStats, GcSummary, GcTimer};
use crate::sweeper;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// GC cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GcState {
    /// Idle - no GC in progress
    Idle,
    /// Marking phase - flagging reachable objects
    Marking,
    /// Sweeping phase - reclaiming unflagged objects
    Sweeping,
}

impl fmt::Display for GcState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcState::Idle => write!(f, "idle"),
            GcState::Marking => write!(f, "marking"),
            GcState::Sweeping => write!(f, "sweeping"),
        }
    }
}

/// Reason for GC trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GcReason {
    /// Live count reached the trigger threshold
    Threshold { live: usize, threshold: usize },
    /// Explicit `collect()` call
    Explicit,
    /// Retry after reaching the hard object limit
    AllocationFailure { live: usize, limit: usize },
}

impl fmt::Display for GcReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcReason::Threshold { live, threshold } => {
                write!(f, "threshold ({}/{})", live, threshold)
            },
            GcReason::Explicit => write!(f, "explicit"),
            GcReason::AllocationFailure { live, limit } => {
                write!(f, "allocation failure ({}/{})", live, limit)
            },
        }
    }
}

/// Which edge of a pair to update
#[derive(Debug, Clone, Copy)]
enum Edge {
    First,
    Second,
}

/// Heap - a mark-sweep collected heap of scalars and pairs
///
/// # Examples
///
/// ```rust
/// use toygc::Heap;
///
/// let mut heap = Heap::with_threshold(8)?;
/// heap.push_scalar(1)?;
/// heap.push_scalar(2)?;
/// let pair = heap.push_pair()?;
///
/// heap.collect();
/// assert_eq!(heap.live_object_count(), 3);
///
/// heap.pop_root()?;
/// heap.collect();
/// assert_eq!(heap.live_object_count(), 0);
/// assert!(!heap.is_live(pair));
/// # Ok::<(), toygc::GcError>(())
/// ```
#[derive(Debug)]
pub struct Heap {
    /// Arena and registry
    objects: ObjectTable,

    /// Values the embedding program holds directly
    roots: RootStack,

    /// Mark phase work stack
    marker: Marker,

    /// Object limit and allocation counters
    allocator: Allocator,

    /// Threshold policy
    policy: ThresholdPolicy,

    /// Live count at which the next allocation collects
    threshold: usize,

    /// Current GC state
    state: GcState,

    /// GC cycle counter
    cycle_count: u64,

    /// Statistics collector
    stats: GcStats,

    /// GC event history
    logger: GcLogger,

    /// GC configuration
    config: GcConfig,
}

impl Heap {
    /// Create a new heap with the specified configuration
    ///
    /// # Errors
    /// `Configuration` if the configuration does not validate.
    pub fn new(config: GcConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Create a heap with default configuration and the given initial threshold
    pub fn with_threshold(initial_threshold: usize) -> Result<Self> {
        Self::new(GcConfig::with_initial_threshold(initial_threshold))
    }

    fn from_validated(config: GcConfig) -> Self {
        let policy = ThresholdPolicy::from_config(&config);

        Self {
            objects: ObjectTable::new(),
            roots: RootStack::new(config.root_capacity),
            marker: Marker::new(),
            allocator: Allocator::new(config.max_objects),
            threshold: policy.initial(),
            policy,
            state: GcState::Idle,
            cycle_count: 0,
            stats: GcStats::new(),
            logger: GcLogger::new(config.event_format, config.verbose, config.event_history),
            config,
        }
    }

    // ------------------------------------------------------------------
    // Roots
    // ------------------------------------------------------------------

    /// Push a root
    ///
    /// # Errors
    /// - `StaleHandle` / `InvalidHandle` if `handle` does not name a live object
    /// - `RootStackOverflow` if the root stack is full
    pub fn push_root(&mut self, handle: Handle) -> Result<()> {
        self.objects.resolve(handle)?;
        self.roots.push(handle)
    }

    /// Pop the most recently pushed root
    ///
    /// The value stays allocated until a collection finds it unreachable.
    pub fn pop_root(&mut self) -> Result<Handle> {
        self.roots.pop()
    }

    /// Most recently pushed root
    pub fn peek_root(&self) -> Option<Handle> {
        self.roots.peek()
    }

    /// The root stack
    pub fn roots(&self) -> &RootStack {
        &self.roots
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Allocate a heap value
    ///
    /// Collects first when the live count has reached the threshold. A
    /// pair's edges are treated as roots for that collection, so the
    /// operands survive even if the caller has not rooted them.
    ///
    /// # Errors
    /// - `StaleHandle` / `InvalidHandle` for a bad pair edge (nothing allocated)
    /// - `OutOfMemory` when `max_objects` is still full after one collection
    pub fn allocate(&mut self, value: Value) -> Result<Handle> {
        for edge in value.edges() {
            self.objects.resolve(edge)?;
        }

        let mut collected = false;
        let live = self.objects.live();
        if self.policy.should_collect(live, self.threshold) {
            let reason = GcReason::Threshold {
                live,
                threshold: self.threshold,
            };
            self.collect_with(reason, value.edges());
            collected = true;
        }

        if !self.allocator.has_room(self.objects.live()) {
            let limit = self.allocator.limit().unwrap_or(usize::MAX);
            if !collected {
                let reason = GcReason::AllocationFailure {
                    live: self.objects.live(),
                    limit,
                };
                self.collect_with(reason, value.edges());
            }

            let live = self.objects.live();
            let recovered = self.allocator.has_room(live);
            self.logger.log(GcEvent::AllocationFailure {
                live,
                limit,
                recovered,
            });
            if !recovered {
                return Err(GcError::OutOfMemory { live, limit });
            }
        }

        let handle = self.allocator.materialize(&mut self.objects, value)?;
        if self.config.stats_enabled {
            self.stats.record_live(self.objects.live());
        }
        Ok(handle)
    }

    /// Allocate a scalar
    pub fn allocate_scalar(&mut self, value: i64) -> Result<Handle> {
        self.allocate(Value::scalar(value))
    }

    /// Allocate a pair of existing values
    pub fn allocate_pair(&mut self, first: Handle, second: Handle) -> Result<Handle> {
        self.allocate(Value::pair(first, second))
    }

    /// Allocate a scalar and push it as a root
    ///
    /// Checks for room on the root stack before allocating, so an
    /// overflow leaves the heap untouched.
    pub fn push_scalar(&mut self, value: i64) -> Result<Handle> {
        if self.roots.is_full() {
            return Err(GcError::RootStackOverflow {
                capacity: self.roots.capacity(),
            });
        }
        let handle = self.allocate_scalar(value)?;
        self.roots.push(handle)?;
        Ok(handle)
    }

    /// Pair the two topmost roots, replacing them with the pair
    ///
    /// The top root becomes `first`, the one beneath it `second`. Both stay
    /// rooted while the pair is allocated.
    ///
    /// # Errors
    /// `RootStackUnderflow` if fewer than two roots exist; nothing changes.
    pub fn push_pair(&mut self) -> Result<Handle> {
        let first = self.roots.peek_at(0).ok_or(GcError::RootStackUnderflow)?;
        let second = self.roots.peek_at(1).ok_or(GcError::RootStackUnderflow)?;

        let pair = self.allocate_pair(first, second)?;

        self.roots.pop()?;
        self.roots.pop()?;
        self.roots.push(pair)?;
        Ok(pair)
    }

    /// Point a pair's `first` edge at `target`
    pub fn set_first(&mut self, pair: Handle, target: Handle) -> Result<()> {
        self.set_edge(pair, target, Edge::First)
    }

    /// Point a pair's `second` edge at `target`
    pub fn set_second(&mut self, pair: Handle, target: Handle) -> Result<()> {
        self.set_edge(pair, target, Edge::Second)
    }

    fn set_edge(&mut self, pair: Handle, target: Handle, edge: Edge) -> Result<()> {
        self.objects.resolve(target)?;
        let object = self.objects.resolve_mut(pair)?;
        match &mut object.value {
            Value::Pair { first, second } => {
                match edge {
                    Edge::First => *first = target,
                    Edge::Second => *second = target,
                }
                Ok(())
            },
            Value::Scalar(_) => Err(GcError::TypeMismatch {
                handle: pair,
                expected: ObjectKind::Pair,
                found: ObjectKind::Scalar,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Run a full mark-sweep cycle now
    ///
    /// Always runs to completion; returns what the cycle did.
    pub fn collect(&mut self) -> CycleStats {
        self.collect_with(GcReason::Explicit, std::iter::empty())
    }

    /// Mark from the roots plus `pinned`, sweep, then move the threshold
    fn collect_with<I>(&mut self, reason: GcReason, pinned: I) -> CycleStats
    where
        I: IntoIterator<Item = Handle>,
    {
        self.cycle_count += 1;
        let cycle = self.cycle_count;
        let live_before = self.objects.live();
        let threshold_before = self.threshold;

        self.logger.log(GcEvent::CycleStart {
            cycle,
            reason: reason.to_string(),
            live: live_before,
            threshold: threshold_before,
        });

        let total = GcTimer::new();
        let mut phase = GcTimer::new();

        // Phase 1: Marking
        self.state = GcState::Marking;
        let mark = self
            .marker
            .mark_all(&mut self.objects, self.roots.iter().chain(pinned));
        let mark_ns = phase.lap_ns();
        self.logger.log(GcEvent::PhaseEnd {
            cycle,
            phase: "mark".to_string(),
            duration_us: mark_ns / 1_000,
        });

        // Phase 2: Sweeping
        self.state = GcState::Sweeping;
        let sweep = sweeper::sweep(&mut self.objects);
        let sweep_ns = phase.lap_ns();
        self.logger.log(GcEvent::PhaseEnd {
            cycle,
            phase: "sweep".to_string(),
            duration_us: sweep_ns / 1_000,
        });

        // Final state
        let live_after = self.objects.live();
        debug_assert_eq!(sweep.survivors, live_after);
        self.threshold = self.policy.next_threshold(live_after);
        self.state = GcState::Idle;

        if self.threshold != threshold_before {
            self.logger.log(GcEvent::ThresholdAdjusted {
                old: threshold_before,
                new: self.threshold,
            });
        }

        let total_ns = total.elapsed_ns();
        let cycle_stats = CycleStats {
            cycle,
            reason,
            live_before,
            live_after,
            marked: mark.marked,
            reclaimed: sweep.reclaimed,
            threshold_before,
            threshold_after: self.threshold,
            mark_ns,
            sweep_ns,
            total_ns,
            peak_mark_depth: mark.peak_depth,
        };

        self.logger.log(GcEvent::CycleEnd {
            cycle,
            marked: mark.marked,
            reclaimed: sweep.reclaimed,
            live: live_after,
            duration_us: total_ns / 1_000,
        });

        if self.config.stats_enabled {
            self.stats.record_cycle(&cycle_stats);
        }

        cycle_stats
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Number of live objects
    pub fn live_object_count(&self) -> usize {
        self.objects.live()
    }

    /// Live count at which the next allocation collects
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Get current GC state
    pub fn state(&self) -> GcState {
        self.state
    }

    /// Get total GC cycles executed
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Read a live value
    pub fn get(&self, handle: Handle) -> Result<&Value> {
        Ok(&self.objects.resolve(handle)?.value)
    }

    /// Whether `handle` still names a live object
    pub fn is_live(&self, handle: Handle) -> bool {
        self.objects.resolve(handle).is_ok()
    }

    /// Read the collector's scratch mark of a live object
    ///
    /// Always false outside a collection.
    pub fn is_marked(&self, handle: Handle) -> Result<bool> {
        Ok(self.objects.resolve(handle)?.marked)
    }

    /// All live objects, newest first
    pub fn objects(&self) -> impl Iterator<Item = (Handle, &Value)> {
        self.objects.iter().map(|(handle, object)| (handle, &object.value))
    }

    /// Get GC statistics
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Summary statistics
    pub fn summary(&self) -> GcSummary {
        self.stats.summary(
            self.allocator.total_allocated(),
            self.objects.live(),
            self.threshold,
        )
    }

    /// Retained GC events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &GcEvent> {
        self.logger.events()
    }

    /// Get detailed diagnostic information
    pub fn diagnostics(&self) -> IndexMap<String, String> {
        let mut diagnostics = IndexMap::new();

        diagnostics.insert("state".to_string(), self.state.to_string());
        diagnostics.insert("cycle_count".to_string(), self.cycle_count.to_string());
        diagnostics.insert("live_objects".to_string(), self.objects.live().to_string());
        diagnostics.insert("threshold".to_string(), self.threshold.to_string());
        diagnostics.insert(
            "max_objects".to_string(),
            self.allocator
                .limit()
                .map_or_else(|| "unbounded".to_string(), |limit| limit.to_string()),
        );
        diagnostics.insert(
            "roots".to_string(),
            format!("{}/{}", self.roots.len(), self.roots.capacity()),
        );
        diagnostics.insert("slots".to_string(), self.objects.slot_count().to_string());
        diagnostics.insert("free_slots".to_string(), self.objects.free_count().to_string());
        diagnostics.insert(
            "total_allocated".to_string(),
            self.allocator.total_allocated().to_string(),
        );
        diagnostics.insert(
            "total_reclaimed".to_string(),
            self.stats.total_reclaimed().to_string(),
        );

        diagnostics
    }

    /// Check heap invariants
    ///
    /// Walks the whole heap; meant for tests and debugging.
    ///
    /// # Errors
    /// `Internal` describing the first broken invariant.
    pub fn verify(&self) -> Result<()> {
        if self.state != GcState::Idle {
            return Err(GcError::Internal(format!(
                "heap is {} outside a collection",
                self.state
            )));
        }

        let slots = self.objects.slot_count();
        let mut registry_len = 0usize;
        for (handle, object) in self.objects.iter() {
            registry_len += 1;
            if registry_len > slots {
                return Err(GcError::Internal("registry contains a loop".to_string()));
            }
            if object.marked {
                return Err(GcError::Internal(format!(
                    "{} still marked after collection",
                    handle
                )));
            }
            for edge in object.value.edges() {
                if self.objects.resolve(edge).is_err() {
                    return Err(GcError::Internal(format!(
                        "{} points at dead object {}",
                        handle, edge
                    )));
                }
            }
        }

        let live = self.objects.live();
        if registry_len != live {
            return Err(GcError::Internal(format!(
                "registry holds {} objects, live count is {}",
                registry_len, live
            )));
        }
        if self.objects.occupied_slots() != live {
            return Err(GcError::Internal(format!(
                "{} occupied slots, live count is {}",
                self.objects.occupied_slots(),
                live
            )));
        }
        if live + self.objects.free_count() != slots {
            return Err(GcError::Internal(format!(
                "{} live + {} free != {} slots",
                live,
                self.objects.free_count(),
                slots
            )));
        }

        for root in self.roots.iter() {
            if self.objects.resolve(root).is_err() {
                return Err(GcError::Internal(format!("root {} is dead", root)));
            }
        }

        Ok(())
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::from_validated(GcConfig::default())
    }
}
