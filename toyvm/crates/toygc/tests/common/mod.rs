//! Test Utilities for the toygc Test Suite
//!
//! Fixtures and strict assertion helpers shared by the integration tests.
//! Every helper fails loudly; none of them tolerate "close enough".

#![allow(dead_code)]

use toygc::{GcConfig, Handle, Heap, Value};

/// Threshold used by most fixtures
pub const TEST_THRESHOLD: usize = 8;

/// ============================================================================
/// HEAP FIXTURE
/// ============================================================================

/// Test fixture for heap operations
///
/// Provides a fresh heap per test plus shortcuts for building object graphs.
pub struct HeapFixture {
    pub heap: Heap,
    pub config: GcConfig,
}

impl HeapFixture {
    /// Create fixture with default configuration
    ///
    /// **Bug this finds:** Configuration validation bugs, initialization failures
    pub fn with_defaults() -> Self {
        Self::with_config(GcConfig::default())
    }

    /// Create fixture with a specific initial threshold
    pub fn with_threshold(threshold: usize) -> Self {
        Self::with_config(GcConfig::with_initial_threshold(threshold))
    }

    /// Create fixture with a hard object limit
    ///
    /// **Bug this finds:** Retry collection and OOM handling bugs
    pub fn with_object_limit(threshold: usize, max_objects: usize) -> Self {
        Self::with_config(GcConfig {
            initial_threshold: threshold,
            max_objects: Some(max_objects),
            ..Default::default()
        })
    }

    /// Create fixture with custom configuration
    pub fn with_config(config: GcConfig) -> Self {
        let heap = Heap::new(config.clone())
            .expect("heap initialization should succeed with valid config");
        Self { heap, config }
    }

    /// Allocate an unrooted scalar
    pub fn scalar(&mut self, value: i64) -> Handle {
        self.heap
            .allocate_scalar(value)
            .unwrap_or_else(|e| panic!("allocating scalar {} failed: {:?}", value, e))
    }

    /// Allocate an unrooted pair
    pub fn pair(&mut self, first: Handle, second: Handle) -> Handle {
        self.heap
            .allocate_pair(first, second)
            .unwrap_or_else(|e| panic!("allocating pair ({}, {}) failed: {:?}", first, second, e))
    }

    /// Allocate and root a scalar
    pub fn push(&mut self, value: i64) -> Handle {
        self.heap
            .push_scalar(value)
            .unwrap_or_else(|e| panic!("pushing scalar {} failed: {:?}", value, e))
    }

    /// Root an existing object
    pub fn root(&mut self, handle: Handle) {
        self.heap
            .push_root(handle)
            .unwrap_or_else(|e| panic!("rooting {} failed: {:?}", handle, e));
    }

    /// Build an unrooted chain of `len` pairs ending in a scalar
    ///
    /// Every pair's `second` edge points at the shared leaf scalar. Returns
    /// the head of the chain. Allocates `len + 1` objects.
    pub fn chain(&mut self, len: usize) -> Handle {
        let leaf = self.scalar(0);
        let mut tail = leaf;
        for _ in 0..len {
            tail = self.pair(tail, leaf);
        }
        tail
    }

    /// Collect and return the number of reclaimed objects
    pub fn collect(&mut self) -> usize {
        let stats = self.heap.collect();
        assert_heap_consistent(&self.heap, "after collect");
        stats.reclaimed
    }

    pub fn live(&self) -> usize {
        self.heap.live_object_count()
    }
}

/// ============================================================================
/// STRICT ASSERTION HELPERS
/// ============================================================================

/// Assert that every heap invariant holds
///
/// **Tolerance:** ZERO - any broken invariant is a bug
#[track_caller]
pub fn assert_heap_consistent(heap: &Heap, context: &str) {
    if let Err(e) = heap.verify() {
        panic!("{}: heap invariant broken: {}", context, e);
    }
}

/// Assert that `handle` is live and holds the given scalar
#[track_caller]
pub fn assert_scalar(heap: &Heap, handle: Handle, expected: i64, context: &str) {
    match heap.get(handle) {
        Ok(Value::Scalar(actual)) => assert_eq!(
            *actual, expected,
            "{}: {} holds {} but {} was expected",
            context, handle, actual, expected
        ),
        other => panic!("{}: {} should be scalar {}, got {:?}", context, handle, expected, other),
    }
}

/// Assert that every handle is still live
#[track_caller]
pub fn assert_all_live(heap: &Heap, handles: &[Handle], context: &str) {
    for handle in handles {
        assert!(
            heap.is_live(*handle),
            "{}: {} was reclaimed while still reachable",
            context,
            handle
        );
    }
}

/// Assert that every handle has been reclaimed
#[track_caller]
pub fn assert_all_reclaimed(heap: &Heap, handles: &[Handle], context: &str) {
    for handle in handles {
        assert!(
            !heap.is_live(*handle),
            "{}: {} survived although unreachable",
            context,
            handle
        );
    }
}
