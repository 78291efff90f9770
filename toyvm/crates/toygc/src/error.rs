//! Error Module - toygc Error Types
//!
//! Defines all error types returned by heap operations.
//!
//! # Error Categories
//!
//! ## Root Stack Errors
//! - `RootStackOverflow` - Push beyond root stack capacity
//! - `RootStackUnderflow` - Pop from an empty root stack
//!
//! ## Memory Errors
//! - `OutOfMemory` - Hard object limit reached even after a collection
//!
//! ## Handle Errors
//! - `InvalidHandle` - Handle never issued by this heap
//! - `StaleHandle` - Handle whose object has been reclaimed
//! - `TypeMismatch` - Operation expected a different object kind
//!
//! ## Configuration and Internal Errors
//! - `Configuration` - Invalid `GcConfig`
//! - `Internal` - Broken heap invariant (a bug)

use crate::config::ConfigError;
use crate::object::{Handle, ObjectKind};
use thiserror::Error;

/// Main error type for all toygc operations
///
/// No error rolls back earlier work: a failed operation simply has no
/// effect on the heap or the root stack.
///
/// # Examples
///
/// ```rust
/// use toygc::{GcError, Heap};
///
/// let mut heap = Heap::with_threshold(8).unwrap();
/// match heap.pop_root() {
///     Err(GcError::RootStackUnderflow) => {}
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Error)]
pub enum GcError {
    /// Root stack is full
    ///
    /// **When returned:** `push_root` / `push_scalar` with `capacity` roots
    /// already pushed.
    ///
    /// **Recovery strategy:** Pop roots the program no longer holds.
    #[error("Root stack overflow: capacity of {capacity} roots exceeded")]
    RootStackOverflow { capacity: usize },

    /// Root stack is empty
    ///
    /// **When returned:** `pop_root` on an empty stack, or `push_pair` with
    /// fewer than two roots.
    #[error("Root stack underflow")]
    RootStackUnderflow,

    /// Out of memory - object limit reached
    ///
    /// **When returned:** `max_objects` is configured and the live set
    /// still fills it after one retry collection.
    ///
    /// **Recovery strategy:** None. Treat as fatal.
    #[error("Out of memory: {live} live objects, limit is {limit}")]
    OutOfMemory { live: usize, limit: usize },

    /// Handle was never issued by this heap
    #[error("Invalid handle {handle}")]
    InvalidHandle { handle: Handle },

    /// Handle refers to an object that has been reclaimed
    ///
    /// **When returned:** The slot behind the handle was swept (and maybe
    /// reused by a newer object).
    #[error("Stale handle {handle}: object was reclaimed")]
    StaleHandle { handle: Handle },

    /// Object kind mismatch
    ///
    /// **Example scenario:** `set_first` on a scalar.
    #[error("Type mismatch for {handle}: expected {expected}, found {found}")]
    TypeMismatch {
        handle: Handle,
        expected: ObjectKind,
        found: ObjectKind,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Internal error - indicates a bug in toygc
    ///
    /// **When returned:** `Heap::verify` found a broken invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GcError {
    /// Check if this error is fatal for the embedding program
    pub fn is_fatal(&self) -> bool {
        matches!(self, GcError::OutOfMemory { .. } | GcError::Internal(_))
    }

    /// Check if this error is recoverable by the caller
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GcError::RootStackOverflow { .. } | GcError::RootStackUnderflow
        )
    }

    /// Check if this error indicates a bug in the code
    pub fn is_bug(&self) -> bool {
        matches!(self, GcError::Internal(_))
    }
}

/// Result type alias for toygc operations
pub type Result<T> = std::result::Result<T, GcError>;
