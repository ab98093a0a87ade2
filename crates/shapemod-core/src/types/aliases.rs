//! Type aliases for commonly used types.
//!
//! Gives meaningful names to the identifier and shared-state types that cross
//! crate boundaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shapemod_core::types::*;
//!
//! // Instead of: Arc<Mutex<HashMap<u64, Geometry>>>
//! let cache: ThreadSafe<HashMap<u64, Geometry>> = thread_safe(HashMap::new());
//! ```

use parking_lot::Mutex;
use std::sync::Arc;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Host-assigned shape identifier, e.g. `shape:3f2a...`.
pub type ShapeId = String;

/// Modifier identifier as stored in the host's modifier list.
pub type ModifierId = String;

// =============================================================================
// THREAD-SAFE SHARED TYPES (Arc<Mutex<T>>)
// =============================================================================

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex` for better performance than `std::sync::Mutex`.
///
/// # Example
/// ```rust,ignore
/// let cache: ThreadSafe<CacheState> = thread_safe(CacheState::default());
/// cache.lock().clear();
/// ```
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Create a new `ThreadSafe<T>` from a value.
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
