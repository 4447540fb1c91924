//! Session pooling layer.
//!
//! Protocol sessions are expensive to open and serve one operation at a
//! time, so each host keeps a small pool of them.
//!
//! # Session Lifecycle
//!
//! 1. `ConnectionPool::acquire` - Reuse a free session or open a new one
//! 2. `PooledSession::{add, update, query, remove}` - One protocol call
//! 3. `ConnectionPool::release` (or drop) - Mark the session free again
//! 4. Eviction - Free sessions past the idle TTL or over capacity are closed
//!
//! A handle dropped mid-call never returns to the pool; its session is
//! removed and closed.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `pool` | Per-host pool with acquire/release and eviction |
//! | `session` | Session and its RAII handle |

// ============================================================================
// Submodules
// ============================================================================

/// Per-host session pool.
pub mod pool;

/// Pooled sessions.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use pool::{ConnectionPool, PoolStats};
pub use session::{PooledSession, Session};
