//! Seam to the device management protocol.
//!
//! The binary protocol itself (framing, login, sentence encoding) lives
//! outside this crate. This module defines what the pool and adapters need
//! from it.
//!
//! # Primitives
//!
//! | Verb | Primitive | Method |
//! |------|-----------|--------|
//! | create | `add` | [`ApiConnection::add`] |
//! | update | `set` | [`ApiConnection::update`] |
//! | list | `print` | [`ApiConnection::query`] |
//! | delete | `remove` | [`ApiConnection::remove`] |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | [`Connector`] and [`ApiConnection`] traits |
//! | `query` | Query model and row types |

// ============================================================================
// Submodules
// ============================================================================

/// Connector and connection traits.
pub mod connection;

/// Query model.
pub mod query;

/// In-memory protocol used by unit tests.
#[cfg(test)]
pub(crate) mod fake;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{ApiConnection, ConnectOptions, Connector};
pub use query::{Attributes, ID_FIELD, Predicate, Query, Row};
