//! Request routing.
//!
//! # Request Flow
//!
//! 1. `RouteTable::resolve` - Parse the endpoint id once, then reuse it
//! 2. `Registry::get_or_insert_with` - Find or lazily create the host adapter
//! 3. `VerbAdapter::{list, create, update, delete}` - One protocol call
//! 4. Transport failures become error replies; other errors propagate
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | [`Resolver`] entry point |
//! | `endpoint` | Endpoint id parsing |
//! | `registry` | Host to adapter map |
//! | `routes` | Parsed endpoint memo |

// ============================================================================
// Submodules
// ============================================================================

/// Resolver entry point.
pub mod core;

/// Endpoint id parsing.
pub mod endpoint;

/// Host to adapter map.
pub mod registry;

/// Parsed endpoint memo.
pub mod routes;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::Resolver;
pub use endpoint::{Endpoint, Verb};
pub use registry::Registry;
pub use routes::RouteTable;
