//! Verb translation layer.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`VerbAdapter`] | One host's verbs over its session pool |
//! | [`Reply`] | Payload and status code |
//! | [`ListParams`] and friends | Typed verb parameters |

// ============================================================================
// Submodules
// ============================================================================

/// Per-host verb adapter.
pub mod core;

/// Verb parameters.
pub mod params;

/// Reply payloads and status codes.
pub mod reply;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::VerbAdapter;
pub use params::{CreateParams, DeleteParams, ListParams, Params, UpdateParams};
pub use reply::{Reply, status};
