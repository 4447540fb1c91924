//! MikroTik REST - REST verbs over the RouterOS management API.
//!
//! This library sits between a REST front end and RouterOS devices. It turns
//! each request into exactly one management-protocol call, reusing protocol
//! sessions through a small pool per device.
//!
//! # Architecture
//!
//! ```text
//! handle(endpoint_id, hostname, params)
//!        │
//!        ▼
//!   Resolver ── RouteTable (endpoint id → path + verb)
//!        │
//!        ▼
//!   Registry ── one VerbAdapter per host
//!        │
//!        ▼
//!   ConnectionPool ── sessions for that host
//!        │
//!        ▼
//!   Connector / ApiConnection (protocol implementation)
//! ```
//!
//! Key design principles:
//!
//! - One adapter and one pool per host, created lazily and kept for the
//!   process lifetime
//! - A session serves one operation at a time and returns to its pool on
//!   every exit path
//! - The pool never blocks: when every session is busy a new one is opened
//! - Transport failures become structured error replies; every other error
//!   propagates
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use mikrotik_rest::{Params, Resolver, Result, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::from_env()?;
//!     let resolver = Resolver::new(settings, Arc::new(RouterOsConnector::new()));
//!
//!     let reply = resolver
//!         .handle("ip_address_list", "10.0.0.1", Params::new())
//!         .await?;
//!     println!("{} {}", reply.status, reply.payload);
//!
//!     resolver.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapter`] | Per-host verbs, parameters and replies |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Seam to the management protocol |
//! | [`resolver`] | Endpoint parsing and request dispatch |
//! | [`settings`] | Credentials, transport and pool configuration |
//! | [`transport`] | Session pooling |

// ============================================================================
// Modules
// ============================================================================

/// Per-host verb adapters.
///
/// - [`VerbAdapter`] - create, update, list and delete for one host
/// - [`Reply`] - payload and status code
pub mod adapter;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Management protocol seam.
///
/// Implement [`Connector`] and [`ApiConnection`] to plug in a protocol.
pub mod protocol;

/// Endpoint parsing and request dispatch.
///
/// Use [`Resolver::handle`] to serve requests.
pub mod resolver;

/// Configuration.
///
/// Use [`Settings::builder()`] or [`Settings::from_env()`].
pub mod settings;

/// Session pooling.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Adapter types
pub use adapter::{CreateParams, DeleteParams, ListParams, Params, Reply, UpdateParams, VerbAdapter};

// Error types
pub use error::{Error, Result, TransportErrorKind};

// Identifier types
pub use identifiers::SessionId;

// Protocol types
pub use protocol::{ApiConnection, Attributes, ConnectOptions, Connector, ID_FIELD, Predicate, Query, Row};

// Resolver types
pub use resolver::{Endpoint, Resolver, Verb};

// Settings types
pub use settings::{Credentials, PoolOptions, Settings, SettingsBuilder, TlsPolicy, Transport};

// Transport types
pub use transport::{ConnectionPool, PoolStats, PooledSession};
