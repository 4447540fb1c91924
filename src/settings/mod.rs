//! Process configuration.
//!
//! Everything a [`VerbAdapter`](crate::adapter::VerbAdapter) needs to open
//! sessions comes from here, never from the request.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Settings`] | Validated configuration |
//! | [`SettingsBuilder`] | Fluent configuration builder |
//! | [`Credentials`] | Device login |
//! | [`Transport`] | Plaintext or TLS |
//! | [`TlsPolicy`] | Certificate trust options |
//! | [`PoolOptions`] | Per-host pool sizing |
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use mikrotik_rest::{Settings, Transport};
//!
//! # fn example() -> mikrotik_rest::Result<()> {
//! let settings = Settings::builder()
//!     .username("api")
//!     .password("secret")
//!     .transport(Transport::Tls)
//!     .ca_file("/etc/mikrotik/rootCA.crt")
//!     .pool_capacity(10)
//!     .idle_ttl(Duration::from_secs(120))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for settings.
pub mod builder;

/// Validated settings.
pub mod core;

/// Environment variable loader.
pub mod env;

/// Credentials, transport and pool options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use options::{Credentials, PoolOptions, TlsPolicy, Transport};
