//! Validated process settings.

// ============================================================================
// Imports
// ============================================================================

use super::builder::SettingsBuilder;
use super::options::{Credentials, PoolOptions, TlsPolicy, Transport};

// ============================================================================
// Settings
// ============================================================================

/// Validated configuration shared by every adapter.
///
/// Only obtainable through [`SettingsBuilder::build`] or
/// [`Settings::from_env`], both of which reject invalid combinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub(crate) credentials: Credentials,
    pub(crate) transport: Transport,
    pub(crate) tls: TlsPolicy,
    pub(crate) pool: PoolOptions,
}

impl Settings {
    /// Creates a settings builder with defaults.
    #[inline]
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Returns the device login.
    #[inline]
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the transport mode.
    #[inline]
    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Returns the TLS trust policy.
    #[inline]
    #[must_use]
    pub fn tls(&self) -> &TlsPolicy {
        &self.tls
    }

    /// Returns the per-host pool sizing.
    #[inline]
    #[must_use]
    pub fn pool(&self) -> PoolOptions {
        self.pool
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            transport: Transport::default(),
            tls: TlsPolicy::default(),
            pool: PoolOptions::default(),
        }
    }
}
