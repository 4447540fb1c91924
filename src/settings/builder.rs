//! Builder pattern for settings.
//!
//! Provides a fluent API for configuring and validating [`Settings`].
//!
//! # Example
//!
//! ```no_run
//! use mikrotik_rest::Settings;
//!
//! # fn example() -> mikrotik_rest::Result<()> {
//! let settings = Settings::builder()
//!     .username("api")
//!     .password("secret")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

use super::core::Settings;
use super::options::{Credentials, PoolOptions, TlsPolicy, Transport};

// ============================================================================
// SettingsBuilder
// ============================================================================

/// Builder for [`Settings`].
///
/// Use [`Settings::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    username: String,
    password: String,
    transport: Transport,
    verify_certificate: bool,
    verify_hostname: bool,
    ca_file: Option<PathBuf>,
    pool_capacity: usize,
    idle_ttl: Duration,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        let credentials = Credentials::default();
        let tls = TlsPolicy::default();
        let pool = PoolOptions::default();
        Self {
            username: credentials.username,
            password: credentials.password,
            transport: Transport::default(),
            verify_certificate: tls.verify_certificate,
            verify_hostname: tls.verify_hostname,
            ca_file: tls.ca_file,
            pool_capacity: pool.capacity.get(),
            idle_ttl: pool.idle_ttl,
        }
    }
}

// ============================================================================
// SettingsBuilder Implementation
// ============================================================================

impl SettingsBuilder {
    /// Creates a builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the login name.
    #[inline]
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the login password.
    #[inline]
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the transport mode.
    #[inline]
    #[must_use]
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Enables or disables certificate chain verification.
    #[inline]
    #[must_use]
    pub fn verify_certificate(mut self, verify: bool) -> Self {
        self.verify_certificate = verify;
        self
    }

    /// Enables or disables host name verification.
    #[inline]
    #[must_use]
    pub fn verify_hostname(mut self, verify: bool) -> Self {
        self.verify_hostname = verify;
        self
    }

    /// Sets the CA bundle path.
    #[inline]
    #[must_use]
    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }

    /// Sets the per-host soft cap on stored sessions.
    #[inline]
    #[must_use]
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Sets the age after which free sessions are evicted.
    #[inline]
    #[must_use]
    pub fn idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    /// Builds the settings with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the username is empty
    /// - [`Error::Config`] if host name verification is on without
    ///   certificate verification
    /// - [`Error::Config`] if TLS is used with a CA bundle that does not exist
    /// - [`Error::Config`] if pool capacity or idle TTL is zero
    pub fn build(self) -> Result<Settings> {
        self.validate_credentials()?;
        let tls = self.validate_tls()?;
        let pool = self.validate_pool()?;

        Ok(Settings {
            credentials: Credentials::new(self.username, self.password),
            transport: self.transport,
            tls,
            pool,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SettingsBuilder {
    /// Validates the login.
    fn validate_credentials(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::config(
                "username must not be empty. Use .username() to set it.",
            ));
        }
        Ok(())
    }

    /// Validates the TLS trust policy.
    fn validate_tls(&self) -> Result<TlsPolicy> {
        if self.verify_hostname && !self.verify_certificate {
            return Err(Error::config(
                "verify_certificate must be enabled when verify_hostname is enabled",
            ));
        }

        if self.transport.is_tls()
            && let Some(path) = &self.ca_file
            && !path.is_file()
        {
            return Err(Error::config(format!(
                "CA bundle not found at: {}",
                path.display()
            )));
        }

        Ok(TlsPolicy {
            verify_certificate: self.verify_certificate,
            verify_hostname: self.verify_hostname,
            ca_file: self.ca_file.clone(),
        })
    }

    /// Validates pool sizing.
    fn validate_pool(&self) -> Result<PoolOptions> {
        let capacity = NonZeroUsize::new(self.pool_capacity)
            .ok_or_else(|| Error::config("pool capacity must be greater than zero"))?;

        if self.idle_ttl.is_zero() {
            return Err(Error::config("idle TTL must be greater than zero"));
        }

        Ok(PoolOptions {
            capacity,
            idle_ttl: self.idle_ttl,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
