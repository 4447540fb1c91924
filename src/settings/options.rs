//! Credentials, transport mode and pool sizing.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Maximum stored sessions per host.
pub const DEFAULT_POOL_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Age after which a free session is dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(120);

// ============================================================================
// Credentials
// ============================================================================

/// Device login used for every session.
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[inline]
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// How sessions reach the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// Plain TCP.
    #[default]
    Plain,
    /// TLS-wrapped TCP.
    Tls,
}

impl Transport {
    /// Returns `true` for [`Transport::Tls`].
    #[inline]
    #[must_use]
    pub fn is_tls(self) -> bool {
        matches!(self, Self::Tls)
    }
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" | "plain" | "plaintext" => Ok(Self::Plain),
            "ssl" | "tls" => Ok(Self::Tls),
            other => Err(Error::config(format!(
                "transport must be \"TCP\" or \"SSL\", got \"{other}\""
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("TCP"),
            Self::Tls => f.write_str("SSL"),
        }
    }
}

// ============================================================================
// TlsPolicy
// ============================================================================

/// Certificate trust options, consulted only for [`Transport::Tls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPolicy {
    /// Verify the device certificate chain.
    pub verify_certificate: bool,
    /// Verify the certificate matches the host name.
    ///
    /// Requires `verify_certificate`.
    pub verify_hostname: bool,
    /// CA bundle used for verification.
    pub ca_file: Option<PathBuf>,
}

impl Default for TlsPolicy {
    fn default() -> Self {
        Self {
            verify_certificate: true,
            verify_hostname: true,
            ca_file: None,
        }
    }
}

// ============================================================================
// PoolOptions
// ============================================================================

/// Per-host connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Soft cap on stored sessions.
    pub capacity: NonZeroUsize,
    /// Age after which a free session becomes eligible for eviction.
    pub idle_ttl: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
