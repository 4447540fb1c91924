//! Connector and connection traits.
//!
//! A [`Connector`] opens authenticated [`ApiConnection`]s. Each connection is
//! stateful and serves one operation at a time, which the pool enforces.
//!
//! Implementations raise failures with [`Error::transport`] so the resolver
//! can map them to status codes.
//!
//! [`Error::transport`]: crate::error::Error::transport

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::settings::{Credentials, Settings, TlsPolicy, Transport};

use super::query::{Attributes, Query, Row};

// ============================================================================
// ConnectOptions
// ============================================================================

/// Everything needed to open one session to one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Device host name or address.
    pub host: String,
    /// Login.
    pub credentials: Credentials,
    /// Plaintext or TLS.
    pub transport: Transport,
    /// Trust policy for TLS.
    pub tls: TlsPolicy,
}

impl ConnectOptions {
    /// Builds options for `host` from process settings.
    #[must_use]
    pub fn for_host(host: impl Into<String>, settings: &Settings) -> Self {
        Self {
            host: host.into(),
            credentials: settings.credentials().clone(),
            transport: settings.transport(),
            tls: settings.tls().clone(),
        }
    }
}

// ============================================================================
// Connector
// ============================================================================

/// Opens new protocol connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects and authenticates.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the device is unreachable, the TLS
    /// handshake fails, login is rejected or the attempt times out.
    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn ApiConnection>>;
}

// ============================================================================
// ApiConnection
// ============================================================================

/// One live, authenticated protocol connection.
#[async_trait]
pub trait ApiConnection: Send {
    /// Adds an item under `path`, returning its new `.id`.
    async fn add(&mut self, path: &str, attributes: &Attributes) -> Result<String>;

    /// Updates the items named by the `.id` attribute.
    async fn update(&mut self, path: &str, attributes: &Attributes) -> Result<()>;

    /// Prints rows under `path`, in device order.
    async fn query(&mut self, path: &str, query: &Query) -> Result<Vec<Row>>;

    /// Removes the items with the given ids.
    async fn remove(&mut self, path: &str, ids: &[String]) -> Result<()>;

    /// Closes the connection.
    async fn close(&mut self) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
