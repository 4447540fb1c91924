//! Error types for the REST bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use mikrotik_rest::{Error, Result};
//!
//! async fn example(resolver: &Resolver) -> Result<()> {
//!     let reply = resolver.handle("ip_address_list", "10.0.0.1", params).await?;
//!     println!("{} {}", reply.status, reply.payload);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Request | [`Error::InvalidEndpoint`], [`Error::UnknownVerb`], [`Error::InvalidArgument`] |
//! | Transport | [`Error::Protocol`], [`Error::ConnectionClosed`], [`Error::Connection`], [`Error::Tls`], [`Error::Timeout`] |
//! | External | [`Error::Io`] |
//!
//! Only transport errors (see [`Error::transport_kind`]) are turned into
//! structured error replies by the resolver. Everything else propagates.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// TransportErrorKind
// ============================================================================

/// Closed set of transport failure kinds raised by the protocol layer.
///
/// Each kind maps to exactly one HTTP status code and one stable type name
/// reported in error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Device rejected the command or its arguments.
    Protocol,
    /// Device dropped the session mid-operation.
    ConnectionClosed,
    /// Could not reach or maintain the connection.
    Connection,
    /// TLS handshake or verification failure.
    Tls,
    /// Device or network too slow.
    Timeout,
}

impl TransportErrorKind {
    /// All kinds, in table order.
    pub const ALL: [Self; 5] = [
        Self::Protocol,
        Self::ConnectionClosed,
        Self::Connection,
        Self::Tls,
        Self::Timeout,
    ];

    /// Returns the HTTP status code reported for this kind.
    #[inline]
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::Protocol => 400,
            Self::ConnectionClosed | Self::Connection | Self::Tls => 502,
            Self::Timeout => 503,
        }
    }

    /// Returns the fully qualified kind name used as the payload `type`.
    #[inline]
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Protocol => "transport.ProtocolError",
            Self::ConnectionClosed => "transport.ConnectionClosed",
            Self::Connection => "transport.ConnectionError",
            Self::Tls => "transport.TlsError",
            Self::Timeout => "transport.Timeout",
        }
    }

    /// Classifies an I/O error by its kind.
    ///
    /// Returns `None` for I/O failures that are not network failures.
    #[must_use]
    pub fn from_io(err: &IoError) -> Option<Self> {
        match err.kind() {
            IoErrorKind::TimedOut | IoErrorKind::WouldBlock => Some(Self::Timeout),
            IoErrorKind::ConnectionReset
            | IoErrorKind::ConnectionAborted
            | IoErrorKind::BrokenPipe
            | IoErrorKind::UnexpectedEof => Some(Self::ConnectionClosed),
            IoErrorKind::ConnectionRefused
            | IoErrorKind::NotConnected
            | IoErrorKind::AddrNotAvailable
            | IoErrorKind::HostUnreachable
            | IoErrorKind::NetworkUnreachable
            | IoErrorKind::NetworkDown => Some(Self::Connection),
            _ => None,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned at startup when settings are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================
    /// Endpoint identifier could not be parsed.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The offending endpoint identifier.
        endpoint: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Verb segment is not one of list/create/update/delete.
    #[error("Unknown verb: {verb}")]
    UnknownVerb {
        /// The unrecognized verb.
        verb: String,
    },

    /// Request parameters do not fit the verb.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Device rejected the command or its arguments.
    #[error("{message}")]
    Protocol {
        /// Message reported by the device.
        message: String,
    },

    /// Connection closed by peer.
    #[error("Connection closed: {message}")]
    ConnectionClosed {
        /// Description of the closure.
        message: String,
    },

    /// Generic connection failure.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// TLS handshake or certificate verification failure.
    #[error("TLS error: {message}")]
    Tls {
        /// Description of the TLS failure.
        message: String,
    },

    /// Operation timed out at the socket level.
    #[error("Timed out: {message}")]
    Timeout {
        /// Description of the timed out operation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid endpoint error.
    #[inline]
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown verb error.
    #[inline]
    pub fn unknown_verb(verb: impl Into<String>) -> Self {
        Self::UnknownVerb { verb: verb.into() }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a protocol rejection error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a connection closed error.
    #[inline]
    pub fn connection_closed(message: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a TLS error.
    #[inline]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates the transport error variant for `kind`.
    ///
    /// Protocol implementations use this to raise a tagged failure.
    #[must_use]
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        match kind {
            TransportErrorKind::Protocol => Self::protocol(message),
            TransportErrorKind::ConnectionClosed => Self::connection_closed(message),
            TransportErrorKind::Connection => Self::connection(message),
            TransportErrorKind::Tls => Self::tls(message),
            TransportErrorKind::Timeout => Self::timeout(message),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns the transport kind of this error, if it is one.
    ///
    /// Matching is by variant only. I/O errors are classified by
    /// [`TransportErrorKind::from_io`].
    #[must_use]
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::Protocol { .. } => Some(TransportErrorKind::Protocol),
            Self::ConnectionClosed { .. } => Some(TransportErrorKind::ConnectionClosed),
            Self::Connection { .. } => Some(TransportErrorKind::Connection),
            Self::Tls { .. } => Some(TransportErrorKind::Tls),
            Self::Timeout { .. } => Some(TransportErrorKind::Timeout),
            Self::Io(err) => TransportErrorKind::from_io(err),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.transport_kind() == Some(TransportErrorKind::Timeout)
    }

    /// Returns `true` if this is a connection-level error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self.transport_kind(),
            Some(
                TransportErrorKind::ConnectionClosed
                    | TransportErrorKind::Connection
                    | TransportErrorKind::Tls
            )
        )
    }

    /// Returns `true` if the resolver should turn this error into a reply.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.transport_kind().is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("no route to host");
        assert_eq!(err.to_string(), "Connection failed: no route to host");
    }

    #[test]
    fn test_protocol_error_displays_device_message() {
        let err = Error::protocol("failure: already have such entry");
        assert_eq!(err.to_string(), "failure: already have such entry");
    }

    #[test]
    fn test_status_mapping_is_stable() {
        let cases = [
            (TransportErrorKind::Protocol, 400),
            (TransportErrorKind::ConnectionClosed, 502),
            (TransportErrorKind::Connection, 502),
            (TransportErrorKind::Tls, 502),
            (TransportErrorKind::Timeout, 503),
        ];

        for (kind, status) in cases {
            assert_eq!(kind.status(), status);
        }
    }

    #[test]
    fn test_transport_constructor_round_trips_kind() {
        for kind in TransportErrorKind::ALL {
            let err = Error::transport(kind, "x");
            assert_eq!(err.transport_kind(), Some(kind));
        }
    }

    #[test]
    fn test_non_transport_errors_have_no_kind() {
        assert_eq!(Error::config("bad").transport_kind(), None);
        assert_eq!(Error::unknown_verb("frobnicate").transport_kind(), None);
        assert_eq!(Error::invalid_argument("ids").transport_kind(), None);
    }

    #[test]
    fn test_io_errors_are_classified_by_kind() {
        let timed_out: Error = IoError::new(IoErrorKind::TimedOut, "read").into();
        let reset: Error = IoError::new(IoErrorKind::ConnectionReset, "reset").into();
        let refused: Error = IoError::new(IoErrorKind::ConnectionRefused, "refused").into();
        let missing: Error = IoError::new(IoErrorKind::NotFound, "file").into();

        assert_eq!(timed_out.transport_kind(), Some(TransportErrorKind::Timeout));
        assert_eq!(
            reset.transport_kind(),
            Some(TransportErrorKind::ConnectionClosed)
        );
        assert_eq!(refused.transport_kind(), Some(TransportErrorKind::Connection));
        assert_eq!(missing.transport_kind(), None);
    }

    #[test]
    fn test_predicates() {
        assert!(Error::timeout("read").is_timeout());
        assert!(!Error::timeout("read").is_connection_error());
        assert!(Error::tls("bad cert").is_connection_error());
        assert!(Error::protocol("no such item").is_transport());
        assert!(!Error::config("x").is_transport());
    }
}
