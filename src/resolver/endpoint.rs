//! Endpoint identifier parsing.
//!
//! An endpoint id names a device menu path and a verb, joined by `_`:
//!
//! | Endpoint id | Path | Verb |
//! |-------------|------|------|
//! | `interface_bridge_port_list` | `/interface/bridge/port` | `list` |
//! | `ip_dhcp-server_lease_create` | `/ip/dhcp-server/lease` | `create` |
//! | `api.endpoints.cfg.ip_address_delete` | `/ip/address` | `delete` |
//!
//! Anything up to the last `.` is a module qualification and is ignored.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Separator between path segments and the verb.
const SEGMENT_SEPARATOR: char = '_';

/// Separator of module qualifications.
const QUALIFIER_SEPARATOR: char = '.';

// ============================================================================
// Verb
// ============================================================================

/// REST verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Read rows (`print`).
    List,
    /// Add an item (`add`).
    Create,
    /// Set attributes (`set`).
    Update,
    /// Remove items (`remove`).
    Delete,
}

impl Verb {
    /// All verbs.
    pub const ALL: [Self; 4] = [Self::List, Self::Create, Self::Update, Self::Delete];

    /// Returns the canonical verb name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns the device primitive the verb maps to.
    #[inline]
    #[must_use]
    pub const fn primitive(self) -> &'static str {
        match self {
            Self::List => "print",
            Self::Create => "add",
            Self::Update => "set",
            Self::Delete => "remove",
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    /// Accepts canonical names, HTTP method names and device primitives.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" | "get" | "print" => Ok(Self::List),
            "create" | "post" | "add" => Ok(Self::Create),
            "update" | "patch" | "set" => Ok(Self::Update),
            "delete" | "remove" => Ok(Self::Delete),
            other => Err(Error::unknown_verb(other)),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// Parsed endpoint: device menu path plus verb.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Menu path, e.g. `/ip/address`.
    pub path: String,
    /// Verb.
    pub verb: Verb,
}

impl Endpoint {
    /// Parses an endpoint id.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] if the id has an empty segment or no
    ///   path segment
    /// - [`Error::UnknownVerb`] if the last segment is not a verb
    pub fn parse(endpoint_id: &str) -> Result<Self> {
        let name = endpoint_id
            .rsplit(QUALIFIER_SEPARATOR)
            .next()
            .unwrap_or(endpoint_id);

        let mut segments: Vec<&str> = name.split(SEGMENT_SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::invalid_endpoint(endpoint_id, "empty segment"));
        }

        let verb = match segments.pop() {
            Some(verb) if !segments.is_empty() => verb.parse::<Verb>()?,
            _ => return Err(Error::invalid_endpoint(endpoint_id, "no path segment")),
        };

        Ok(Self {
            path: format!("/{}", segments.join("/")),
            verb,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.path)
    }
}

// ============================================================================
// Tests
// ============================================================================
