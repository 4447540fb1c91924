//! Memoized endpoint parsing.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::Result;

use super::endpoint::Endpoint;

// ============================================================================
// RouteTable
// ============================================================================

/// Endpoint ids parsed so far.
///
/// Each distinct id is parsed once; later lookups take only a read lock.
/// Invalid ids are not cached.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: RwLock<FxHashMap<String, Arc<Endpoint>>>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parsed endpoint for `endpoint_id`, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the parse error of an invalid id.
    pub fn resolve(&self, endpoint_id: &str) -> Result<Arc<Endpoint>> {
        if let Some(endpoint) = self.routes.read().get(endpoint_id) {
            return Ok(Arc::clone(endpoint));
        }

        let parsed = Arc::new(Endpoint::parse(endpoint_id)?);
        let mut routes = self.routes.write();
        let endpoint = routes
            .entry(endpoint_id.to_string())
            .or_insert_with(|| {
                debug!(endpoint_id, endpoint = %parsed, "Route parsed");
                Arc::clone(&parsed)
            });
        Ok(Arc::clone(endpoint))
    }

    /// Parses a whole route table up front.
    ///
    /// Returns the number of routes now known.
    ///
    /// # Errors
    ///
    /// Returns the first parse error; ids before it stay registered.
    pub fn register<I, S>(&self, endpoint_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for endpoint_id in endpoint_ids {
            self.resolve(endpoint_id.as_ref())?;
        }
        Ok(self.len())
    }

    /// Returns the number of cached routes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Returns `true` if nothing has been parsed yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
