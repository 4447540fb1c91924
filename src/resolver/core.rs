//! Request resolver.
//!
//! Turns `(endpoint id, hostname, params)` into one verb call on the host's
//! adapter and translates transport failures into error replies.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::adapter::params::{self, CreateParams, DeleteParams, ListParams, Params, UpdateParams};
use crate::adapter::{Reply, VerbAdapter};
use crate::error::Result;
use crate::protocol::Connector;
use crate::settings::Settings;
use crate::transport::PoolStats;

use super::endpoint::{Endpoint, Verb};
use super::registry::Registry;
use super::routes::RouteTable;

// ============================================================================
// Constants
// ============================================================================

/// Routing parameter stripped before verb parameters are parsed.
const HOSTNAME_PARAM: &str = "hostname";

// ============================================================================
// Resolver
// ============================================================================

/// Entry point for REST requests.
///
/// Holds the process-wide settings, the route memo and one adapter per host.
/// Share it behind an `Arc`; all methods take `&self`.
///
/// # Example
///
/// ```ignore
/// let resolver = Resolver::new(Settings::from_env()?, connector);
/// let reply = resolver
///     .handle("ip_address_list", "10.0.0.1", Params::new())
///     .await?;
/// ```
pub struct Resolver {
    settings: Settings,
    connector: Arc<dyn Connector>,
    routes: RouteTable,
    registry: Registry,
}

impl Resolver {
    /// Creates a resolver with no hosts.
    #[must_use]
    pub fn new(settings: Settings, connector: Arc<dyn Connector>) -> Self {
        Self {
            settings,
            connector,
            routes: RouteTable::new(),
            registry: Registry::new(),
        }
    }

    /// Returns the settings shared by every host.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the route memo.
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

// ============================================================================
// Resolver - Requests
// ============================================================================

impl Resolver {
    /// Handles one request.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) or
    ///   [`Error::UnknownVerb`](crate::Error::UnknownVerb) for a bad endpoint id
    /// - any non-transport error from [`dispatch`](Self::dispatch)
    pub async fn handle(&self, endpoint_id: &str, hostname: &str, params: Params) -> Result<Reply> {
        let endpoint = self.routes.resolve(endpoint_id)?;
        self.dispatch(&endpoint, hostname, params).await
    }

    /// Runs a parsed endpoint against `hostname`.
    ///
    /// Transport failures become `Ok` error replies carrying the failure's
    /// status code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) for
    /// malformed parameters, or any other non-transport failure.
    pub async fn dispatch(
        &self,
        endpoint: &Endpoint,
        hostname: &str,
        mut params: Params,
    ) -> Result<Reply> {
        params.remove(HOSTNAME_PARAM);
        let adapter = self.adapter(hostname);
        let path = endpoint.path.as_str();

        debug!(host = hostname, verb = %endpoint.verb, path, "Dispatching");

        let result = match endpoint.verb {
            Verb::List => {
                let list: ListParams = params::parse(params)?;
                adapter.list(path, list).await
            }
            Verb::Create => {
                let create: CreateParams = params::parse(params)?;
                adapter.create(path, create.body).await
            }
            Verb::Update => {
                let update: UpdateParams = params::parse(params)?;
                adapter.update(path, &update.ids, update.body).await
            }
            Verb::Delete => {
                let delete: DeleteParams = params::parse(params)?;
                adapter.delete(path, delete.id, delete.ids).await
            }
        };

        match result {
            Ok(reply) => Ok(reply),
            Err(err) => match err.transport_kind() {
                Some(kind) => {
                    warn!(
                        host = hostname,
                        verb = %endpoint.verb,
                        path,
                        kind = %kind,
                        error = %err,
                        "Transport failure"
                    );
                    Ok(Reply::error(kind, err.to_string()))
                }
                None => Err(err),
            },
        }
    }

    /// Pre-parses a route table.
    ///
    /// Returns the number of known routes.
    ///
    /// # Errors
    ///
    /// Returns the first invalid endpoint id's parse error.
    pub fn register_routes<I, S>(&self, endpoint_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let count = self.routes.register(endpoint_ids)?;
        info!(routes = count, "Routes registered");
        Ok(count)
    }
}

// ============================================================================
// Resolver - Hosts
// ============================================================================

impl Resolver {
    /// Returns the adapter for `hostname`, creating it on first use.
    ///
    /// Creation never connects; the first session opens on the first verb.
    pub fn adapter(&self, hostname: &str) -> Arc<VerbAdapter> {
        self.registry.get_or_insert_with(hostname, || {
            VerbAdapter::new(hostname, &self.settings, Arc::clone(&self.connector))
        })
    }

    /// Returns every host seen so far, sorted.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        self.registry.hosts()
    }

    /// Returns pool statistics for `hostname`, if it has been seen.
    #[must_use]
    pub fn pool_stats(&self, hostname: &str) -> Option<PoolStats> {
        self.registry.get(hostname).map(|adapter| adapter.pool().stats())
    }

    /// Closes the free sessions of every host.
    ///
    /// Busy sessions are left to their holders. Returns the number closed.
    pub async fn shutdown(&self) -> usize {
        let adapters = self.registry.adapters();
        let closed: usize = join_all(adapters.iter().map(|a| a.pool().close_idle()))
            .await
            .into_iter()
            .sum();

        info!(hosts = adapters.len(), closed, "Resolver shut down");
        closed
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settings", &self.settings)
            .field("routes", &self.routes.len())
            .field("hosts", &self.registry.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
