//! Per-host pool of protocol sessions.
//!
//! Each host gets its own [`ConnectionPool`]; pools never share a lock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       ConnectionPool (host=r1)          │
//! │  ┌─────────────────────────────────┐   │
//! │  │ SessionId=0 → Session (busy)    │   │
//! │  │ SessionId=1 → Session (free)    │   │
//! │  │ SessionId=2 → Session (free)    │   │
//! │  └─────────────────────────────────┘   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Sizing
//!
//! `capacity` is a soft cap on stored sessions, not an admission limit.
//! When every stored session is busy, [`ConnectionPool::acquire`] opens a new
//! connection instead of waiting. On insertion, free sessions older than
//! `idle_ttl` are closed, then the oldest free sessions are closed until the
//! store fits `capacity` again. Busy sessions are never evicted.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::identifiers::{SessionId, SessionIdGenerator};
use crate::protocol::{ConnectOptions, Connector};
use crate::settings::PoolOptions;

use super::session::{PooledSession, Session, SessionMap, SessionStore};

// ============================================================================
// PoolStats
// ============================================================================

/// Point-in-time view of a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Stored sessions.
    pub total: usize,
    /// Stored sessions currently held by a caller.
    pub busy: usize,
    /// Stored sessions available for reuse.
    pub idle: usize,
    /// Connections opened over the pool's lifetime.
    pub created: u64,
}

// ============================================================================
// ConnectionPool
// ============================================================================

/// Bounded, age-limited collection of sessions to one host.
///
/// # Example
///
/// ```ignore
/// let pool = ConnectionPool::new(options, connector, PoolOptions::default());
///
/// let session = pool.acquire().await?;
/// let rows = session.query("/interface", &Query::new()).await?;
/// pool.release(session);
/// ```
pub struct ConnectionPool {
    /// Host name shared with every session.
    host: Arc<str>,

    /// Options passed to the connector for new sessions.
    options: ConnectOptions,

    /// Opens new connections.
    connector: Arc<dyn Connector>,

    /// Soft cap on stored sessions.
    capacity: NonZeroUsize,

    /// Age after which free sessions are evicted.
    idle_ttl: Duration,

    /// Stored sessions, shared weakly with outstanding handles.
    sessions: Arc<SessionStore>,

    /// Source of session ids.
    ids: SessionIdGenerator,

    /// Connections opened so far.
    created: AtomicU64,
}

// ============================================================================
// ConnectionPool - Constructor
// ============================================================================

impl ConnectionPool {
    /// Creates an empty pool.
    ///
    /// No connection is opened until the first [`acquire`](Self::acquire).
    #[must_use]
    pub fn new(options: ConnectOptions, connector: Arc<dyn Connector>, sizing: PoolOptions) -> Self {
        debug!(
            host = %options.host,
            capacity = sizing.capacity.get(),
            idle_ttl_secs = sizing.idle_ttl.as_secs(),
            "ConnectionPool created"
        );

        Self {
            host: Arc::from(options.host.as_str()),
            options,
            connector,
            capacity: sizing.capacity,
            idle_ttl: sizing.idle_ttl,
            sessions: Arc::new(SessionStore::new(SessionMap::new())),
            ids: SessionIdGenerator::new(),
            created: AtomicU64::new(0),
        }
    }
}

// ============================================================================
// ConnectionPool - Public API
// ============================================================================

impl ConnectionPool {
    /// Returns the host this pool connects to.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the soft cap on stored sessions.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Returns the idle eviction age.
    #[inline]
    #[must_use]
    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Returns the number of stored sessions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Returns `true` if no session is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Returns a snapshot of pool occupancy.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let sessions = self.sessions.lock();
        let busy = sessions.values().filter(|s| s.is_busy()).count();
        PoolStats {
            total: sessions.len(),
            busy,
            idle: sessions.len() - busy,
            created: self.created.load(Ordering::Relaxed),
        }
    }

    /// Takes a free session, or opens a new one if none is free.
    ///
    /// Never waits for another caller to release a session.
    ///
    /// # Errors
    ///
    /// Returns the connector's transport error if a new connection is needed
    /// and cannot be opened. Nothing is stored in that case.
    pub async fn acquire(&self) -> Result<PooledSession> {
        let (reused, expired) = {
            let mut sessions = self.sessions.lock();
            let expired = evict_expired(&mut sessions, self.idle_ttl);
            let reused = reserve_free(&sessions);
            (reused, expired)
        };

        if let Some(session) = reused {
            debug!(host = %self.host, session_id = %session.id(), "Reusing free session");
            let handle = self.handle(session);
            self.close_sessions(expired).await;
            return Ok(handle);
        }
        self.close_sessions(expired).await;

        let api = match self.connector.connect(&self.options).await {
            Ok(api) => api,
            Err(e) => {
                warn!(host = %self.host, error = %e, "Failed to open session");
                return Err(e);
            }
        };
        self.created.fetch_add(1, Ordering::Relaxed);

        // Id and creation time are assigned together under the lock so that
        // id order is age order even when connects finish out of order.
        let (session, evicted, total) = {
            let mut sessions = self.sessions.lock();
            let id = self.ids.next_id();
            let session = Arc::new(Session::new_busy(id, Arc::clone(&self.host), api));
            sessions.insert(id, Arc::clone(&session));
            let evicted = self.evict_locked(&mut sessions);
            (session, evicted, sessions.len())
        };

        info!(host = %self.host, session_id = %session.id(), total, "Opened new session");

        let handle = self.handle(session);
        self.close_sessions(evicted).await;
        Ok(handle)
    }

    /// Returns a session to the pool.
    ///
    /// The connection stays open for the next [`acquire`](Self::acquire).
    /// Dropping the handle has the same effect.
    pub fn release(&self, session: PooledSession) {
        debug_assert_eq!(session.host(), self.host());
        drop(session);
    }

    /// Closes free sessions older than the idle TTL.
    ///
    /// Returns the number of sessions closed.
    pub async fn purge_expired(&self) -> usize {
        let expired = {
            let mut sessions = self.sessions.lock();
            evict_expired(&mut sessions, self.idle_ttl)
        };
        let count = expired.len();
        self.close_sessions(expired).await;
        count
    }

    /// Closes every free session, leaving busy ones to their holders.
    ///
    /// Returns the number of sessions closed.
    pub async fn close_idle(&self) -> usize {
        let idle = {
            let mut sessions = self.sessions.lock();
            take_matching(&mut sessions, |s| !s.is_busy())
        };
        let count = idle.len();
        self.close_sessions(idle).await;
        count
    }
}

// ============================================================================
// ConnectionPool - Eviction
// ============================================================================

impl ConnectionPool {
    /// Applies the age rule, then trims the oldest free sessions to capacity.
    fn evict_locked(&self, sessions: &mut SessionMap) -> Vec<Arc<Session>> {
        let mut evicted = evict_expired(sessions, self.idle_ttl);

        while sessions.len() > self.capacity.get() {
            let oldest_free = sessions
                .iter()
                .find(|(_, s)| !s.is_busy())
                .map(|(id, _)| *id);

            match oldest_free.and_then(|id| sessions.remove(&id)) {
                Some(session) => evicted.push(session),
                None => break,
            }
        }

        evicted
    }

    /// Wraps a reserved session in a handle tied to this pool.
    fn handle(&self, session: Arc<Session>) -> PooledSession {
        PooledSession::new(session, Arc::downgrade(&self.sessions))
    }

    /// Closes removed sessions outside the pool lock.
    async fn close_sessions(&self, sessions: Vec<Arc<Session>>) {
        if sessions.is_empty() {
            return;
        }

        let results = join_all(sessions.iter().map(|s| s.close())).await;
        for (session, result) in sessions.iter().zip(results) {
            match result {
                Ok(()) => {
                    debug!(host = %self.host, session_id = %session.id(), "Session evicted")
                }
                Err(e) => {
                    warn!(host = %self.host, session_id = %session.id(), error = %e, "Failed to close evicted session")
                }
            }
        }
    }
}

// ============================================================================
// Store Helpers
// ============================================================================

/// Marks the oldest free session busy and returns it.
fn reserve_free(sessions: &SessionMap) -> Option<Arc<Session>> {
    for session in sessions.values() {
        if session.try_reserve() {
            return Some(Arc::clone(session));
        }
    }
    None
}

/// Removes free sessions at least `ttl` old.
fn evict_expired(sessions: &mut SessionMap, ttl: Duration) -> Vec<Arc<Session>> {
    take_matching(sessions, |s| !s.is_busy() && s.is_expired(ttl))
}

/// Removes every session matching `predicate`.
fn take_matching<F>(sessions: &mut SessionMap, predicate: F) -> Vec<Arc<Session>>
where
    F: Fn(&Session) -> bool,
{
    let ids: Vec<SessionId> = sessions
        .iter()
        .filter(|(_, s)| predicate(s))
        .map(|(id, _)| *id)
        .collect();
    ids.iter().filter_map(|id| sessions.remove(id)).collect()
}

impl fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("host", &self.host)
            .field("capacity", &self.capacity)
            .field("idle_ttl", &self.idle_ttl)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
