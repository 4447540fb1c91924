//! Pooled protocol sessions.
//!
//! A [`Session`] owns one live connection together with its busy flag. The
//! pool hands sessions out wrapped in a [`PooledSession`], which clears the
//! flag when dropped so release happens on every exit path.
//!
//! A handle dropped while a protocol call is still running (the caller's
//! future was cancelled) does not release: the connection may be
//! mid-exchange, so the session is removed from its pool and closed.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::identifiers::SessionId;
use crate::protocol::{ApiConnection, Attributes, Query, Row};

// ============================================================================
// Types
// ============================================================================

/// Stored sessions ordered by id, oldest first.
pub(crate) type SessionMap = BTreeMap<SessionId, Arc<Session>>;

/// A pool's session store, shared with the handles it gives out.
pub(crate) type SessionStore = Mutex<SessionMap>;

// ============================================================================
// Session
// ============================================================================

/// One authenticated connection to a host plus its busy flag.
///
/// The busy flag is only ever set while the owning pool's lock is held, so
/// at most one caller holds a session at a time.
pub struct Session {
    /// Sequence number within the pool.
    id: SessionId,
    /// Host this session is connected to.
    host: Arc<str>,
    /// When the session entered its pool.
    created_at: Instant,
    /// Set while a caller holds the session.
    busy: AtomicBool,
    /// Set while a protocol call is running.
    in_flight: AtomicBool,
    /// The live connection.
    api: AsyncMutex<Box<dyn ApiConnection>>,
}

impl Session {
    /// Wraps a freshly opened connection, already marked busy.
    pub(crate) fn new_busy(id: SessionId, host: Arc<str>, api: Box<dyn ApiConnection>) -> Self {
        Self {
            id,
            host,
            created_at: Instant::now(),
            busy: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
            api: AsyncMutex::new(api),
        }
    }

    /// Returns the session's sequence number.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the host name.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns when the session entered its pool.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns how long ago the session entered its pool.
    #[inline]
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Returns `true` while a caller holds this session.
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Returns `true` while a protocol call is running on this session.
    #[inline]
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns `true` once the session is at least `ttl` old.
    #[inline]
    pub(crate) fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Marks the session busy if it was free.
    ///
    /// Must be called with the pool lock held.
    #[inline]
    pub(crate) fn try_reserve(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks the session free.
    #[inline]
    fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Closes the underlying connection.
    pub(crate) async fn close(&self) -> Result<()> {
        self.api.lock().await.close().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("host", &self.host)
            .field("busy", &self.is_busy())
            .field("in_flight", &self.is_in_flight())
            .field("age", &self.age())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PooledSession
// ============================================================================

/// Exclusive handle to a busy [`Session`].
///
/// Dropping the handle returns the session to the pool without closing it,
/// unless a call was interrupted, in which case the session is discarded.
pub struct PooledSession {
    session: Arc<Session>,
    store: Weak<SessionStore>,
}

impl PooledSession {
    /// Wraps a session whose busy flag the caller has just set.
    pub(crate) fn new(session: Arc<Session>, store: Weak<SessionStore>) -> Self {
        debug_assert!(session.is_busy());
        Self { session, store }
    }

    /// Returns the session's sequence number.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.session.id
    }

    /// Returns the host name.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.session.host
    }

    /// Runs `add` on this session.
    pub async fn add(&self, path: &str, attributes: &Attributes) -> Result<String> {
        trace!(host = %self.host(), session_id = %self.id(), path, "add");
        self.begin_call();
        let result = self.session.api.lock().await.add(path, attributes).await;
        self.end_call();
        result
    }

    /// Runs `set` on this session.
    pub async fn update(&self, path: &str, attributes: &Attributes) -> Result<()> {
        trace!(host = %self.host(), session_id = %self.id(), path, "set");
        self.begin_call();
        let result = self.session.api.lock().await.update(path, attributes).await;
        self.end_call();
        result
    }

    /// Runs `print` on this session.
    pub async fn query(&self, path: &str, query: &Query) -> Result<Vec<Row>> {
        trace!(host = %self.host(), session_id = %self.id(), path, ?query, "print");
        self.begin_call();
        let result = self.session.api.lock().await.query(path, query).await;
        self.end_call();
        result
    }

    /// Runs `remove` on this session.
    pub async fn remove(&self, path: &str, ids: &[String]) -> Result<()> {
        trace!(host = %self.host(), session_id = %self.id(), path, ?ids, "remove");
        self.begin_call();
        let result = self.session.api.lock().await.remove(path, ids).await;
        self.end_call();
        result
    }

    #[inline]
    fn begin_call(&self) {
        self.session.in_flight.store(true, Ordering::Release);
    }

    /// Only reached when the call future ran to completion.
    #[inline]
    fn end_call(&self) {
        self.session.in_flight.store(false, Ordering::Release);
    }

    /// Takes an interrupted session out of its pool and closes it.
    ///
    /// The busy flag stays set so the session can never be reserved again.
    fn discard(&self) {
        let session = &self.session;
        if let Some(store) = self.store.upgrade() {
            store.lock().remove(&session.id);
        }
        warn!(host = %session.host, session_id = %session.id, "Call interrupted, discarding session");

        match Handle::try_current() {
            Ok(runtime) => {
                let session = Arc::clone(session);
                runtime.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!(host = %session.host, session_id = %session.id, error = %e, "Failed to close discarded session");
                    }
                });
            }
            Err(_) => {
                debug!(host = %session.host, session_id = %session.id, "No runtime, dropping connection without close");
            }
        }
    }
}

impl Drop for PooledSession {
    fn drop(&mut self) {
        if self.session.is_in_flight() {
            self.discard();
            return;
        }
        self.session.release();
        debug!(host = %self.session.host, session_id = %self.session.id, "Session released");
    }
}

impl fmt::Debug for PooledSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledSession").field(&self.session).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
