//! In-memory device speaking the [`ApiConnection`] contract.
//!
//! Records every primitive call, can inject transport failures and serves
//! rows from per-path tables.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::{Error, Result, TransportErrorKind};

use super::connection::{ApiConnection, ConnectOptions, Connector};
use super::query::{Attributes, ID_FIELD, Query, Row};

/// One recorded primitive call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Add { path: String, attributes: Attributes },
    Update { path: String, attributes: Attributes },
    Query { path: String, query: Query },
    Remove { path: String, ids: Vec<String> },
}

#[derive(Default)]
pub(crate) struct FakeDevice {
    tables: Mutex<FxHashMap<String, Vec<Row>>>,
    calls: Mutex<Vec<Call>>,
    connects: AtomicUsize,
    closes: AtomicUsize,
    next_item: AtomicUsize,
    fail_connect: Mutex<Option<TransportErrorKind>>,
    fail_next_call: Mutex<Option<TransportErrorKind>>,
    connect_delay: Mutex<Duration>,
    queued_connect_delays: Mutex<VecDeque<Duration>>,
    call_delay: Mutex<Duration>,
}

impl FakeDevice {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn connector(self: &Arc<Self>) -> Arc<dyn Connector> {
        Arc::new(FakeConnector(Arc::clone(self)))
    }

    pub(crate) fn seed(&self, path: &str, rows: Vec<Value>) {
        let rows = rows
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        self.tables.lock().insert(path.to_string(), rows);
    }

    pub(crate) fn rows(&self, path: &str) -> Vec<Row> {
        self.tables.lock().get(path).cloned().unwrap_or_default()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_connect(&self, kind: TransportErrorKind) {
        *self.fail_connect.lock() = Some(kind);
    }

    pub(crate) fn fail_next_call(&self, kind: TransportErrorKind) {
        *self.fail_next_call.lock() = Some(kind);
    }

    pub(crate) fn set_connect_delay(&self, delay: Duration) {
        *self.connect_delay.lock() = delay;
    }

    /// Delays consumed one per connect, ahead of the fixed delay.
    pub(crate) fn queue_connect_delays(&self, delays: impl IntoIterator<Item = Duration>) {
        self.queued_connect_delays.lock().extend(delays);
    }

    pub(crate) fn set_call_delay(&self, delay: Duration) {
        *self.call_delay.lock() = delay;
    }

    async fn begin(&self, call: Call) -> Result<()> {
        self.calls.lock().push(call);
        let delay = *self.call_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.fail_next_call.lock().take() {
            Some(kind) => Err(Error::transport(kind, "injected failure")),
            None => Ok(()),
        }
    }
}

struct FakeConnector(Arc<FakeDevice>);

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, _options: &ConnectOptions) -> Result<Box<dyn ApiConnection>> {
        let queued = self.0.queued_connect_delays.lock().pop_front();
        let delay = queued.unwrap_or_else(|| *self.0.connect_delay.lock());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(kind) = *self.0.fail_connect.lock() {
            return Err(Error::transport(kind, "injected connect failure"));
        }
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            device: Arc::clone(&self.0),
        }))
    }
}

struct FakeConnection {
    device: Arc<FakeDevice>,
}

#[async_trait]
impl ApiConnection for FakeConnection {
    async fn add(&mut self, path: &str, attributes: &Attributes) -> Result<String> {
        self.device
            .begin(Call::Add {
                path: path.to_string(),
                attributes: attributes.clone(),
            })
            .await?;
        let n = self.device.next_item.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("*{n:X}");
        let mut row = attributes.clone();
        row.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.device
            .tables
            .lock()
            .entry(path.to_string())
            .or_default()
            .push(row);
        Ok(id)
    }

    async fn update(&mut self, path: &str, attributes: &Attributes) -> Result<()> {
        self.device
            .begin(Call::Update {
                path: path.to_string(),
                attributes: attributes.clone(),
            })
            .await?;
        let ids: Vec<&str> = attributes
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map(|s| s.split(',').collect())
            .unwrap_or_default();
        let mut tables = self.device.tables.lock();
        let rows = tables.entry(path.to_string()).or_default();
        for row in rows.iter_mut() {
            let matches = row
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|id| ids.contains(&id));
            if matches {
                for (k, v) in attributes.iter().filter(|(k, _)| *k != ID_FIELD) {
                    row.insert(k.clone(), v.clone());
                }
            }
        }
        Ok(())
    }

    async fn query(&mut self, path: &str, query: &Query) -> Result<Vec<Row>> {
        self.device
            .begin(Call::Query {
                path: path.to_string(),
                query: query.clone(),
            })
            .await?;
        Ok(self
            .device
            .rows(path)
            .iter()
            .filter(|row| query.matches(row))
            .map(|row| query.project(row))
            .collect())
    }

    async fn remove(&mut self, path: &str, ids: &[String]) -> Result<()> {
        self.device
            .begin(Call::Remove {
                path: path.to_string(),
                ids: ids.to_vec(),
            })
            .await?;
        let mut tables = self.device.tables.lock();
        let rows = tables.entry(path.to_string()).or_default();
        rows.retain(|row| {
            !row
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|id| ids.iter().any(|x| x == id))
        });
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.device.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
