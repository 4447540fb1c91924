//! Per-host verb adapter.
//!
//! A [`VerbAdapter`] shapes each REST verb into exactly one protocol call on
//! a pooled session.
//!
//! | Verb | Primitive | Reply |
//! |------|-----------|-------|
//! | [`create`](VerbAdapter::create) | `add` | `{".id": id}` / 201 |
//! | [`update`](VerbAdapter::update) | `set` | empty / 204 |
//! | [`list`](VerbAdapter::list) | `print` | rows / 200 |
//! | [`delete`](VerbAdapter::delete) | `remove` | empty / 204 |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Attributes, ConnectOptions, Connector, ID_FIELD, Predicate, Query};
use crate::settings::Settings;
use crate::transport::ConnectionPool;

use super::params::ListParams;
use super::reply::Reply;

// ============================================================================
// VerbAdapter
// ============================================================================

/// REST verbs against one host.
///
/// Owns the host's [`ConnectionPool`]. Every method acquires one session,
/// makes one protocol call and releases the session before returning,
/// whether the call succeeded or not.
pub struct VerbAdapter {
    pool: ConnectionPool,
}

impl VerbAdapter {
    /// Creates the adapter for `host`.
    ///
    /// Credentials and transport come from `settings`.
    #[must_use]
    pub fn new(host: impl Into<String>, settings: &Settings, connector: Arc<dyn Connector>) -> Self {
        let options = ConnectOptions::for_host(host, settings);
        Self {
            pool: ConnectionPool::new(options, connector, settings.pool()),
        }
    }

    /// Returns the host name.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        self.pool.host()
    }

    /// Returns the host's session pool.
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}

// ============================================================================
// VerbAdapter - Verbs
// ============================================================================

impl VerbAdapter {
    /// Adds an item.
    ///
    /// # Errors
    ///
    /// Returns the transport error raised while connecting or adding.
    pub async fn create(&self, path: &str, body: Attributes) -> Result<Reply> {
        let session = self.pool.acquire().await?;
        let result = session.add(path, &body).await;
        self.pool.release(session);

        let id = result?;
        debug!(host = %self.host(), path, id = %id, "Item created");
        Ok(Reply::created(id))
    }

    /// Sets attributes on one or more items.
    ///
    /// The ids are joined with `,` into the body's `.id` attribute.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `ids` is empty
    /// - the transport error raised while connecting or updating
    pub async fn update(&self, path: &str, ids: &[String], mut body: Attributes) -> Result<Reply> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("update requires at least one id"));
        }
        body.insert(ID_FIELD.to_string(), Value::String(ids.join(",")));

        let session = self.pool.acquire().await?;
        let result = session.update(path, &body).await;
        self.pool.release(session);

        result?;
        Ok(Reply::no_content())
    }

    /// Prints rows, optionally filtered, projected and truncated.
    ///
    /// When filters are given without explicit fields only `.id` is
    /// requested.
    ///
    /// # Errors
    ///
    /// Returns the transport error raised while connecting or querying.
    pub async fn list(&self, path: &str, params: ListParams) -> Result<Reply> {
        let query = build_query(&params);
        let limit = params.limit.unwrap_or(usize::MAX);

        let session = self.pool.acquire().await?;
        let result = session.query(path, &query).await;
        self.pool.release(session);

        let mut rows = result?;
        rows.truncate(limit);
        debug!(host = %self.host(), path, rows = rows.len(), "Rows listed");
        Ok(Reply::ok(Value::Array(
            rows.into_iter().map(Value::Object).collect(),
        )))
    }

    /// Removes items.
    ///
    /// `id` and `ids` are combined into a single `remove` call. Empty ids are
    /// ignored; when none remain nothing is sent to the device.
    ///
    /// # Errors
    ///
    /// Returns the transport error raised while connecting or removing.
    pub async fn delete(
        &self,
        path: &str,
        id: Option<String>,
        ids: Option<Vec<String>>,
    ) -> Result<Reply> {
        let targets: Vec<String> = id
            .into_iter()
            .chain(ids.into_iter().flatten())
            .filter(|id| !id.is_empty())
            .collect();
        if targets.is_empty() {
            debug!(host = %self.host(), path, "Delete without ids, nothing to do");
            return Ok(Reply::no_content());
        }

        let session = self.pool.acquire().await?;
        let result = session.remove(path, &targets).await;
        self.pool.release(session);

        result?;
        Ok(Reply::no_content())
    }
}

// ============================================================================
// Query Shaping
// ============================================================================

/// Translates list parameters into a device query.
fn build_query(params: &ListParams) -> Query {
    let filters = params.filters.as_ref().filter(|f| !f.is_empty());
    let mut fields = params.fields.clone().unwrap_or_default();
    if filters.is_some() && fields.is_empty() {
        fields.push(ID_FIELD.to_string());
    }

    let predicates = filters
        .into_iter()
        .flatten()
        .map(|(field, value)| Predicate::equals(field.clone(), value.clone()))
        .collect();

    Query { fields, predicates }
}

impl fmt::Debug for VerbAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerbAdapter")
            .field("host", &self.host())
            .field("pool", &self.pool)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;

    use crate::error::TransportErrorKind;
    use crate::protocol::fake::{Call, FakeDevice};

    fn adapter(device: &Arc<FakeDevice>) -> VerbAdapter {
        VerbAdapter::new("r1", &Settings::default(), device.connector())
    }

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    fn interfaces() -> Vec<Value> {
        vec![
            json!({".id": "*1", "name": "ether1", "type": "ether"}),
            json!({".id": "*2", "name": "ether2", "type": "ether"}),
            json!({".id": "*3", "name": "bridge1", "type": "bridge"}),
        ]
    }

    #[tokio::test]
    async fn test_create_returns_new_id() {
        let device = FakeDevice::new();
        let reply = adapter(&device)
            .create("/interface/bridge", attrs(json!({"name": "x"})))
            .await
            .unwrap();

        assert_eq!(reply, Reply::created("*1"));
        assert_eq!(
            device.calls(),
            vec![Call::Add {
                path: "/interface/bridge".into(),
                attributes: attrs(json!({"name": "x"})),
            }]
        );
    }

    #[tokio::test]
    async fn test_update_joins_ids() {
        let device = FakeDevice::new();
        let ids = vec!["*1".to_string(), "*2".to_string()];
        let reply = adapter(&device)
            .update("/interface", &ids, attrs(json!({"disabled": "yes"})))
            .await
            .unwrap();

        assert_eq!(reply, Reply::no_content());
        assert_eq!(
            device.calls(),
            vec![Call::Update {
                path: "/interface".into(),
                attributes: attrs(json!({"disabled": "yes", ".id": "*1,*2"})),
            }]
        );
    }

    #[tokio::test]
    async fn test_update_rejects_empty_ids() {
        let device = FakeDevice::new();
        let err = adapter(&device)
            .update("/interface", &[], Attributes::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(device.calls().is_empty());
        assert_eq!(device.connects(), 0);
    }

    #[tokio::test]
    async fn test_list_with_filters_defaults_to_id_field() {
        let device = FakeDevice::new();
        device.seed("/interface", interfaces());

        let params = ListParams {
            filters: Some(attrs(json!({"name": "ether1"}))),
            ..Default::default()
        };
        let reply = adapter(&device).list("/interface", params).await.unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.payload, json!([{".id": "*1"}]));
        assert_eq!(
            device.calls(),
            vec![Call::Query {
                path: "/interface".into(),
                query: Query::new()
                    .select([ID_FIELD])
                    .filter(Predicate::equals("name", json!("ether1"))),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_explicit_fields_kept() {
        let device = FakeDevice::new();
        device.seed("/interface", interfaces());

        let params = ListParams {
            fields: Some(vec!["name".into()]),
            filters: Some(attrs(json!({"type": "ether"}))),
            ..Default::default()
        };
        let reply = adapter(&device).list("/interface", params).await.unwrap();

        assert_eq!(reply.payload, json!([{"name": "ether1"}, {"name": "ether2"}]));
    }

    #[tokio::test]
    async fn test_list_without_filters_returns_all_columns() {
        let device = FakeDevice::new();
        device.seed("/interface", interfaces());

        let reply = adapter(&device)
            .list("/interface", ListParams::default())
            .await
            .unwrap();

        assert_eq!(reply.payload, Value::Array(interfaces()));
    }

    #[tokio::test]
    async fn test_list_truncates_to_limit_in_device_order() {
        let device = FakeDevice::new();
        device.seed("/interface", interfaces());

        let params = ListParams {
            limit: Some(2),
            ..Default::default()
        };
        let reply = adapter(&device).list("/interface", params).await.unwrap();

        let names: Vec<&str> = reply
            .payload
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["ether1", "ether2"]);
    }

    #[tokio::test]
    async fn test_list_is_repeatable() {
        let device = FakeDevice::new();
        device.seed("/interface", interfaces());
        let adapter = adapter(&device);

        let params = ListParams {
            filters: Some(attrs(json!({"type": "ether"}))),
            ..Default::default()
        };
        let first = adapter.list("/interface", params.clone()).await.unwrap();
        let second = adapter.list("/interface", params).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(device.connects(), 1, "session reused between calls");
    }

    #[tokio::test]
    async fn test_delete_single_id() {
        let device = FakeDevice::new();
        let reply = adapter(&device)
            .delete("/ip/address", Some("*5".into()), None)
            .await
            .unwrap();

        assert_eq!(reply, Reply::no_content());
        assert_eq!(
            device.calls(),
            vec![Call::Remove {
                path: "/ip/address".into(),
                ids: vec!["*5".into()],
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_id_and_ids_is_one_call() {
        let device = FakeDevice::new();
        adapter(&device)
            .delete(
                "/ip/address",
                Some("*1".into()),
                Some(vec!["*2".into(), "*3".into()]),
            )
            .await
            .unwrap();

        assert_eq!(
            device.calls(),
            vec![Call::Remove {
                path: "/ip/address".into(),
                ids: vec!["*1".into(), "*2".into(), "*3".into()],
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_without_ids_is_noop() {
        let device = FakeDevice::new();
        let reply = adapter(&device)
            .delete("/ip/address", None, None)
            .await
            .unwrap();

        assert_eq!(reply, Reply::no_content());
        assert!(device.calls().is_empty());
        assert_eq!(device.connects(), 0);
    }

    #[tokio::test]
    async fn test_session_released_after_failure() {
        let device = FakeDevice::new();
        let adapter = adapter(&device);
        device.fail_next_call(TransportErrorKind::Protocol);

        let err = adapter
            .create("/interface/bridge", attrs(json!({"name": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));

        let stats = adapter.pool().stats();
        assert_eq!(stats.busy, 0);
        assert_eq!(stats.idle, 1);

        adapter
            .create("/interface/bridge", attrs(json!({"name": "y"})))
            .await
            .unwrap();
        assert_eq!(device.connects(), 1);
    }

    #[tokio::test]
    async fn test_delete_with_empty_ids_is_noop() {
        let device = FakeDevice::new();
        let adapter = adapter(&device);

        let reply = adapter
            .delete("/ip/address", Some(String::new()), Some(vec![String::new()]))
            .await
            .unwrap();
        assert_eq!(reply, Reply::no_content());
        assert!(device.calls().is_empty());

        adapter
            .delete("/ip/address", Some(String::new()), Some(vec!["*4".into()]))
            .await
            .unwrap();
        assert_eq!(
            device.calls(),
            vec![Call::Remove {
                path: "/ip/address".into(),
                ids: vec!["*4".into()],
            }]
        );
    }

    #[tokio::test]
    async fn test_cancelled_call_discards_session() {
        let device = FakeDevice::new();
        device.seed("/interface", interfaces());
        device.set_call_delay(Duration::from_millis(200));
        let adapter = adapter(&device);

        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            adapter.list("/interface", ListParams::default()),
        )
        .await;
        assert!(cancelled.is_err());

        let stats = adapter.pool().stats();
        assert_eq!(stats.idle, 0);
        assert_eq!(stats.total, 0);

        device.set_call_delay(Duration::ZERO);
        let reply = adapter
            .list("/interface", ListParams::default())
            .await
            .unwrap();
        assert_eq!(reply.payload, Value::Array(interfaces()));
        assert_eq!(device.connects(), 2);
    }

    #[test]
    fn test_build_query_empty_filters_keep_all_fields() {
        let params = ListParams {
            filters: Some(Attributes::new()),
            ..Default::default()
        };
        assert_eq!(build_query(&params), Query::new());
    }
}
