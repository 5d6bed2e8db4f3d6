//! Store port: the three read collections, the `latest` cache, and scan appends.

mod http;

pub use http::HttpStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::models::{DeviceMap, LatestMap, LogMap, MemberMap};

pub const MEMBERS: &str = "members";
pub const DEVICES: &str = "devices";
pub const LOGS: &str = "logs";
pub const LATEST: &str = "latest";

/// Body of a scan append. `ts` is a server-time placeholder, resolved by the store.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanPayload {
    pub uid: String,
    pub ts: Value,
    pub dev: String,
}

impl ScanPayload {
    pub fn new(uid: &str, device_id: &str) -> Self {
        Self {
            uid: uid.to_string(),
            ts: serde_json::json!({ ".sv": "timestamp" }),
            dev: device_id.to_string(),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn fetch_members(&self) -> Result<MemberMap, StoreError>;
    async fn fetch_devices(&self) -> Result<DeviceMap, StoreError>;
    async fn fetch_logs(&self) -> Result<LogMap, StoreError>;
    /// Partial merge into `latest`; keys not in `latest` are left alone.
    async fn merge_latest(&self, latest: &LatestMap) -> Result<(), StoreError>;
    /// Append a scan to `logs`, returning the key the store assigned.
    async fn append_scan(&self, scan: &ScanPayload) -> Result<String, StoreError>;
}

/// Decode a collection document. `null` is an empty collection; entries that do not
/// decode become default records instead of failing the whole fetch.
pub fn decode_collection<T>(resource: &'static str, body: Value) -> Result<BTreeMap<String, T>, StoreError>
where
    T: DeserializeOwned + Default,
{
    match body {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(key, value)| {
                let record = serde_json::from_value(value).unwrap_or_default();
                (key, record)
            })
            .collect()),
        Value::Array(_) => Err(StoreError::Shape { resource, found: "array" }),
        Value::Bool(_) => Err(StoreError::Shape { resource, found: "bool" }),
        Value::Number(_) => Err(StoreError::Shape { resource, found: "number" }),
        Value::String(_) => Err(StoreError::Shape { resource, found: "string" }),
    }
}
