//! REST document store client. Every resource lives at `{base_url}/{name}.json`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use super::{decode_collection, ScanPayload, Store, DEVICES, LATEST, LOGS, MEMBERS};
use crate::error::StoreError;
use crate::models::{DeviceMap, LatestMap, LogMap, MemberMap};

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resource_url(&self, name: &str) -> String {
        format!("{}/{}.json", self.base_url, name)
    }

    async fn get_document(&self, resource: &'static str) -> Result<Value, StoreError> {
        let response = self.client.get(self.resource_url(resource)).send().await?;
        let response = check_status(resource, response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| StoreError::Decode { resource, source })
    }
}

async fn check_status(resource: &'static str, response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        resource,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Store for HttpStore {
    async fn fetch_members(&self) -> Result<MemberMap, StoreError> {
        let body = self.get_document(MEMBERS).await?;
        decode_collection(MEMBERS, body)
    }

    async fn fetch_devices(&self) -> Result<DeviceMap, StoreError> {
        let body = self.get_document(DEVICES).await?;
        decode_collection(DEVICES, body)
    }

    async fn fetch_logs(&self) -> Result<LogMap, StoreError> {
        let body = self.get_document(LOGS).await?;
        decode_collection(LOGS, body)
    }

    async fn merge_latest(&self, latest: &LatestMap) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.resource_url(LATEST))
            .json(latest)
            .send()
            .await?;
        check_status(LATEST, response).await?;
        Ok(())
    }

    async fn append_scan(&self, scan: &ScanPayload) -> Result<String, StoreError> {
        let response = self
            .client
            .post(self.resource_url(LOGS))
            .json(scan)
            .send()
            .await?;
        let response = check_status(LOGS, response).await?;
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|source| StoreError::Decode { resource: LOGS, source })?;
        // The store answers `{"name": "<generated key>"}`.
        Ok(body
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
