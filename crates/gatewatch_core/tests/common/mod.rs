//! Shared fixtures: scan builders, an in-memory store, and an HTTP store emulator.
#![allow(dead_code)]

pub mod rest_server;

use std::sync::Mutex;

use async_trait::async_trait;
use gatewatch_core::error::StoreError;
use gatewatch_core::models::{
    DeviceMap, DeviceRecord, LatestMap, LogMap, LogRecord, MemberMap, MemberRecord, ScanEvent,
};
use gatewatch_core::store::{ScanPayload, Store};

pub fn scan(id: &str, uid: &str, ts: i64) -> ScanEvent {
    ScanEvent {
        id: id.to_string(),
        identity_id: Some(uid.to_string()),
        timestamp: Some(ts),
        device_id: None,
    }
}

pub fn scan_at(id: &str, uid: &str, ts: i64, dev: &str) -> ScanEvent {
    ScanEvent {
        device_id: Some(dev.to_string()),
        ..scan(id, uid, ts)
    }
}

pub fn log_record(uid: &str, ts: i64, dev: &str) -> LogRecord {
    LogRecord {
        uid: Some(uid.to_string()),
        ts: Some(ts),
        dev: Some(dev.to_string()),
    }
}

pub fn device_record(site_id: Option<&str>, site_name: Option<&str>) -> DeviceRecord {
    DeviceRecord {
        site_id: site_id.map(str::to_string),
        site_name: site_name.map(str::to_string),
        gate: None,
    }
}

pub fn member_record(name: &str, company: &str) -> MemberRecord {
    MemberRecord {
        name: Some(name.to_string()),
        company: Some(company.to_string()),
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub members: MemberMap,
    pub devices: DeviceMap,
    pub logs: LogMap,
    pub fail_members: bool,
    pub fail_devices: bool,
    pub fail_logs: bool,
    pub fail_writes: bool,
    pub merges: Vec<LatestMap>,
    pub appended: Vec<ScanPayload>,
}

/// In-memory store with per-collection failure switches and a write log.
#[derive(Debug, Default)]
pub struct FakeStore {
    pub state: Mutex<FakeState>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F: FnOnce(&mut FakeState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn merges(&self) -> Vec<LatestMap> {
        self.state.lock().unwrap().merges.clone()
    }

    pub fn appended(&self) -> Vec<ScanPayload> {
        self.state.lock().unwrap().appended.clone()
    }
}

fn unavailable(resource: &'static str) -> StoreError {
    StoreError::Status {
        resource,
        status: 503,
        body: "unavailable".to_string(),
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn fetch_members(&self) -> Result<MemberMap, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_members {
            return Err(unavailable("members"));
        }
        Ok(state.members.clone())
    }

    async fn fetch_devices(&self) -> Result<DeviceMap, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_devices {
            return Err(unavailable("devices"));
        }
        Ok(state.devices.clone())
    }

    async fn fetch_logs(&self) -> Result<LogMap, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_logs {
            return Err(unavailable("logs"));
        }
        Ok(state.logs.clone())
    }

    async fn merge_latest(&self, latest: &LatestMap) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.merges.push(latest.clone());
        if state.fail_writes {
            return Err(unavailable("latest"));
        }
        Ok(())
    }

    async fn append_scan(&self, scan: &ScanPayload) -> Result<String, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(unavailable("logs"));
        }
        state.appended.push(scan.clone());
        Ok(format!("-N{:04}", state.appended.len()))
    }
}
