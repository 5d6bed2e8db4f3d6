//! Data models for members, devices, scan logs and derived presence state.
//! Wire records mirror the store's JSON documents; domain types are what the
//! derivation functions work on.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Site id used for devices that carry no `site_id`.
pub const UNKNOWN_SITE_ID: &str = "unknown";

// --- Wire records ---

/// `members/{uid}` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// `devices/{device_id}` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub gate: Option<String>,
}

/// `logs/{entry_id}` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub dev: Option<String>,
}

/// `latest/{uid}` document written back by the publisher. `state` is 1 for IN, 0 for OUT.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRecord {
    pub uid: String,
    pub ts: i64,
    pub state: u8,
}

pub type MemberMap = BTreeMap<String, MemberRecord>;
pub type DeviceMap = BTreeMap<String, DeviceRecord>;
pub type LogMap = BTreeMap<String, LogRecord>;
pub type LatestMap = BTreeMap<String, LatestRecord>;

/// Accepts integers, floats (truncated) and numeric strings; anything else is treated as missing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

pub(crate) fn timestamp_from_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

// --- Domain types ---

/// A tracked badge holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub identity_id: String,
    pub display_name: Option<String>,
    pub organization: Option<String>,
}

impl Identity {
    pub fn from_record(identity_id: &str, record: MemberRecord) -> Self {
        Self {
            identity_id: identity_id.to_string(),
            display_name: record.name,
            organization: record.company,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Device {
    pub device_id: String,
    pub site_id: Option<String>,
    pub site_name: Option<String>,
    pub gate_label: Option<String>,
}

impl Device {
    pub fn from_record(device_id: &str, record: DeviceRecord) -> Self {
        Self {
            device_id: device_id.to_string(),
            site_id: record.site_id,
            site_name: record.site_name,
            gate_label: record.gate,
        }
    }
}

/// A single badge read. Immutable once fetched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanEvent {
    pub id: String,
    pub identity_id: Option<String>,
    pub timestamp: Option<i64>,
    pub device_id: Option<String>,
}

impl ScanEvent {
    pub fn from_record(id: &str, record: LogRecord) -> Self {
        Self {
            id: id.to_string(),
            identity_id: record.uid,
            timestamp: record.ts,
            device_id: record.dev,
        }
    }

    /// Sort key: missing timestamps count as 0.
    pub fn ts(&self) -> i64 {
        self.timestamp.unwrap_or(0)
    }

    /// Identity id, or `""` when the scan carries none.
    pub fn identity(&self) -> &str {
        self.identity_id.as_deref().unwrap_or("")
    }
}

/// Devices sharing one `site_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Site {
    pub site_id: String,
    pub site_name: String,
    pub member_device_ids: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PresenceState {
    In,
    #[default]
    Out,
}

impl PresenceState {
    /// Odd scan counts are IN, even counts are OUT.
    pub fn from_scan_count(count: usize) -> Self {
        if count % 2 == 1 {
            PresenceState::In
        } else {
            PresenceState::Out
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PresenceState::In => PresenceState::Out,
            PresenceState::Out => PresenceState::In,
        }
    }

    /// Wire flag used by the `latest` resource.
    pub fn as_flag(self) -> u8 {
        match self {
            PresenceState::In => 1,
            PresenceState::Out => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PresenceState::In => "IN",
            PresenceState::Out => "OUT",
        }
    }
}

/// Per-identity state derived from the filtered scan set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AggregatedState {
    pub identity_id: String,
    pub last_timestamp: i64,
    pub scan_count: usize,
    pub current_state: PresenceState,
}

impl AggregatedState {
    pub fn to_latest_record(&self) -> LatestRecord {
        LatestRecord {
            uid: self.identity_id.clone(),
            ts: self.last_timestamp,
            state: self.current_state.as_flag(),
        }
    }
}

/// A scan tagged with the state its identity held right after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedLogEntry {
    #[serde(flatten)]
    pub event: ScanEvent,
    pub state: PresenceState,
}

/// Recent-log display count. Only 10, 30 and 50 are offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(into = "usize")]
pub enum LogLimit {
    Ten,
    Thirty,
    #[default]
    Fifty,
}

impl LogLimit {
    pub const ALLOWED: [usize; 3] = [10, 30, 50];

    pub fn get(self) -> usize {
        match self {
            LogLimit::Ten => 10,
            LogLimit::Thirty => 30,
            LogLimit::Fifty => 50,
        }
    }
}

impl From<LogLimit> for usize {
    fn from(limit: LogLimit) -> Self {
        limit.get()
    }
}

impl TryFrom<usize> for LogLimit {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            10 => Ok(LogLimit::Ten),
            30 => Ok(LogLimit::Thirty),
            50 => Ok(LogLimit::Fifty),
            other => Err(format!("log limit must be one of 10, 30, 50 (got {})", other)),
        }
    }
}

impl std::str::FromStr for LogLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: usize = s
            .trim()
            .parse()
            .map_err(|_| format!("log limit must be a number (got {:?})", s))?;
        Self::try_from(n)
    }
}
