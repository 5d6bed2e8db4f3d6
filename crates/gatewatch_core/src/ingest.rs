//! Reader-side scan submission: UID validation and a duplicate-send guard.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::models::MemberMap;
use crate::store::{ScanPayload, Store};

/// A repeat of the last sent UID within this window is dropped.
pub const SEND_COOLDOWN: Duration = Duration::from_millis(700);

const UID_LEN: usize = 10;

/// Shown by the reader for a card that is not on the roster.
pub const UNKNOWN_MEMBER: &str = "UNKNOWN";

/// Card UIDs are exactly 10 hex characters once surrounding whitespace is removed.
pub fn is_valid_uid(uid: &str) -> bool {
    let uid = uid.trim();
    uid.len() == UID_LEN && uid.chars().all(|c| c.is_ascii_hexdigit())
}

/// Roster name for a card, matched on the trimmed uid (case-insensitive), or
/// [`UNKNOWN_MEMBER`] when the card is not listed or has no name.
pub fn roster_name<'a>(members: &'a MemberMap, uid: &str) -> &'a str {
    let uid = uid.trim();
    members
        .get(uid)
        .or_else(|| {
            members
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(uid))
                .map(|(_, record)| record)
        })
        .and_then(|record| record.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_MEMBER)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Posted; carries the key the store assigned.
    Sent(String),
    Invalid,
    Suppressed,
    Failed(String),
}

/// Tracks the last successfully sent scan. Failed sends do not arm the guard,
/// so an immediate retry of the same card goes through.
#[derive(Debug, Default)]
pub struct ScanGate {
    last_sent: Option<(String, Instant)>,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self, uid: &str, now: Instant) -> bool {
        match &self.last_sent {
            Some((last_uid, at)) => last_uid == uid && now.saturating_duration_since(*at) < SEND_COOLDOWN,
            None => false,
        }
    }

    pub async fn submit<S>(&mut self, store: &S, uid: &str, device_id: &str, now: Instant) -> ScanOutcome
    where
        S: Store + ?Sized,
    {
        if !is_valid_uid(uid) {
            debug!(uid = %uid, "scan skipped: invalid uid");
            return ScanOutcome::Invalid;
        }
        let uid = uid.trim();
        if self.is_suppressed(uid, now) {
            debug!(uid = %uid, "scan skipped: within cooldown");
            return ScanOutcome::Suppressed;
        }
        match store.append_scan(&ScanPayload::new(uid, device_id)).await {
            Ok(key) => {
                self.last_sent = Some((uid.to_string(), now));
                debug!(uid = %uid, device = %device_id, key = %key, "scan sent");
                ScanOutcome::Sent(key)
            }
            Err(e) => {
                warn!(uid = %uid, error = %e, "scan send failed");
                ScanOutcome::Failed(e.to_string())
            }
        }
    }
}
