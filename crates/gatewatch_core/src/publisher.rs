//! Best-effort write-back of aggregated states to the `latest` resource.
//!
//! The live view never reads `latest`; it recomputes from raw logs each cycle.
//! Write failures are logged at debug level and dropped, with no retry.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{AggregatedState, LatestMap};
use crate::store::Store;

pub fn build_latest_map(states: &[AggregatedState]) -> LatestMap {
    states
        .iter()
        .map(|s| (s.identity_id.clone(), s.to_latest_record()))
        .collect()
}

#[derive(Debug, Default)]
pub struct LatestPublisher {
    last_seen: Vec<AggregatedState>,
    pending: Option<JoinHandle<()>>,
}

impl LatestPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with every freshly aggregated state list. Spawns a merge-write when
    /// the list is non-empty and differs from the previous one; returns whether a
    /// write was issued.
    ///
    /// Writes land in issue order: each one waits for its predecessor first.
    pub fn on_states<S>(&mut self, store: &Arc<S>, states: &[AggregatedState]) -> bool
    where
        S: Store + 'static,
    {
        if states == self.last_seen.as_slice() {
            debug!(entries = states.len(), "latest publish skipped: unchanged");
            return false;
        }
        self.last_seen = states.to_vec();
        if states.is_empty() {
            debug!("latest publish skipped: no states");
            return false;
        }

        let body = build_latest_map(states);
        let store = Arc::clone(store);
        let previous = self.pending.take();
        debug!(entries = body.len(), "latest publish issued");
        self.pending = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                join_publish(previous).await;
            }
            if let Err(e) = store.merge_latest(&body).await {
                debug!(error = %e, "latest publish failed (ignored)");
            }
        }));
        true
    }

    /// Wait for the most recently issued write, and with it every earlier one.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            join_publish(handle).await;
        }
    }
}

async fn join_publish(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        debug!(error = %e, "latest publish task did not complete (ignored)");
    }
}
