//! Refresh cycle and view state container.
//!
//! `Dashboard` owns the last good copy of the three collections. Each refresh
//! fetches all three concurrently and replaces each one that succeeded; a failed
//! fetch keeps the previous data so the view goes stale instead of empty.
//! Derived values are recomputed in dependency order after every change:
//! sites, filtered logs, aggregated states, tagged recent entries.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::activity::tag_recent;
use crate::aggregate::{aggregate_states, count_in, newest_first};
use crate::filter::{filter_logs, SiteSelection};
use crate::models::{
    AggregatedState, Device, Identity, LogLimit, LogMap, ScanEvent, Site, TaggedLogEntry,
};
use crate::publisher::LatestPublisher;
use crate::sites::group_sites;
use crate::store::{Store, DEVICES, LOGS, MEMBERS};

/// Raw collections as last fetched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub members: BTreeMap<String, Identity>,
    pub devices: BTreeMap<String, Device>,
    /// Newest first.
    pub logs: Vec<ScanEvent>,
}

/// Flatten the log mapping into scans, newest first. Missing timestamps sort as 0.
pub fn logs_from_records(records: LogMap) -> Vec<ScanEvent> {
    let mut logs: Vec<ScanEvent> = records
        .into_iter()
        .map(|(id, record)| ScanEvent::from_record(&id, record))
        .collect();
    logs.sort_by(newest_first);
    logs
}

/// Which collections were replaced by a refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub members: bool,
    pub devices: bool,
    pub logs: bool,
}

impl RefreshOutcome {
    pub fn all_ok(&self) -> bool {
        self.members && self.devices && self.logs
    }
}

/// Everything the renderer needs, computed from one consistent snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: SiteSelection,
    pub log_limit: LogLimit,
    pub sites: Vec<Site>,
    pub filtered_count: usize,
    pub states: Vec<AggregatedState>,
    pub in_count: usize,
    /// Timestamp of the first aggregated entry, 0 when there is none.
    pub last_update: i64,
    pub recent: Vec<TaggedLogEntry>,
    pub members: BTreeMap<String, Identity>,
    pub devices: BTreeMap<String, Device>,
}

impl DashboardView {
    /// Member name, falling back to the identity id.
    pub fn display_name<'a>(&'a self, identity_id: &'a str) -> &'a str {
        self.members
            .get(identity_id)
            .and_then(|m| m.display_name.as_deref())
            .unwrap_or(identity_id)
    }

    pub fn organization(&self, identity_id: &str) -> Option<&str> {
        self.members
            .get(identity_id)
            .and_then(|m| m.organization.as_deref())
    }
}

/// Pure derivation of the view from a snapshot and the current settings.
pub fn derive_view(snapshot: &Snapshot, selection: &SiteSelection, log_limit: LogLimit) -> DashboardView {
    let sites = group_sites(&snapshot.devices);
    let filtered = filter_logs(&snapshot.logs, selection, &sites);
    let states = aggregate_states(&filtered);
    let recent = tag_recent(&filtered, log_limit.get());
    DashboardView {
        selection: selection.clone(),
        log_limit,
        filtered_count: filtered.len(),
        in_count: count_in(&states),
        last_update: states.first().map(|s| s.last_timestamp).unwrap_or(0),
        sites,
        states,
        recent,
        members: snapshot.members.clone(),
        devices: snapshot.devices.clone(),
    }
}

/// User controls delivered to the refresh loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewCommand {
    Reload,
    SelectSite(SiteSelection),
    SetLogLimit(LogLimit),
    Quit,
}

pub struct Dashboard<S: Store + 'static> {
    store: Arc<S>,
    snapshot: Snapshot,
    selection: SiteSelection,
    log_limit: LogLimit,
    view: DashboardView,
    publisher: LatestPublisher,
}

impl<S: Store + 'static> Dashboard<S> {
    pub fn new(store: Arc<S>, selection: SiteSelection, log_limit: LogLimit) -> Self {
        let snapshot = Snapshot::default();
        let view = derive_view(&snapshot, &selection, log_limit);
        Self {
            store,
            snapshot,
            selection,
            log_limit,
            view,
            publisher: LatestPublisher::new(),
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// One refresh cycle: three concurrent fetches, per-collection replace on success.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        debug!("refresh cycle start");
        let (members, devices, logs) = tokio::join!(
            self.store.fetch_members(),
            self.store.fetch_devices(),
            self.store.fetch_logs(),
        );

        let mut outcome = RefreshOutcome::default();
        match members {
            Ok(records) => {
                self.snapshot.members = records
                    .into_iter()
                    .map(|(id, record)| {
                        let identity = Identity::from_record(&id, record);
                        (id, identity)
                    })
                    .collect();
                outcome.members = true;
            }
            Err(e) => warn!(collection = MEMBERS, error = %e, "fetch failed, keeping previous data"),
        }
        match devices {
            Ok(records) => {
                self.snapshot.devices = records
                    .into_iter()
                    .map(|(id, record)| {
                        let device = Device::from_record(&id, record);
                        (id, device)
                    })
                    .collect();
                outcome.devices = true;
            }
            Err(e) => warn!(collection = DEVICES, error = %e, "fetch failed, keeping previous data"),
        }
        match logs {
            Ok(records) => {
                self.snapshot.logs = logs_from_records(records);
                outcome.logs = true;
            }
            Err(e) => warn!(collection = LOGS, error = %e, "fetch failed, keeping previous data"),
        }

        self.recompute();
        debug!(
            members = self.snapshot.members.len(),
            devices = self.snapshot.devices.len(),
            logs = self.snapshot.logs.len(),
            states = self.view.states.len(),
            "refresh cycle applied"
        );
        outcome
    }

    pub fn select_site(&mut self, selection: SiteSelection) {
        self.selection = selection;
        self.recompute();
    }

    pub fn set_log_limit(&mut self, log_limit: LogLimit) {
        self.log_limit = log_limit;
        self.recompute();
    }

    /// Wait for the latest-state write issued by the most recent recompute.
    pub async fn flush_publish(&mut self) {
        self.publisher.flush().await;
    }

    fn recompute(&mut self) {
        let view = derive_view(&self.snapshot, &self.selection, self.log_limit);
        self.publisher.on_states(&self.store, &view.states);
        self.view = view;
    }

    /// Refresh every `period` (first tick immediately) and apply commands until
    /// `Quit` arrives or the command channel closes. `on_update` sees the view
    /// after every change.
    pub async fn run<F>(&mut self, period: Duration, mut commands: mpsc::Receiver<ViewCommand>, mut on_update: F)
    where
        F: FnMut(&DashboardView),
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = period.as_millis() as u64, "refresh loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh().await;
                    on_update(&self.view);
                }
                command = commands.recv() => match command {
                    Some(ViewCommand::Reload) => {
                        info!("manual reload");
                        self.refresh().await;
                        ticker.reset();
                        on_update(&self.view);
                    }
                    Some(ViewCommand::SelectSite(selection)) => {
                        self.select_site(selection);
                        on_update(&self.view);
                    }
                    Some(ViewCommand::SetLogLimit(limit)) => {
                        self.set_log_limit(limit);
                        on_update(&self.view);
                    }
                    Some(ViewCommand::Quit) | None => break,
                },
            }
        }
        info!("refresh loop stopped");
    }
}
