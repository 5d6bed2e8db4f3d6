//! Gate attendance core: polls members, devices and scan logs from a REST
//! document store, derives per-person IN/OUT state by scan parity, and writes
//! the result back to `latest` as a best-effort cache.

pub mod activity;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod models;
pub mod publisher;
pub mod sites;
pub mod store;
pub mod sync;
pub mod timestamp;

pub use config::Config;
pub use error::StoreError;
pub use filter::SiteSelection;
pub use models::{AggregatedState, LogLimit, PresenceState, ScanEvent, TaggedLogEntry};
pub use store::{HttpStore, Store};
pub use sync::{Dashboard, DashboardView, RefreshOutcome, ViewCommand};
