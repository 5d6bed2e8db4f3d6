//! Narrow the scan log to one site's devices.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::models::{ScanEvent, Site};

pub const ALL_SITES: &str = "all";

/// Site filter selection. `"all"` parses to [`SiteSelection::All`].
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(s.to_string())
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => f.write_str(ALL_SITES),
            SiteSelection::Site(id) => f.write_str(id),
        }
    }
}

impl From<SiteSelection> for String {
    fn from(selection: SiteSelection) -> Self {
        selection.to_string()
    }
}

/// Events produced by the selected site's devices.
///
/// `All` borrows the input unchanged. A selection that matches no known site
/// (stale after a device refresh) also returns the full set.
pub fn filter_logs<'a>(events: &'a [ScanEvent], selection: &SiteSelection, sites: &[Site]) -> Cow<'a, [ScanEvent]> {
    let site_id = match selection {
        SiteSelection::All => return Cow::Borrowed(events),
        SiteSelection::Site(id) => id,
    };
    let Some(site) = sites.iter().find(|s| &s.site_id == site_id) else {
        debug!(site_id = %site_id, "site selection matches no known site, showing all sites");
        return Cow::Borrowed(events);
    };
    let device_ids: HashSet<&str> = site.member_device_ids.iter().map(String::as_str).collect();
    Cow::Owned(
        events
            .iter()
            .filter(|e| device_ids.contains(e.device_id.as_deref().unwrap_or("")))
            .cloned()
            .collect(),
    )
}
