//! Recent activity feed: each scan tagged with the state it produced.

use std::collections::HashMap;

use crate::aggregate::chronological;
use crate::models::{PresenceState, ScanEvent, TaggedLogEntry};

/// Tag every scan with its identity's state right after it, newest first,
/// truncated to `limit`.
///
/// Uses the same chronological walk and toggle rule as
/// [`aggregate_states`](crate::aggregate::aggregate_states), so the newest entry
/// per identity always agrees with the aggregated state. Scans without an
/// identity are still listed and share one anonymous toggle.
pub fn tag_recent(events: &[ScanEvent], limit: usize) -> Vec<TaggedLogEntry> {
    let mut sorted: Vec<&ScanEvent> = events.iter().collect();
    sorted.sort_by(|a, b| chronological(a, b));

    let mut parity: HashMap<&str, PresenceState> = HashMap::new();
    let mut tagged: Vec<TaggedLogEntry> = Vec::with_capacity(sorted.len());
    for event in sorted {
        let state = parity.entry(event.identity()).or_default();
        *state = state.toggled();
        tagged.push(TaggedLogEntry {
            event: event.clone(),
            state: *state,
        });
    }

    tagged.reverse();
    tagged.truncate(limit);
    tagged
}
