//! Pure per-identity state derivation from a scan set.
//! Every scan toggles presence: odd counts are IN, even counts are OUT.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{AggregatedState, PresenceState, ScanEvent};

/// Ascending timestamp order shared by the aggregator and the activity tagger.
/// Ties are broken by event id so both walks see the same sequence.
pub fn chronological(a: &ScanEvent, b: &ScanEvent) -> Ordering {
    a.ts().cmp(&b.ts()).then_with(|| a.id.cmp(&b.id))
}

/// Newest-first order, the exact reverse of [`chronological`].
pub fn newest_first(a: &ScanEvent, b: &ScanEvent) -> Ordering {
    chronological(b, a)
}

#[derive(Default)]
struct Tally {
    last_ts: i64,
    count: usize,
}

/// One entry per identity in `events`, IN before OUT, most recently active first
/// within each group. Scans without an identity are ignored.
///
/// Duplicate or replayed scans are not corrected; each one flips the state.
pub fn aggregate_states(events: &[ScanEvent]) -> Vec<AggregatedState> {
    let mut sorted: Vec<&ScanEvent> = events.iter().collect();
    sorted.sort_by(|a, b| chronological(a, b));

    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for event in sorted {
        let uid = event.identity();
        if uid.is_empty() {
            continue;
        }
        let tally = tallies.entry(uid).or_default();
        tally.last_ts = tally.last_ts.max(event.ts());
        tally.count += 1;
    }

    let mut states: Vec<AggregatedState> = tallies
        .into_iter()
        .map(|(uid, tally)| AggregatedState {
            identity_id: uid.to_string(),
            last_timestamp: tally.last_ts,
            scan_count: tally.count,
            current_state: PresenceState::from_scan_count(tally.count),
        })
        .collect();
    states.sort_by(|a, b| {
        b.current_state
            .as_flag()
            .cmp(&a.current_state.as_flag())
            .then_with(|| b.last_timestamp.cmp(&a.last_timestamp))
            .then_with(|| a.identity_id.cmp(&b.identity_id))
    });
    states
}

pub fn count_in(states: &[AggregatedState]) -> usize {
    states
        .iter()
        .filter(|s| s.current_state == PresenceState::In)
        .count()
}
