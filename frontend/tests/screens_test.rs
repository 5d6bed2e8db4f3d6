//! Text rendering of the derived view.

use gatewatch_core::models::{Device, DeviceRecord, Identity, LogRecord, MemberRecord};
use gatewatch_core::sync::{derive_view, logs_from_records, Snapshot};
use gatewatch_core::{LogLimit, SiteSelection};
use gatewatch_frontend::screens::{render_header, render_members, render_recent_log, render_view, OrgGroup};
use pretty_assertions::assert_eq;

fn snapshot() -> Snapshot {
    let mut snapshot = Snapshot::default();
    snapshot.members.insert(
        "A".to_string(),
        Identity::from_record(
            "A",
            MemberRecord {
                name: Some("Alice".to_string()),
                company: Some("Riverlands".to_string()),
            },
        ),
    );
    snapshot.devices.insert(
        "d1".to_string(),
        Device::from_record(
            "d1",
            DeviceRecord {
                site_id: Some("s1".to_string()),
                site_name: Some("North Yard".to_string()),
                gate: Some("main".to_string()),
            },
        ),
    );
    let mut logs = gatewatch_core::models::LogMap::new();
    for (key, uid, ts) in [("-L1", "A", 1_700_000_000), ("-L2", "A", 1_700_000_060), ("-L3", "B", 1_700_000_030)] {
        logs.insert(
            key.to_string(),
            LogRecord {
                uid: Some(uid.to_string()),
                ts: Some(ts),
                dev: Some("d1".to_string()),
            },
        );
    }
    snapshot.logs = logs_from_records(logs);
    snapshot
}

#[test]
fn header_names_selection_and_sites() {
    let view = derive_view(&snapshot(), &SiteSelection::parse("s1"), LogLimit::Ten);
    assert_eq!(
        render_header(&view),
        vec![
            "Gate view | site: North Yard (s1) | last update: 2023/11/15 07:13:50".to_string(),
            "Sites: s1 North Yard (1 devices)".to_string(),
        ]
    );
}

#[test]
fn stale_selection_is_flagged_in_header() {
    let view = derive_view(&snapshot(), &SiteSelection::parse("gone"), LogLimit::Ten);
    assert!(render_header(&view)[0].contains("gone (unknown, showing all sites)"));
    assert_eq!(view.filtered_count, 3);
}

#[test]
fn members_list_in_first_with_fallbacks() {
    let view = derive_view(&snapshot(), &SiteSelection::All, LogLimit::Fifty);
    let lines = render_members(&view);
    assert_eq!(lines[0], "Members (IN first): 2 members (IN: 1)");
    assert!(lines[1].starts_with("  [IN ] B "));
    assert!(lines[1].ends_with("2023/11/15 07:13:50"));
    assert!(lines[2].starts_with("  [OUT] Alice"));
    assert!(lines[2].contains(&format!("{} Riverlands", OrgGroup::Riverlands.tag())));
    assert!(lines[1].contains(&format!("{} —", OrgGroup::Other.tag())));
}

#[test]
fn organizations_group_coarsely() {
    assert_eq!(OrgGroup::classify(Some("RIVERLANDS Inc.")), OrgGroup::Riverlands);
    assert_eq!(OrgGroup::classify(Some("株式会社リバーランズ")), OrgGroup::Riverlands);
    assert_eq!(OrgGroup::classify(Some("Partner Co")), OrgGroup::Partner);
    assert_eq!(OrgGroup::classify(Some("協力会社A")), OrgGroup::Partner);
    assert_eq!(OrgGroup::classify(Some("竹内塗装")), OrgGroup::Painting);
    assert_eq!(OrgGroup::classify(Some("Acme")), OrgGroup::Other);
    assert_eq!(OrgGroup::classify(None), OrgGroup::Other);
}

#[test]
fn recent_log_newest_first() {
    let view = derive_view(&snapshot(), &SiteSelection::All, LogLimit::Ten);
    let lines = render_recent_log(&view);
    assert_eq!(lines[0], "Recent log (newest first, showing 3 of 3)");
    assert_eq!(lines[1], format!("  2023/11/15 07:14:20  {:<20} OUT  d1", "Alice"));
    assert_eq!(lines[2], format!("  2023/11/15 07:13:50  {:<20} IN   d1", "B"));
    assert_eq!(lines[3], format!("  2023/11/15 07:13:20  {:<20} IN   d1", "Alice"));
}

#[test]
fn full_view_joins_sections() {
    let view = derive_view(&snapshot(), &SiteSelection::All, LogLimit::Ten);
    let text = render_view(&view);
    assert!(text.contains("Members (IN first)"));
    assert!(text.contains("Recent log"));
}
