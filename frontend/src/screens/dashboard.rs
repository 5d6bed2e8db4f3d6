use gatewatch_core::filter::SiteSelection;
use gatewatch_core::timestamp::{format_display, format_optional};
use gatewatch_core::DashboardView;

const NAME_WIDTH: usize = 20;
const ORG_WIDTH: usize = 18;

/// Coarse organization grouping used to tag member rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrgGroup {
    Riverlands,
    Partner,
    Painting,
    Other,
}

impl OrgGroup {
    pub fn classify(organization: Option<&str>) -> Self {
        let org = organization.unwrap_or("").to_lowercase();
        if org.contains("riverlands") || org.contains("リバーランズ") {
            OrgGroup::Riverlands
        } else if org.contains("partner") || org.contains("協力") {
            OrgGroup::Partner
        } else if org.contains("竹内塗装") {
            OrgGroup::Painting
        } else {
            OrgGroup::Other
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            OrgGroup::Riverlands => "RL",
            OrgGroup::Partner => "PT",
            OrgGroup::Painting => "TP",
            OrgGroup::Other => "--",
        }
    }
}

fn selection_label(view: &DashboardView) -> String {
    match &view.selection {
        SiteSelection::All => "all sites".to_string(),
        SiteSelection::Site(id) => match view.sites.iter().find(|s| &s.site_id == id) {
            Some(site) => format!("{} ({})", site.site_name, site.site_id),
            None => format!("{} (unknown, showing all sites)", id),
        },
    }
}

pub fn render_header(view: &DashboardView) -> Vec<String> {
    let mut lines = vec![format!(
        "Gate view | site: {} | last update: {}",
        selection_label(view),
        format_display(view.last_update)
    )];
    let sites: Vec<String> = view
        .sites
        .iter()
        .map(|s| format!("{} {} ({} devices)", s.site_id, s.site_name, s.member_device_ids.len()))
        .collect();
    if !sites.is_empty() {
        lines.push(format!("Sites: {}", sites.join(", ")));
    }
    lines
}

pub fn render_members(view: &DashboardView) -> Vec<String> {
    let mut lines = vec![format!(
        "Members (IN first): {} members (IN: {})",
        view.states.len(),
        view.in_count
    )];
    for state in &view.states {
        let name = view.display_name(&state.identity_id);
        let organization = view.organization(&state.identity_id);
        lines.push(format!(
            "  [{:<3}] {:<name_w$} {} {:<org_w$} {}",
            state.current_state.as_str(),
            name,
            OrgGroup::classify(organization).tag(),
            organization.unwrap_or("—"),
            format_optional(Some(state.last_timestamp)),
            name_w = NAME_WIDTH,
            org_w = ORG_WIDTH,
        ));
    }
    lines
}
