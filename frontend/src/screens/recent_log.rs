use gatewatch_core::timestamp::format_display;
use gatewatch_core::DashboardView;

pub fn render_recent_log(view: &DashboardView) -> Vec<String> {
    let mut lines = vec![format!(
        "Recent log (newest first, showing {} of {})",
        view.recent.len(),
        view.filtered_count
    )];
    for entry in &view.recent {
        let uid = entry.event.identity();
        let name = if uid.is_empty() { "—" } else { view.display_name(uid) };
        lines.push(format!(
            "  {}  {:<20} {:<3}  {}",
            format_display(entry.event.ts()),
            name,
            entry.state.as_str(),
            entry.event.device_id.as_deref().unwrap_or("—"),
        ));
    }
    lines
}
