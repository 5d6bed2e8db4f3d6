mod dashboard;
mod recent_log;

pub use dashboard::{render_header, render_members, OrgGroup};
pub use recent_log::render_recent_log;

use gatewatch_core::DashboardView;

/// Full board: header, member states, recent log.
pub fn render_view(view: &DashboardView) -> String {
    let mut lines = render_header(view);
    lines.push(String::new());
    lines.extend(render_members(view));
    lines.push(String::new());
    lines.extend(render_recent_log(view));
    lines.join("\n")
}
