//! Group devices into sites by `site_id`.

use std::collections::BTreeMap;

use crate::models::{Device, Site, UNKNOWN_SITE_ID};

/// Sites in first-seen order of their devices. Devices without a site (missing or
/// empty `site_id`) fall into [`UNKNOWN_SITE_ID`]; a missing or empty display name
/// falls back to the site id.
///
/// Callers must not rely on site order staying the same across refreshes.
pub fn group_sites(devices: &BTreeMap<String, Device>) -> Vec<Site> {
    let mut sites: Vec<Site> = Vec::new();
    for (device_id, device) in devices {
        let site_id = device
            .site_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SITE_ID);
        match sites.iter_mut().find(|s| s.site_id == site_id) {
            Some(site) => site.member_device_ids.push(device_id.clone()),
            None => sites.push(Site {
                site_id: site_id.to_string(),
                site_name: device
                    .site_name
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(site_id)
                    .to_string(),
                member_device_ids: vec![device_id.clone()],
            }),
        }
    }
    sites
}
