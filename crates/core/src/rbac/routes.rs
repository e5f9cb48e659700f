//! Static route fragment to tab tables.

use super::Tab;

/// Export paths, checked before [`ROUTE_TAB_MAP`].
pub const EXPORT_TAB_MAP: &[(&str, Tab)] = &[
    ("/export/labour", Tab::Labour),
    ("/export/helpers", Tab::Labour),
    ("/export/security-boats", Tab::SecurityBoats),
    ("/export/picture-boats", Tab::PictureBoats),
    ("/export/transport", Tab::Transport),
    ("/export/fuel", Tab::Fuel),
    ("/export/fuel-budget", Tab::Fuel),
    ("/export/fnb-budget", Tab::Fnb),
    ("/export/guard-camp", Tab::Guards),
    ("/export/budget-global", Tab::Budget),
    ("/export/csv", Tab::Boats),
    ("/export/json", Tab::Boats),
];

/// Path fragments in match order. Longer fragments that share a prefix
/// with a shorter one come first.
pub const ROUTE_TAB_MAP: &[(&str, Tab)] = &[
    ("/shooting-days", Tab::Pdt),
    ("/events", Tab::Pdt),
    ("/parse-pdt", Tab::Pdt),
    ("/upload-pdt", Tab::Pdt),
    ("/location-schedules", Tab::Locations),
    ("/location-sites", Tab::Locations),
    ("/sync-pdt-locations", Tab::Locations),
    ("/locations", Tab::Locations),
    ("/picture-boat-assignments", Tab::PictureBoats),
    ("/picture-boats", Tab::PictureBoats),
    ("/security-boat-assignments", Tab::SecurityBoats),
    ("/security-boats", Tab::SecurityBoats),
    ("/security-auto-fill", Tab::SecurityBoats),
    ("/boat-functions", Tab::Boats),
    ("/assignments", Tab::Boats),
    ("/boats", Tab::Boats),
    ("/auto-match-photos", Tab::Boats),
    ("/migrate-boat-photos", Tab::Boats),
    ("/transport-vehicles", Tab::Transport),
    ("/transport-assignments", Tab::Transport),
    ("/fuel-entries", Tab::Fuel),
    ("/fuel-machinery", Tab::Fuel),
    ("/fuel-prices", Tab::Fuel),
    ("/fuel-locked-prices", Tab::Fuel),
    ("/helper-assignments", Tab::Labour),
    ("/helpers", Tab::Labour),
    ("/guard-schedules", Tab::Guards),
    ("/guard-posts", Tab::Guards),
    ("/guard-camp-assignments", Tab::Guards),
    ("/guard-camp-workers", Tab::Guards),
    ("/guard-location", Tab::Guards),
    ("/fnb-categories", Tab::Fnb),
    ("/fnb-items", Tab::Fnb),
    ("/fnb-entries", Tab::Fnb),
    ("/fnb-tracking", Tab::Fnb),
    ("/fnb-summary", Tab::Fnb),
    ("/fnb-budget", Tab::Fnb),
    ("/budget", Tab::Budget),
];

/// Returns the tab a path belongs to, or `None` for paths outside every tab.
#[must_use]
pub fn tab_for_route(path: &str) -> Option<Tab> {
    EXPORT_TAB_MAP
        .iter()
        .chain(ROUTE_TAB_MAP)
        .find(|(fragment, _)| path.contains(fragment))
        .map(|&(_, tab)| tab)
}
