//! Resource kinds that can be assigned to functions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of assignable resource. Each kind has its own URL segments and
/// budget department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Boat working for a unit function.
    Boat,
    /// Boat that appears on camera.
    PictureBoat,
    /// Safety boat.
    SecurityBoat,
    /// Ground transport vehicle.
    Transport,
    /// Local helper (labour).
    Helper,
    /// Base-camp guard.
    GuardCamp,
}

/// Error returned for an unknown resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource kind: {0}")]
pub struct ResourceKindParseError(pub String);

impl ResourceKind {
    /// Every kind, in budget order.
    pub const ALL: [Self; 6] = [
        Self::Boat,
        Self::PictureBoat,
        Self::SecurityBoat,
        Self::Transport,
        Self::Helper,
        Self::GuardCamp,
    ];

    /// Value stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boat => "boat",
            Self::PictureBoat => "picture_boat",
            Self::SecurityBoat => "security_boat",
            Self::Transport => "transport",
            Self::Helper => "helper",
            Self::GuardCamp => "guard_camp",
        }
    }

    /// Budget department the kind's assignments roll up into.
    #[must_use]
    pub const fn department(self) -> &'static str {
        match self {
            Self::Boat => "BOATS",
            Self::PictureBoat => "PICTURE BOATS",
            Self::SecurityBoat => "SECURITY BOATS",
            Self::Transport => "TRANSPORT",
            Self::Helper => "LABOUR",
            Self::GuardCamp => "GUARDS",
        }
    }

    /// Collection segment for the resources themselves.
    #[must_use]
    pub const fn resource_segment(self) -> &'static str {
        match self {
            Self::Boat => "boats",
            Self::PictureBoat => "picture-boats",
            Self::SecurityBoat => "security-boats",
            Self::Transport => "transport-vehicles",
            Self::Helper => "helpers",
            Self::GuardCamp => "guard-camp-workers",
        }
    }

    /// Collection segment for the kind's assignments.
    #[must_use]
    pub const fn assignment_segment(self) -> &'static str {
        match self {
            Self::Boat => "assignments",
            Self::PictureBoat => "picture-boat-assignments",
            Self::SecurityBoat => "security-boat-assignments",
            Self::Transport => "transport-assignments",
            Self::Helper => "helper-assignments",
            Self::GuardCamp => "guard-camp-assignments",
        }
    }

    /// Segment used in `/export/{segment}/csv`, `None` for boats which
    /// export through `/export/csv`.
    #[must_use]
    pub const fn export_segment(self) -> Option<&'static str> {
        match self {
            Self::Boat => None,
            Self::PictureBoat => Some("picture-boats"),
            Self::SecurityBoat => Some("security-boats"),
            Self::Transport => Some("transport"),
            Self::Helper => Some("labour"),
            Self::GuardCamp => Some("guard-camp"),
        }
    }

    /// Human label used in log lines and file names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Boat => "boat",
            Self::PictureBoat => "picture boat",
            Self::SecurityBoat => "security boat",
            Self::Transport => "vehicle",
            Self::Helper => "helper",
            Self::GuardCamp => "guard",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ResourceKindParseError(s.to_string()))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::{Tab, tab_for_route};

    #[test]
    fn test_kind_roundtrip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
        assert!("yacht".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_segments_map_to_expected_tabs() {
        let expected = [
            (ResourceKind::Boat, Tab::Boats),
            (ResourceKind::PictureBoat, Tab::PictureBoats),
            (ResourceKind::SecurityBoat, Tab::SecurityBoats),
            (ResourceKind::Transport, Tab::Transport),
            (ResourceKind::Helper, Tab::Labour),
            (ResourceKind::GuardCamp, Tab::Guards),
        ];
        for (kind, tab) in expected {
            let resources = format!("/api/productions/1/{}", kind.resource_segment());
            let assignments = format!("/api/productions/1/{}/7", kind.assignment_segment());
            let export = kind.export_segment().map_or_else(
                || "/api/productions/1/export/csv".to_string(),
                |seg| format!("/api/productions/1/export/{seg}/csv"),
            );
            assert_eq!(tab_for_route(&resources), Some(tab), "{resources}");
            assert_eq!(tab_for_route(&assignments), Some(tab), "{assignments}");
            assert_eq!(tab_for_route(&export), Some(tab), "{export}");
        }
    }
}
