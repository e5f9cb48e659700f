//! Role-based access control.
//!
//! Every API path is mapped to a UI tab by URL fragment, and each role is
//! granted a fixed set of tabs. ADMIN bypasses every check. READER can only
//! issue read requests on its tabs.

mod routes;


pub use routes::{EXPORT_TAB_MAP, ROUTE_TAB_MAP, tab_for_route};

use serde::Serialize;
use thiserror::Error;

use crate::auth::Role;

/// A UI area that permissions are granted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    /// Production schedule (shooting days).
    Pdt,
    /// Location sites and P/F/W schedules.
    Locations,
    /// Boats, boat functions and boat assignments.
    Boats,
    /// Picture boats.
    PictureBoats,
    /// Security boats.
    SecurityBoats,
    /// Ground transport.
    Transport,
    /// Fuel.
    Fuel,
    /// Helpers.
    Labour,
    /// Location guards and base-camp guards.
    Guards,
    /// Food and beverage.
    Fnb,
    /// Budget overview.
    Budget,
    /// User and project administration.
    Admin,
}

impl Tab {
    /// Every tab, in display order.
    pub const ALL: [Self; 12] = [
        Self::Pdt,
        Self::Locations,
        Self::Boats,
        Self::PictureBoats,
        Self::SecurityBoats,
        Self::Transport,
        Self::Fuel,
        Self::Labour,
        Self::Guards,
        Self::Fnb,
        Self::Budget,
        Self::Admin,
    ];

    /// Returns the tab identifier used by the client.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdt => "pdt",
            Self::Locations => "locations",
            Self::Boats => "boats",
            Self::PictureBoats => "picture-boats",
            Self::SecurityBoats => "security-boats",
            Self::Transport => "transport",
            Self::Fuel => "fuel",
            Self::Labour => "labour",
            Self::Guards => "guards",
            Self::Fnb => "fnb",
            Self::Budget => "budget",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Non-admin attempted to write a production record.
    #[error("Only ADMIN can create or modify productions")]
    ProductionWrite,

    /// Non-admin attempted a data reload.
    #[error("Only ADMIN can reload data")]
    Reload,

    /// Path does not belong to any tab.
    #[error("Access denied")]
    UnknownRoute,

    /// Role lacks the tab the path belongs to.
    #[error("Your role ({role}) does not have access to {}", .tab.as_str().to_uppercase())]
    TabNotAllowed {
        /// Caller's role.
        role: Role,
        /// Tab the path belongs to.
        tab: Tab,
    },

    /// Read-only role attempted a write.
    #[error("Read-only access: you cannot modify data")]
    ReadOnly,
}

/// Returns true for methods that never modify data.
#[must_use]
pub fn is_read_method(method: &str) -> bool {
    ["GET", "HEAD", "OPTIONS"]
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
}

/// Decides whether `role` may call `method` on `path`.
///
/// # Errors
///
/// Returns the `AccessDenied` reason when the request must be refused.
pub fn check_role_access(role: Role, path: &str, method: &str) -> Result<(), AccessDenied> {
    if role == Role::Admin {
        return Ok(());
    }

    let tab = tab_for_route(path);

    if is_production_root(path) {
        return if is_read_method(method) {
            Ok(())
        } else {
            Err(AccessDenied::ProductionWrite)
        };
    }

    if path.contains("/departments") && tab.is_none() {
        return Ok(());
    }
    if path.contains("/working-days") || path.contains("/health") {
        return Ok(());
    }
    if path.contains("/reload") {
        return Err(AccessDenied::Reload);
    }

    let Some(tab) = tab else {
        return Err(AccessDenied::UnknownRoute);
    };

    if !role.has_tab(tab) {
        return Err(AccessDenied::TabNotAllowed { role, tab });
    }

    if role.is_read_only() && !is_read_method(method) {
        return Err(AccessDenied::ReadOnly);
    }

    Ok(())
}

/// Returns the tabs a role can open.
#[must_use]
pub fn allowed_tabs(role: Role) -> &'static [Tab] {
    role.tabs()
}

/// Matches `/api/productions`, `/api/productions/` and `/api/productions/{digits}[/]`.
fn is_production_root(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("/api/productions") else {
        return false;
    };
    if rest.is_empty() || rest == "/" {
        return true;
    }
    let Some(rest) = rest.strip_prefix('/') else {
        return false;
    };
    let id = rest.strip_suffix('/').unwrap_or(rest);
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the production id from `/api/productions/{id}/...` paths.
#[must_use]
pub fn production_id_from_path(path: &str) -> Option<i32> {
    let rest = path.strip_prefix("/api/productions/")?;
    let id = rest.split('/').next()?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}
