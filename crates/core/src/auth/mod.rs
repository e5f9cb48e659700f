//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification and account credential rules
//! - Project role definitions

mod password;

pub use password::{
    CredentialError, MIN_NICKNAME_LEN, MIN_PASSWORD_LEN, PasswordError, hash_password,
    validate_nickname, validate_password, verify_password,
};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rbac::Tab;

/// Roles a user can hold within a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access, including administration.
    Admin,
    /// Read and write on every production tab.
    Unit,
    /// Read and write on the boat, transport and fuel tabs.
    Transpo,
    /// Read-only access to every production tab.
    Reader,
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid role. Must be one of: ADMIN, UNIT, TRANSPO, READER")]
pub struct RoleParseError(pub String);

impl Role {
    /// Every role, in privilege order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Unit, Self::Transpo, Self::Reader];

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Unit => "UNIT",
            Self::Transpo => "TRANSPO",
            Self::Reader => "READER",
        }
    }

    /// Returns true if this role may only issue read requests.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Reader)
    }

    /// Returns true if this role can manage users and projects.
    #[must_use]
    pub const fn can_administer(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the tabs this role can open.
    #[must_use]
    pub const fn tabs(self) -> &'static [Tab] {
        match self {
            Self::Admin => &Tab::ALL,
            Self::Unit | Self::Reader => &PRODUCTION_TABS,
            Self::Transpo => &TRANSPO_TABS,
        }
    }

    /// Returns true if this role can open the given tab.
    #[must_use]
    pub fn has_tab(self, tab: Tab) -> bool {
        self.tabs().contains(&tab)
    }
}

const PRODUCTION_TABS: [Tab; 11] = [
    Tab::Pdt,
    Tab::Locations,
    Tab::Boats,
    Tab::PictureBoats,
    Tab::SecurityBoats,
    Tab::Transport,
    Tab::Fuel,
    Tab::Labour,
    Tab::Guards,
    Tab::Fnb,
    Tab::Budget,
];

const TRANSPO_TABS: [Tab; 5] = [
    Tab::Boats,
    Tab::PictureBoats,
    Tab::SecurityBoats,
    Tab::Transport,
    Tab::Fuel,
];

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "UNIT" => Ok(Self::Unit),
            "TRANSPO" => Ok(Self::Transpo),
            "READER" => Ok(Self::Reader),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
