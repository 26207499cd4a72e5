use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role granted to a profile.
///
/// This is a closed set. A role value read from storage that is not one of
/// these three is a corruption error at the profile boundary, never a
/// fallback to some permissive default.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A customer who opens projects and hires designers.
    Client,
    /// A designer who takes on projects.
    Designer,
    /// Platform operator. Admin privileges are never implicit: routes that
    /// admit admins list the role explicitly.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Designer => "designer",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The profile store held a role value outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "designer" => Ok(Role::Designer),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
