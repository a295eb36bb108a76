//! Application roles.

use serde::{Deserialize, Serialize};

/// Access level granted to an authenticated caller.
///
/// Wire format: uppercase string (`"ADMIN"`, `"USER"`, `"VISITOR"`); the
/// database stores the `i16` value (0 = Visitor, 1 = User, 2 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Visitor = 0,
    User = 1,
    Admin = 2,
}

impl Role {
    /// Convert from the `i16` database value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Visitor),
            1 => Some(Self::User),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to the `i16` database value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Parse the uppercase wire name. Returns `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "VISITOR" => Some(Self::Visitor),
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "VISITOR",
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// True for roles allowed to mutate products (USER and ADMIN).
    pub fn can_write(self) -> bool {
        self >= Self::User
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_i16().cmp(&other.as_i16())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
