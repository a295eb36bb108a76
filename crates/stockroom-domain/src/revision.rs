//! Revision change types.

use serde::{Deserialize, Serialize};

/// Kind of product mutation a revision captured.
///
/// Wire format: `i16` (0 = Add, 1 = Mod, 2 = Del), matching the audit API's
/// `revType` query parameter and response field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Add = 0,
    Mod = 1,
    Del = 2,
}

impl ChangeType {
    /// Convert from the `i16` wire value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Add),
            1 => Some(Self::Mod),
            2 => Some(Self::Del),
            _ => None,
        }
    }

    /// Convert to the `i16` wire value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Human-readable operation name used in audit listings and CSV rows.
    pub fn operation_name(self) -> &'static str {
        match self {
            Self::Add => "CREATE",
            Self::Mod => "UPDATE",
            Self::Del => "DELETE",
        }
    }
}
