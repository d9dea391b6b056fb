//! Widget identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque host-assigned widget identifier.
///
/// The engine never interprets the value; it only compares identities so a
/// widget can exclude itself from collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(u64);

impl WidgetId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for WidgetId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}
