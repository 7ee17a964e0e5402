//! Type-safe identifiers for browser entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.
//! All identifiers serialize transparently as their inner value.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// TabId
// ============================================================================

/// Identifier of a browser tab.
///
/// Issued by the [`TabHost`](crate::browser::TabHost) when a tab is
/// created, and used to address the tab for reload, close, page-load
/// events and agent requests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TabId(u32);

impl TabId {
    /// Creates a tab ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TabId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TabId::new(42).to_string(), "42");
    }

    #[test]
    fn test_value_round_trip() {
        let id = TabId::from(7);
        assert_eq!(id.value(), 7);
    }

    #[test]
    fn test_serde_transparent() {
        let id = TabId::new(123);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "123");

        let back: TabId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
