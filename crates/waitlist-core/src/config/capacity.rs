//! Slot capacity configuration.

use serde::{Deserialize, Serialize};

/// Capacity used when nothing (or nothing usable) is configured.
pub const DEFAULT_CAPACITY: u32 = 500;

/// Total number of slots offered.
///
/// Read once at startup to seed the persistent counter. Changing it later
/// does not resize an already-initialized store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Total slots.
    #[serde(default = "default_total")]
    pub total: u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            total: default_total(),
        }
    }
}

/// Parse a capacity value, rejecting anything that is not a positive integer.
pub fn parse_capacity(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|total| *total > 0)
}

fn default_total() -> u32 {
    DEFAULT_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity("250"), Some(250));
        assert_eq!(parse_capacity(" 7 "), Some(7));
        assert_eq!(parse_capacity("0"), None);
        assert_eq!(parse_capacity("-5"), None);
        assert_eq!(parse_capacity("five"), None);
        assert_eq!(parse_capacity(""), None);
    }
}
