//! Quality → bit-depth map.
//!
//! Iteration order (`very_low, low, medium, high`) is load-bearing: it is the
//! tie-break order `probe_quality` uses when more than one depth's magic
//! check could in principle match.

use std::fmt;

/// Human-facing embedding quality label, mapped to a fixed LSB depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    VeryLow,
    Low,
    Medium,
    High,
}

/// All qualities in probe/tie-break order.
pub const ALL: [Quality; 4] = [Quality::VeryLow, Quality::Low, Quality::Medium, Quality::High];

impl Quality {
    /// Number of least-significant bits used per sample at this quality.
    pub const fn depth(self) -> u8 {
        match self {
            Quality::VeryLow => 8,
            Quality::Low => 4,
            Quality::Medium => 2,
            Quality::High => 1,
        }
    }

    /// Inverse of [`Quality::depth`]; `None` for any depth outside {1,2,4,8}.
    pub fn from_depth(depth: u8) -> Option<Quality> {
        ALL.iter().copied().find(|q| q.depth() == depth)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quality::VeryLow => "very_low",
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_round_trip() {
        for q in ALL {
            assert_eq!(Quality::from_depth(q.depth()), Some(q));
        }
    }

    #[test]
    fn unknown_depth_is_none() {
        assert_eq!(Quality::from_depth(3), None);
        assert_eq!(Quality::from_depth(16), None);
    }
}
