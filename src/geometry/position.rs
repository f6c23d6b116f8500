//! Normalized tag positions.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Upper bound of a normalized axis (percent).
pub const PERCENT_MAX: f64 = 100.0;

/// Location on the visible video frame as percent offsets from its top-left.
///
/// Both axes are always finite and within `[0, 100]`. The fields are private
/// so a position can only come from [`NormalizedPosition::new`], the mapper,
/// or validated deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct NormalizedPosition {
    x: f64,
    y: f64,
}

impl NormalizedPosition {
    /// Build a position, rejecting values outside `[0, 100]` or non-finite.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        if in_range(x) && in_range(y) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// The frame center.
    pub fn center() -> Self {
        Self {
            x: PERCENT_MAX / 2.0,
            y: PERCENT_MAX / 2.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Human-readable form used in tag details, e.g. `(25.0%, 75.0%)`.
    pub fn label(&self) -> String {
        format!("({:.1}%, {:.1}%)", self.x, self.y)
    }
}

#[inline]
fn in_range(v: f64) -> bool {
    v.is_finite() && (0.0..=PERCENT_MAX).contains(&v)
}

impl<'de> Deserialize<'de> for NormalizedPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            x: f64,
            y: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        NormalizedPosition::new(raw.x, raw.y).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "position ({}, {}) is outside the 0-100 frame range",
                raw.x, raw.y
            ))
        })
    }
}
