//! Volume level handling
//!
//! The device takes a linear level in 0.0 - 1.0; the panel slider works in
//! whole percent. Out-of-range input is clamped before it reaches either the
//! device or the provider.

/// Linear output volume, always within 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f64,
}

impl Volume {
    /// Create a volume, clamping `level` into range
    ///
    /// Non-finite input falls back to silence.
    pub fn new(level: f64) -> Self {
        Self {
            level: normalize(level).unwrap_or(0.0),
        }
    }

    /// Current level (0.0 - 1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Level as a slider percentage (0 - 100)
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Clamp a requested level into 0.0 - 1.0
///
/// Infinities clamp to the nearest bound; NaN has no meaningful level and
/// yields `None`.
pub fn normalize(level: f64) -> Option<f64> {
    if level.is_nan() {
        None
    } else {
        Some(level.clamp(0.0, 1.0))
    }
}
