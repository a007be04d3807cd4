//! Seek clamping and position-feedback suppression
//!
//! Decoders often report a trailing edge as seekable but cannot resume from
//! it, so targets are kept a small margin short of the duration. After a
//! seek the device keeps reporting the old position for a moment; those
//! reports are dropped until the cooldown expires so the slider does not
//! snap back.

use std::time::Duration;
use tokio::time::Instant;

/// Seek target clamping plus cooldown window
#[derive(Debug, Clone)]
pub struct SeekGuard {
    margin: f64,
    cooldown: Duration,
    suppress_until: Option<Instant>,
}

impl SeekGuard {
    /// Create a guard keeping `margin` seconds from the end
    pub fn new(margin: f64, cooldown: Duration) -> Self {
        Self {
            margin: margin.max(0.0),
            cooldown,
            suppress_until: None,
        }
    }

    /// Clamp `target` into `[0, duration - margin]`
    ///
    /// Returns `None` for a NaN target. A duration shorter than the margin
    /// pins every seek to 0.
    pub fn clamp(&self, target: f64, duration: f64) -> Option<f64> {
        if target.is_nan() {
            return None;
        }
        let upper = (duration - self.margin).max(0.0);
        Some(target.clamp(0.0, upper))
    }

    /// Start suppressing position feedback from `now`
    pub fn arm(&mut self, now: Instant) {
        self.suppress_until = Some(now + self.cooldown);
    }

    /// Whether position feedback should be dropped at `now`
    pub fn is_suppressing(&mut self, now: Instant) -> bool {
        match self.suppress_until {
            Some(until) if now < until => true,
            Some(_) => {
                self.suppress_until = None;
                false
            }
            None => false,
        }
    }

    /// Drop any pending suppression (new track loaded)
    pub fn reset(&mut self) {
        self.suppress_until = None;
    }
}
