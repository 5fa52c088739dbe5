use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the card rotation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Seconds each card stays up while auto-playing.
    pub dwell_secs: f64,
    /// How far a horizontal drag has to travel before it counts as a swipe.
    pub swipe_threshold: f64,
    /// Start rotating as soon as cards are loaded.
    pub autoplay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dwell_secs: 5.,
            swipe_threshold: Self::DEFAULT_SWIPE_THRESHOLD,
            autoplay: true,
        }
    }
}

impl Settings {
    const MIN_DWELL: Duration = Duration::from_millis(100);
    const DEFAULT_SWIPE_THRESHOLD: f64 = 50.;

    /// Dwell as a duration, never shorter than 100ms.
    pub fn dwell(&self) -> Duration {
        if self.dwell_secs.is_finite() && self.dwell_secs > Self::MIN_DWELL.as_secs_f64() {
            Duration::from_secs_f64(self.dwell_secs)
        } else {
            Self::MIN_DWELL
        }
    }

    /// Swipe threshold, falling back to the default when it isn't a non-negative number.
    pub fn swipe_threshold(&self) -> f64 {
        if self.swipe_threshold.is_finite() && self.swipe_threshold >= 0. {
            self.swipe_threshold
        } else {
            Self::DEFAULT_SWIPE_THRESHOLD
        }
    }
}
