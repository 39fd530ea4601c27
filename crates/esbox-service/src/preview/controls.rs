//! Controls shared by the viewers.

use serde::{Deserialize, Serialize};

/// Whether the media has arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// Loading failed; the viewer stays in this state until reopened.
    Failed(String),
}

impl LoadState {
    /// Move to `Ready` unless the load already failed.
    pub fn ready(&mut self) {
        if !self.is_failed() {
            *self = Self::Ready;
        }
    }

    /// Move to `Failed`; later events cannot leave it.
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.is_failed() {
            *self = Self::Failed(message.into());
        }
    }

    /// Whether the media finished loading.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Whether loading failed; a failed viewer stays failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Bounds and step of a zoom control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    /// Smallest allowed factor.
    pub min: f64,
    /// Largest allowed factor.
    pub max: f64,
    /// Change per zoom step.
    pub step: f64,
    /// Factor on open and after reset.
    pub default: f64,
}

/// A zoom factor kept inside its range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    value: f64,
    range: ZoomRange,
}

impl Zoom {
    /// A zoom at the range's default.
    pub fn new(range: ZoomRange) -> Self {
        Self {
            value: range.default,
            range,
        }
    }

    /// Current zoom factor.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Zoom as a whole percentage.
    pub fn percent(&self) -> u32 {
        (self.value * 100.0).round() as u32
    }

    /// Zoom in one step, clamped to the range.
    pub fn zoom_in(&mut self) {
        self.set(self.value + self.range.step);
    }

    /// Zoom out one step, clamped to the range.
    pub fn zoom_out(&mut self) {
        self.set(self.value - self.range.step);
    }

    pub fn reset(&mut self) {
        self.value = self.range.default;
    }

    pub fn can_zoom_in(&self) -> bool {
        self.value < self.range.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.value > self.range.min
    }

    fn set(&mut self, value: f64) {
        // Round to two places so repeated steps do not drift.
        let rounded = (value * 100.0).round() / 100.0;
        self.value = rounded.clamp(self.range.min, self.range.max);
    }
}

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation(u16);

impl Rotation {
    /// Clockwise rotation in degrees: 0, 90, 180 or 270.
    pub fn degrees(&self) -> u16 {
        self.0
    }

    pub fn rotate_cw(&mut self) {
        self.0 = (self.0 + 90) % 360;
    }

    pub fn rotate_ccw(&mut self) {
        self.0 = (self.0 + 270) % 360;
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: ZoomRange = ZoomRange {
        min: 0.6,
        max: 3.0,
        step: 0.2,
        default: 1.2,
    };

    #[test]
    fn test_failed_is_terminal() {
        let mut state = LoadState::default();
        state.fail("network error");
        state.ready();
        assert_eq!(state, LoadState::Failed("network error".to_string()));
        state.fail("second");
        assert_eq!(state, LoadState::Failed("network error".to_string()));
    }

    #[test]
    fn test_zoom_clamps_without_drift() {
        let mut zoom = Zoom::new(RANGE);
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.value(), 3.0);
        assert!(!zoom.can_zoom_in());
        for _ in 0..20 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.value(), 0.6);
        zoom.reset();
        assert_eq!(zoom.percent(), 120);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut r = Rotation::default();
        for _ in 0..5 {
            r.rotate_cw();
        }
        assert_eq!(r.degrees(), 90);
        r.rotate_ccw();
        r.rotate_ccw();
        assert_eq!(r.degrees(), 270);
    }
}
