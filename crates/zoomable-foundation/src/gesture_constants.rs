//! Shared gesture thresholds and timeouts.
//!
//! Distances are in logical pixels and times in milliseconds of the pointer
//! uptime clock. For very high-density touch screens scale the distances by
//! the device's density before handing them to a detector.

/// Distance a pointer must travel before a press becomes a drag.
///
/// Past this distance a tap can no longer fire on release. Matches the
/// Android touch slop of 8dp at baseline density.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Time a pointer must stay down, without passing the touch slop, to count as
/// a long press.
pub const LONG_PRESS_TIMEOUT_MILLIS: u64 = 400;

/// Maximum time between the first release and the second press of a double
/// tap.
pub const DOUBLE_TAP_TIMEOUT_MILLIS: u64 = 300;

/// A second press sooner than this after the first release is treated as
/// contact bounce and ignored.
pub const DOUBLE_TAP_MIN_TIME_MILLIS: u64 = 40;

/// Zoom produced per pixel of vertical drag after a double tap.
pub const ONE_FINGER_ZOOM_SENSITIVITY: f32 = 0.004;

/// Maximum fling velocity in logical pixels per second.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Thresholds a gesture detector works with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfiguration {
    pub touch_slop: f32,
    pub long_press_timeout_millis: u64,
    pub double_tap_timeout_millis: u64,
    pub double_tap_min_time_millis: u64,
    pub one_finger_zoom_sensitivity: f32,
    pub max_fling_velocity: f32,
}

impl ViewConfiguration {
    pub fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn with_long_press_timeout(mut self, millis: u64) -> Self {
        self.long_press_timeout_millis = millis;
        self
    }

    pub fn with_double_tap_timeout(mut self, millis: u64) -> Self {
        self.double_tap_timeout_millis = millis;
        self
    }

    pub fn with_double_tap_min_time(mut self, millis: u64) -> Self {
        self.double_tap_min_time_millis = millis;
        self
    }

    pub fn with_one_finger_zoom_sensitivity(mut self, sensitivity: f32) -> Self {
        self.one_finger_zoom_sensitivity = sensitivity;
        self
    }
}

impl Default for ViewConfiguration {
    fn default() -> Self {
        Self {
            touch_slop: DRAG_THRESHOLD,
            long_press_timeout_millis: LONG_PRESS_TIMEOUT_MILLIS,
            double_tap_timeout_millis: DOUBLE_TAP_TIMEOUT_MILLIS,
            double_tap_min_time_millis: DOUBLE_TAP_MIN_TIME_MILLIS,
            one_finger_zoom_sensitivity: ONE_FINGER_ZOOM_SENSITIVITY,
            max_fling_velocity: MAX_FLING_VELOCITY,
        }
    }
}
