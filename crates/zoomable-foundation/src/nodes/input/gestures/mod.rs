//! Gesture recognizers built on pointer batches.

pub mod mouse_wheel;
pub mod touch_slop;
pub mod transform;
pub mod zoomable;

pub use mouse_wheel::{MouseWheelZoomConfig, MouseWheelZoomDetector};
pub use touch_slop::TouchSlop;
pub use zoomable::{TapInterest, ZoomableGestureDetector, ZoomableGestureListener};
