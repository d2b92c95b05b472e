//! Foundation elements for zoomable surfaces: pointer input, gesture
//! recognition and the node traits a host drives.

pub mod gesture_constants;
pub mod modifier;
pub mod nodes;
pub mod velocity_tracker;

pub use gesture_constants::ViewConfiguration;
pub use modifier::{LayoutModifierNode, PointerInputNode};
pub use nodes::input::gestures::{
    MouseWheelZoomConfig, MouseWheelZoomDetector, TapInterest, TouchSlop, ZoomableGestureDetector,
    ZoomableGestureListener,
};
pub use nodes::input::{
    DispatchResult, KeyboardModifier, PointerDispatcher, PointerEvent, PointerEventKind,
    PointerEventPass, PointerId, PointerInputChange, PointerKeyboardModifiers, PointerType,
};
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::gesture_constants::ViewConfiguration;
    pub use crate::modifier::{LayoutModifierNode, PointerInputNode};
    pub use crate::nodes::input::gestures::*;
    pub use crate::nodes::input::prelude::*;
    pub use crate::velocity_tracker::VelocityTracker;
}
