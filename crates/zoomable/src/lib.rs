//! Pinch, pan, double tap and mouse wheel zoom for arbitrary content.
//!
//! A host creates a [`ZoomState`] on its frame clock, attaches a
//! [`ZoomableNode`] to the content and feeds the node pointer batches and
//! measured sizes. The node's graphics layer is the transform to draw the
//! content with.
//!
//! ```ignore
//! let state = ZoomState::new(clock.clone(), ZoomStateConfig::default())?;
//! let mut node = ZoomableNode::new(state, ZoomableOptions::zoomable());
//! node.on_measured(Size::new(400.0, 300.0));
//! ```

mod mouse_wheel_zoom;
mod options;
mod scroll_gesture_propagation;
mod zoom_state;
mod zoomable_node;

pub use mouse_wheel_zoom::MouseWheelZoom;
pub use options::{
    DoubleTapAction, DoubleTapCallback, TapCallback, ZoomableOptions, DEFAULT_DOUBLE_TAP_SCALE,
};
pub use scroll_gesture_propagation::ScrollGesturePropagation;
pub use zoom_state::{ZoomState, ZoomStateConfig, ZoomStateError, DEFAULT_MAX_SCALE, MIN_SCALE};
pub use zoomable_node::ZoomableNode;

pub mod prelude {
    pub use crate::{
        DoubleTapAction, MouseWheelZoom, ScrollGesturePropagation, ZoomState, ZoomStateConfig,
        ZoomableNode, ZoomableOptions,
    };
    pub use zoomable_foundation::{LayoutModifierNode, PointerInputNode};
}
