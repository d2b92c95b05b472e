//! Capabilities a host drives on an attached node.
//!
//! A node implements one trait per concern it takes part in; a zoomable
//! surface takes part in both pointer input and layout.

use crate::nodes::input::types::{PointerEvent, PointerEventPass};
use zoomable_ui_graphics::{GraphicsLayer, Size};

/// Receives pointer batches routed to the node's bounds.
pub trait PointerInputNode {
    /// Handles one pass of a batch. Returns true when the node consumed any
    /// change during this pass.
    fn on_pointer_event(
        &mut self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        bounds: Size,
    ) -> bool;

    /// The host stopped delivering the current stream, for example because
    /// pointer capture was lost. A gesture in progress ends as if all
    /// pointers had been lifted.
    fn on_cancel_pointer_input(&mut self) {}

    /// Milliseconds uptime at which the node needs [`PointerInputNode::on_timeout`]
    /// even if no batch arrives.
    fn next_deadline(&self) -> Option<u64> {
        None
    }

    /// Advances the node's timers to `uptime_millis`.
    fn on_timeout(&mut self, _uptime_millis: u64) {}
}

/// Takes part in layout: learns its measured size and decides how its
/// content is drawn.
pub trait LayoutModifierNode {
    fn on_measured(&mut self, size: Size);

    fn graphics_layer(&self) -> GraphicsLayer {
        GraphicsLayer::IDENTITY
    }
}
