//! Mouse wheel to zoom.

use crate::nodes::input::types::{PointerEvent, PointerEventKind, PointerEventPass, PointerKeyboardModifiers};
use zoomable_ui_graphics::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseWheelZoomConfig {
    /// Zoom change per unit of vertical scroll; negative so that scrolling
    /// up (negative delta) zooms in.
    pub rate: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for MouseWheelZoomConfig {
    fn default() -> Self {
        Self {
            rate: -0.3,
            min_zoom: 0.66,
            max_zoom: 1.5,
        }
    }
}

impl MouseWheelZoomConfig {
    /// Zoom factor for one scroll step, clamped to `[min_zoom, max_zoom]`.
    pub fn zoom_for(&self, scroll_delta_y: f32) -> f32 {
        (1.0 + scroll_delta_y * self.rate).clamp(self.min_zoom, self.max_zoom)
    }
}

/// Turns scroll batches into zoom steps anchored at the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseWheelZoomDetector {
    config: MouseWheelZoomConfig,
}

impl MouseWheelZoomDetector {
    pub fn new(config: MouseWheelZoomConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MouseWheelZoomConfig {
        &self.config
    }

    /// Handles the main pass of scroll batches. `accepts` decides from the
    /// held keyboard modifiers whether the wheel zooms at all; `on_zoom`
    /// receives the zoom factor and the pointer position. Returns true when
    /// the batch was consumed.
    pub fn on_pointer_event(
        &self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        accepts: impl Fn(PointerKeyboardModifiers) -> bool,
        mut on_zoom: impl FnMut(f32, Point),
    ) -> bool {
        if pass != PointerEventPass::Main || event.kind != PointerEventKind::Scroll {
            return false;
        }
        if !accepts(event.keyboard_modifiers) {
            return false;
        }
        let Some(change) = event.changes.first() else {
            return false;
        };
        if change.consumed {
            return false;
        }
        let zoom = self.config.zoom_for(change.scroll_delta.y);
        if zoom == 1.0 {
            return false;
        }
        let position = change.position;
        log::trace!("wheel zoom {zoom} at {position:?}");
        on_zoom(zoom, position);
        event.consume_all();
        true
    }
}
