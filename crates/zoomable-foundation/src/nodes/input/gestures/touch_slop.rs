use crate::nodes::input::types::PointerEvent;
use zoomable_ui_graphics::Point;

/// Accumulates movement until it passes the touch slop.
///
/// A second pointer passes the slop immediately: two fingers are never a tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSlop {
    threshold: f32,
    pan: Point,
    past: bool,
}

impl TouchSlop {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            pan: Point::ZERO,
            past: false,
        }
    }

    /// Feeds `event` and reports whether the slop has been passed. Once past
    /// it stays past.
    pub fn is_past(&mut self, event: &PointerEvent) -> bool {
        if self.past {
            return true;
        }
        if event.changes.len() > 1 {
            self.past = true;
        } else {
            self.pan += event.calculate_pan();
            self.past = self.pan.distance() > self.threshold;
        }
        self.past
    }
}
