//! Pan and zoom carried by a batch.
//!
//! Only pointers that are down in both this batch and the previous one
//! count, so a finger landing or lifting never produces a jump.

use crate::nodes::input::types::{PointerEvent, PointerInputChange};
use zoomable_ui_graphics::Point;

fn is_tracked(change: &PointerInputChange) -> bool {
    change.pressed && change.previous_pressed
}

impl PointerEvent {
    /// Mean position of the tracked pointers, now or in the previous batch.
    pub fn calculate_centroid(&self, use_current: bool) -> Option<Point> {
        let mut sum = Point::ZERO;
        let mut count = 0usize;
        for change in self.changes.iter().filter(|c| is_tracked(c)) {
            sum += if use_current {
                change.position
            } else {
                change.previous_position
            };
            count += 1;
        }
        (count > 0).then(|| sum / count as f32)
    }

    /// Mean distance of the tracked pointers from their centroid; zero for
    /// fewer than two.
    pub fn calculate_centroid_size(&self, use_current: bool) -> f32 {
        let Some(centroid) = self.calculate_centroid(use_current) else {
            return 0.0;
        };
        let mut distance = 0.0f32;
        let mut count = 0usize;
        for change in self.changes.iter().filter(|c| is_tracked(c)) {
            let position = if use_current {
                change.position
            } else {
                change.previous_position
            };
            distance += (position - centroid).distance();
            count += 1;
        }
        distance / count as f32
    }

    /// Displacement of the centroid since the previous batch.
    pub fn calculate_pan(&self) -> Point {
        match (self.calculate_centroid(true), self.calculate_centroid(false)) {
            (Some(current), Some(previous)) => current - previous,
            _ => Point::ZERO,
        }
    }

    /// Ratio of the current spread of the pointers to the previous one; 1
    /// when either is zero.
    pub fn calculate_zoom(&self) -> f32 {
        let current = self.calculate_centroid_size(true);
        let previous = self.calculate_centroid_size(false);
        if current == 0.0 || previous == 0.0 {
            1.0
        } else {
            current / previous
        }
    }

    /// More than one pointer was down before this batch and exactly one is
    /// down now.
    pub fn is_pointer_reduced_to_one(&self) -> bool {
        self.previously_pressed_count() > 1 && self.pressed_count() == 1
    }
}
