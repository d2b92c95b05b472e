//! The node a host attaches to make its content zoomable.
//!
//! [`ZoomableNode`] takes part in pointer input and in layout. Touch input
//! goes through a [`ZoomableGestureDetector`] whose outcomes drive the
//! [`ZoomState`]; wheel input goes through a [`MouseWheelZoomDetector`]. The
//! host draws the content with [`LayoutModifierNode::graphics_layer`].

use zoomable_animation::AnimationType;
use zoomable_foundation::{
    LayoutModifierNode, MouseWheelZoomConfig, MouseWheelZoomDetector, PointerEvent,
    PointerEventPass, PointerInputNode, TapInterest, ViewConfiguration, ZoomableGestureDetector,
    ZoomableGestureListener,
};
use zoomable_ui_graphics::{GraphicsLayer, Point, Size};

use crate::options::{DoubleTapAction, ZoomableOptions};
use crate::scroll_gesture_propagation::ScrollGesturePropagation;
use crate::zoom_state::ZoomState;

/// Connects detector outcomes to the zoom state.
struct GestureHandler {
    state: ZoomState,
    options: ZoomableOptions,
    /// Decided on the first movement of a session and kept until the next.
    consume_gesture: Option<bool>,
}

impl GestureHandler {
    fn should_consume(&mut self, pan: Point, zoom: f32) -> bool {
        if let Some(consume) = self.consume_gesture {
            return consume;
        }
        let consume = if zoom != 1.0 {
            true
        } else if self.state.scale() == 1.0 {
            false
        } else {
            match self.options.scroll_gesture_propagation {
                ScrollGesturePropagation::NotZoomed => true,
                ScrollGesturePropagation::ContentEdge => self.state.will_change_offset(pan),
            }
        };
        if !consume {
            log::trace!("drag {pan:?} left to an ancestor");
        }
        self.consume_gesture = Some(consume);
        consume
    }
}

impl ZoomableGestureListener for GestureHandler {
    fn tap_interest(&self) -> TapInterest {
        self.options.tap_interest()
    }

    fn enable_one_finger_zoom(&self) -> bool {
        self.options.enable_one_finger_zoom
    }

    fn cancel_if_zoom_canceled(&self) -> bool {
        self.options.snap_back_enabled
    }

    fn can_consume_gesture(&mut self, pan: Point, zoom: f32) -> bool {
        self.options.zoom_enabled && self.should_consume(pan, zoom)
    }

    fn on_gesture_start(&mut self) {
        self.consume_gesture = None;
        self.state.start_gesture();
    }

    fn on_gesture(&mut self, centroid: Point, pan: Point, zoom: f32, uptime_millis: u64) {
        if self.options.zoom_enabled {
            self.state.apply_gesture(pan, zoom, centroid, uptime_millis);
        }
    }

    fn on_gesture_end(&mut self) {
        self.state.end_gesture(self.options.snap_back_enabled);
    }

    fn on_tap(&mut self, position: Point) {
        if let Some(on_tap) = &self.options.on_tap {
            on_tap(position);
        }
    }

    fn on_double_tap(&mut self, position: Point) {
        match &self.options.on_double_tap {
            DoubleTapAction::None => {}
            DoubleTapAction::ToggleScale { target } => {
                if self.options.zoom_enabled {
                    self.state
                        .toggle_scale(*target, position, AnimationType::default());
                }
            }
            DoubleTapAction::Custom(on_double_tap) => on_double_tap(&self.state, position),
        }
    }

    fn on_long_press(&mut self, position: Point) {
        if let Some(on_long_press) = &self.options.on_long_press {
            on_long_press(position);
        }
    }
}

/// Makes the content it is attached to zoomable.
pub struct ZoomableNode {
    detector: ZoomableGestureDetector,
    handler: GestureHandler,
    wheel: MouseWheelZoomDetector,
    measured_size: Size,
}

impl ZoomableNode {
    pub fn new(state: ZoomState, options: ZoomableOptions) -> Self {
        Self {
            detector: ZoomableGestureDetector::new(ViewConfiguration::default()),
            handler: GestureHandler {
                state,
                options,
                consume_gesture: None,
            },
            wheel: MouseWheelZoomDetector::default(),
            measured_size: Size::ZERO,
        }
    }

    /// Replaces the gesture thresholds. Drops the gesture in progress.
    pub fn with_view_configuration(mut self, config: ViewConfiguration) -> Self {
        self.detector = ZoomableGestureDetector::new(config);
        self
    }

    pub fn with_mouse_wheel_config(mut self, config: MouseWheelZoomConfig) -> Self {
        self.wheel = MouseWheelZoomDetector::new(config);
        self
    }

    pub fn state(&self) -> &ZoomState {
        &self.handler.state
    }

    pub fn options(&self) -> &ZoomableOptions {
        &self.handler.options
    }

    pub fn measured_size(&self) -> Size {
        self.measured_size
    }

    /// Applies new options and possibly a new state.
    ///
    /// A gesture in progress survives unless a tap, double tap or long press
    /// callback appears or disappears. A new state learns the last measured
    /// size right away.
    pub fn update(&mut self, state: ZoomState, options: ZoomableOptions) {
        if !self.handler.state.ptr_eq(&state) {
            state.set_layout_size(self.measured_size);
            self.handler.state = state;
        }
        let restart = self.handler.options.tap_interest() != options.tap_interest();
        self.handler.options = options;
        if restart {
            log::debug!("tap callbacks changed, restarting gesture detection");
            self.detector.cancel();
        }
    }

    /// Scroll left over by a scrollable child. Pans the content when nested
    /// scrolling is enabled and returns the consumed part.
    pub fn on_post_scroll(&mut self, available: Point) -> Point {
        if !self.handler.options.enable_nested_scroll {
            return Point::ZERO;
        }
        self.handler.state.apply_pan(available)
    }

    /// Detaches from the host: drops the gesture in progress without
    /// callbacks and stops every animation.
    pub fn dispose(&mut self) {
        self.detector.cancel();
        self.handler.state.stop_animations();
    }
}

impl PointerInputNode for ZoomableNode {
    fn on_pointer_event(
        &mut self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        _bounds: Size,
    ) -> bool {
        let mut consumed = self
            .detector
            .on_pointer_event(event, pass, &mut self.handler);

        let handler = &self.handler;
        consumed |= self.wheel.on_pointer_event(
            event,
            pass,
            |modifiers| {
                handler.options.zoom_enabled && handler.options.mouse_wheel_zoom.matches(modifiers)
            },
            |zoom, position| {
                handler
                    .state
                    .apply_gesture_without_bounce(Point::ZERO, zoom, position)
            },
        );
        consumed
    }

    fn on_cancel_pointer_input(&mut self) {
        self.detector.abort(&mut self.handler);
    }

    fn next_deadline(&self) -> Option<u64> {
        self.detector.next_deadline()
    }

    fn on_timeout(&mut self, uptime_millis: u64) {
        self.detector.poll_timers(uptime_millis, &mut self.handler);
    }
}

impl LayoutModifierNode for ZoomableNode {
    fn on_measured(&mut self, size: Size) {
        self.measured_size = size;
        self.handler.state.set_layout_size(size);
    }

    fn graphics_layer(&self) -> GraphicsLayer {
        self.handler.state.graphics_layer()
    }
}
