use std::fmt;
use std::rc::Rc;

use zoomable_foundation::TapInterest;
use zoomable_ui_graphics::Point;

use crate::mouse_wheel_zoom::MouseWheelZoom;
use crate::scroll_gesture_propagation::ScrollGesturePropagation;
use crate::zoom_state::ZoomState;

/// Scale a default double tap zooms to.
pub const DEFAULT_DOUBLE_TAP_SCALE: f32 = 2.5;

pub type TapCallback = Rc<dyn Fn(Point)>;
pub type DoubleTapCallback = Rc<dyn Fn(&ZoomState, Point)>;

/// What a double tap does.
#[derive(Clone)]
pub enum DoubleTapAction {
    /// Double taps are not recognized; the first release reports a tap
    /// right away unless one-finger zoom is enabled.
    None,
    /// Toggles between 1.0 and `target` around the tap while zooming is
    /// enabled.
    ToggleScale { target: f32 },
    Custom(DoubleTapCallback),
}

impl Default for DoubleTapAction {
    fn default() -> Self {
        DoubleTapAction::ToggleScale {
            target: DEFAULT_DOUBLE_TAP_SCALE,
        }
    }
}

impl DoubleTapAction {
    pub fn is_none(&self) -> bool {
        matches!(self, DoubleTapAction::None)
    }
}

impl fmt::Debug for DoubleTapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoubleTapAction::None => f.write_str("None"),
            DoubleTapAction::ToggleScale { target } => f
                .debug_struct("ToggleScale")
                .field("target", target)
                .finish(),
            DoubleTapAction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Behavior of a [`crate::ZoomableNode`].
///
/// Start from one of the presets and adjust with the `with_*` and `on_*`
/// builders.
#[derive(Clone)]
pub struct ZoomableOptions {
    /// When false the content ignores pinch, pan and wheel input, and the
    /// default double tap does nothing. Callbacks still fire.
    pub zoom_enabled: bool,
    pub enable_one_finger_zoom: bool,
    /// Release always animates back to scale 1.0, and lifting all but one
    /// finger ends the gesture.
    pub snap_back_enabled: bool,
    pub scroll_gesture_propagation: ScrollGesturePropagation,
    pub mouse_wheel_zoom: MouseWheelZoom,
    /// Scroll deltas a scrollable child leaves unconsumed pan the content.
    pub enable_nested_scroll: bool,
    pub on_tap: Option<TapCallback>,
    pub on_double_tap: DoubleTapAction,
    pub on_long_press: Option<TapCallback>,
}

impl Default for ZoomableOptions {
    fn default() -> Self {
        Self::zoomable()
    }
}

impl fmt::Debug for ZoomableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomableOptions")
            .field("zoom_enabled", &self.zoom_enabled)
            .field("enable_one_finger_zoom", &self.enable_one_finger_zoom)
            .field("snap_back_enabled", &self.snap_back_enabled)
            .field("scroll_gesture_propagation", &self.scroll_gesture_propagation)
            .field("mouse_wheel_zoom", &self.mouse_wheel_zoom)
            .field("enable_nested_scroll", &self.enable_nested_scroll)
            .field("on_tap", &self.on_tap.is_some())
            .field("on_double_tap", &self.on_double_tap)
            .field("on_long_press", &self.on_long_press.is_some())
            .finish()
    }
}

impl ZoomableOptions {
    /// Pinch, pan, fling, double tap to zoom and Ctrl + wheel.
    pub fn zoomable() -> Self {
        Self {
            zoom_enabled: true,
            enable_one_finger_zoom: true,
            snap_back_enabled: false,
            scroll_gesture_propagation: ScrollGesturePropagation::ContentEdge,
            mouse_wheel_zoom: MouseWheelZoom::EnabledWithCtrlKey,
            enable_nested_scroll: false,
            on_tap: None,
            on_double_tap: DoubleTapAction::default(),
            on_long_press: None,
        }
    }

    /// Zoom only while the fingers are down, for content inside a list.
    pub fn snap_back() -> Self {
        Self {
            enable_one_finger_zoom: false,
            snap_back_enabled: true,
            scroll_gesture_propagation: ScrollGesturePropagation::NotZoomed,
            mouse_wheel_zoom: MouseWheelZoom::Disabled,
            on_double_tap: DoubleTapAction::None,
            ..Self::zoomable()
        }
    }

    /// [`ZoomableOptions::zoomable`] for a scrollable child: what the child
    /// does not scroll pans the content.
    pub fn zoomable_with_scroll() -> Self {
        Self {
            enable_nested_scroll: true,
            ..Self::zoomable()
        }
    }

    pub fn with_zoom_enabled(mut self, enabled: bool) -> Self {
        self.zoom_enabled = enabled;
        self
    }

    pub fn with_one_finger_zoom(mut self, enabled: bool) -> Self {
        self.enable_one_finger_zoom = enabled;
        self
    }

    pub fn with_snap_back(mut self, enabled: bool) -> Self {
        self.snap_back_enabled = enabled;
        self
    }

    pub fn with_scroll_gesture_propagation(mut self, policy: ScrollGesturePropagation) -> Self {
        self.scroll_gesture_propagation = policy;
        self
    }

    pub fn with_mouse_wheel_zoom(mut self, mode: MouseWheelZoom) -> Self {
        self.mouse_wheel_zoom = mode;
        self
    }

    pub fn with_nested_scroll(mut self, enabled: bool) -> Self {
        self.enable_nested_scroll = enabled;
        self
    }

    pub fn on_tap(mut self, callback: impl Fn(Point) + 'static) -> Self {
        self.on_tap = Some(Rc::new(callback));
        self
    }

    pub fn on_double_tap(mut self, callback: impl Fn(&ZoomState, Point) + 'static) -> Self {
        self.on_double_tap = DoubleTapAction::Custom(Rc::new(callback));
        self
    }

    pub fn with_double_tap(mut self, action: DoubleTapAction) -> Self {
        self.on_double_tap = action;
        self
    }

    pub fn on_long_press(mut self, callback: impl Fn(Point) + 'static) -> Self {
        self.on_long_press = Some(Rc::new(callback));
        self
    }

    /// Outcomes the gesture detector has to tell apart for these options.
    pub fn tap_interest(&self) -> TapInterest {
        let mut interest = TapInterest::NONE;
        if self.on_tap.is_some() {
            interest = interest | TapInterest::TAP;
        }
        if !self.on_double_tap.is_none() {
            interest = interest | TapInterest::DOUBLE_TAP;
        }
        if self.on_long_press.is_some() {
            interest = interest | TapInterest::LONG_PRESS;
        }
        interest
    }
}
