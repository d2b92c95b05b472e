//! Recognizes pinch, pan, tap, double tap, long press and
//! double-tap-then-drag zoom from one pointer stream.
//!
//! The detector is a state machine fed with dispatch passes. It owns no
//! timers: long press and double tap are deadlines in the pointer uptime
//! clock, fired by [`ZoomableGestureDetector::poll_timers`] or by the first
//! batch that arrives at or after them.

use std::ops::BitOr;

use super::touch_slop::TouchSlop;
use crate::gesture_constants::ViewConfiguration;
use crate::nodes::input::types::{PointerEvent, PointerEventPass};
use zoomable_ui_graphics::Point;

/// Which tap-like outcomes a listener wants reported.
///
/// Registering any of them makes the detector consume the first press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TapInterest(u8);

impl TapInterest {
    pub const NONE: Self = Self(0);
    pub const TAP: Self = Self(1);
    pub const DOUBLE_TAP: Self = Self(1 << 1);
    pub const LONG_PRESS: Self = Self(1 << 2);

    pub fn contains(&self, other: TapInterest) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TapInterest {
    type Output = TapInterest;

    fn bitor(self, rhs: TapInterest) -> TapInterest {
        TapInterest(self.0 | rhs.0)
    }
}

/// Receives what [`ZoomableGestureDetector`] recognizes.
///
/// `on_gesture_start` and `on_gesture_end` bracket every session exactly
/// once; everything else fires in between.
pub trait ZoomableGestureListener {
    fn tap_interest(&self) -> TapInterest {
        TapInterest::NONE
    }

    /// Whether a drag after a double tap zooms instead of ending the session.
    fn enable_one_finger_zoom(&self) -> bool {
        true
    }

    /// Whether lifting all but one finger ends a multi-finger session.
    fn cancel_if_zoom_canceled(&self) -> bool {
        false
    }

    /// Asked before each movement is reported. Refusing leaves the batch
    /// unconsumed so an ancestor can act on it.
    fn can_consume_gesture(&mut self, _pan: Point, _zoom: f32) -> bool {
        true
    }

    fn on_gesture_start(&mut self) {}

    fn on_gesture(&mut self, centroid: Point, pan: Point, zoom: f32, uptime_millis: u64);

    fn on_gesture_end(&mut self) {}

    fn on_tap(&mut self, _position: Point) {}

    fn on_double_tap(&mut self, _position: Point) {}

    fn on_long_press(&mut self, _position: Point) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TapStage {
    /// Waiting on the first press; the long press deadline is unset once
    /// more than one finger is down.
    First { long_press_deadline: Option<u64> },
    Second { down_uptime: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    AwaitTouchSlop {
        slop: TouchSlop,
        stage: TapStage,
        /// The main pass saw an unresolved batch; check its final pass for
        /// consumption by an ancestor.
        check_final_pass: bool,
    },
    Transform,
    LongPressed,
    AwaitSecondDown {
        first_up: Point,
        min_uptime: u64,
        deadline: u64,
    },
    OneFingerZoom,
}

/// Everything between the first press and the end of classification.
#[derive(Clone, Copy, Debug, PartialEq)]
struct GestureSession {
    start_position: Point,
    has_moved: bool,
    is_multi_touch: bool,
    phase: Phase,
}

enum Step {
    Continue,
    End,
}

#[derive(Clone, Debug, Default)]
pub struct ZoomableGestureDetector {
    config: ViewConfiguration,
    session: Option<GestureSession>,
    /// A session ended while pointers were down; wait for all of them to
    /// lift before accepting a new press.
    awaiting_all_up: bool,
    pointers_down: bool,
}

impl ZoomableGestureDetector {
    pub fn new(config: ViewConfiguration) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ViewConfiguration {
        &self.config
    }

    pub fn is_in_session(&self) -> bool {
        self.session.is_some()
    }

    /// Drops the current session without reporting anything.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            log::debug!("gesture session dropped");
        }
        self.awaiting_all_up = false;
        self.pointers_down = false;
    }

    /// The pointer stream was lost. Ends the open session as if every
    /// pointer had been lifted: no tap is reported, `on_gesture_end` fires.
    pub fn abort(&mut self, listener: &mut dyn ZoomableGestureListener) {
        self.pointers_down = false;
        if self.session.is_some() {
            log::debug!("pointer input cancelled, ending gesture session");
            self.end_session(listener, false);
        } else {
            self.awaiting_all_up = false;
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        match self.session?.phase {
            Phase::AwaitTouchSlop {
                stage:
                    TapStage::First {
                        long_press_deadline,
                    },
                ..
            } => long_press_deadline,
            Phase::AwaitSecondDown { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Fires the pending deadline if `uptime_millis` is at or past it.
    pub fn poll_timers(&mut self, uptime_millis: u64, listener: &mut dyn ZoomableGestureListener) {
        let Some(session) = self.session else {
            return;
        };
        match session.phase {
            Phase::AwaitTouchSlop {
                stage:
                    TapStage::First {
                        long_press_deadline: Some(deadline),
                    },
                ..
            } if uptime_millis >= deadline => {
                log::debug!("long press at {:?}", session.start_position);
                self.session = Some(GestureSession {
                    phase: Phase::LongPressed,
                    ..session
                });
                if listener.tap_interest().contains(TapInterest::LONG_PRESS) {
                    listener.on_long_press(session.start_position);
                }
            }
            Phase::AwaitSecondDown {
                first_up, deadline, ..
            } if uptime_millis >= deadline => {
                log::debug!("tap at {first_up:?}");
                if listener.tap_interest().contains(TapInterest::TAP) {
                    listener.on_tap(first_up);
                }
                let pointers_down = self.pointers_down;
                self.end_session(listener, pointers_down);
            }
            _ => {}
        }
    }

    /// Feeds one pass of a batch. Returns true if this call consumed any
    /// change.
    pub fn on_pointer_event(
        &mut self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        listener: &mut dyn ZoomableGestureListener,
    ) -> bool {
        let consumed_before = event.changes.iter().filter(|c| c.consumed).count();
        self.poll_timers(event.uptime(), listener);
        match pass {
            PointerEventPass::Initial => {}
            PointerEventPass::Main => {
                self.on_main_pass(event, listener);
                self.pointers_down = event.is_pressed();
            }
            PointerEventPass::Final => self.on_final_pass(event, listener),
        }
        event.changes.iter().filter(|c| c.consumed).count() > consumed_before
    }

    fn on_main_pass(&mut self, event: &mut PointerEvent, listener: &mut dyn ZoomableGestureListener) {
        if self.awaiting_all_up {
            if !event.is_pressed() {
                self.awaiting_all_up = false;
            }
            return;
        }
        let config = self.config;
        let step = match self.session.as_mut() {
            None => {
                self.try_start_session(event, listener);
                return;
            }
            Some(session) => session.on_main_pass(&config, event, listener),
        };
        if let Step::End = step {
            self.end_session(listener, event.is_pressed());
        }
    }

    fn on_final_pass(&mut self, event: &mut PointerEvent, listener: &mut dyn ZoomableGestureListener) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Phase::AwaitTouchSlop {
            check_final_pass, ..
        } = &mut session.phase
        {
            if std::mem::take(check_final_pass) && event.is_consumed() {
                log::debug!("gesture consumed by an ancestor before touch slop");
                self.end_session(listener, event.is_pressed());
            }
        }
    }

    fn try_start_session(&mut self, event: &mut PointerEvent, listener: &mut dyn ZoomableGestureListener) {
        let all_down = !event.changes.is_empty()
            && event
                .changes
                .iter()
                .all(|c| c.changed_to_down_ignore_consumed());
        if !all_down {
            return;
        }

        if !listener.tap_interest().is_empty() || listener.enable_one_finger_zoom() {
            event.changes[0].consume();
        }
        let first = &event.changes[0];
        let is_multi_touch = event.changes.len() > 1;
        let long_press_deadline =
            (!is_multi_touch).then(|| first.uptime + self.config.long_press_timeout_millis);
        log::trace!("gesture session started at {:?}", first.position);
        self.session = Some(GestureSession {
            start_position: first.position,
            has_moved: false,
            is_multi_touch,
            phase: Phase::AwaitTouchSlop {
                slop: TouchSlop::new(self.config.touch_slop),
                stage: TapStage::First {
                    long_press_deadline,
                },
                check_final_pass: false,
            },
        });
        listener.on_gesture_start();
    }

    fn end_session(&mut self, listener: &mut dyn ZoomableGestureListener, pointers_down: bool) {
        self.session = None;
        self.awaiting_all_up = pointers_down;
        log::trace!("gesture session ended");
        listener.on_gesture_end();
    }
}

impl GestureSession {
    fn on_main_pass(
        &mut self,
        config: &ViewConfiguration,
        event: &mut PointerEvent,
        listener: &mut dyn ZoomableGestureListener,
    ) -> Step {
        if event.changes.len() > 1 {
            self.is_multi_touch = true;
        }
        match self.phase {
            Phase::AwaitTouchSlop {
                mut slop, stage, ..
            } => {
                if event.is_consumed() {
                    log::debug!("gesture consumed by a descendant before touch slop");
                    return Step::End;
                }
                if !event.is_pressed() {
                    return self.released_before_slop(config, stage, event, listener);
                }
                if !slop.is_past(event) {
                    self.phase = Phase::AwaitTouchSlop {
                        slop,
                        stage,
                        check_final_pass: true,
                    };
                    return Step::Continue;
                }
                match stage {
                    TapStage::First { .. } => {
                        self.phase = Phase::Transform;
                        self.transform(event, listener)
                    }
                    TapStage::Second { .. } => {
                        if !listener.enable_one_finger_zoom() {
                            return Step::End;
                        }
                        self.phase = Phase::OneFingerZoom;
                        self.one_finger_zoom(config, event, listener)
                    }
                }
            }
            Phase::Transform => {
                if event.is_consumed() || !event.is_pressed() {
                    return Step::End;
                }
                self.transform(event, listener)
            }
            Phase::OneFingerZoom => {
                if event.is_consumed() || !event.is_pressed() {
                    return Step::End;
                }
                self.one_finger_zoom(config, event, listener)
            }
            Phase::LongPressed => {
                if event.is_consumed() {
                    return Step::End;
                }
                event.consume_all();
                if event.is_pressed() {
                    Step::Continue
                } else {
                    Step::End
                }
            }
            Phase::AwaitSecondDown { min_uptime, .. } => {
                let second_down = !event.changes.is_empty()
                    && event.changes.iter().all(|c| c.changed_to_down());
                if second_down && event.changes[0].uptime >= min_uptime {
                    let down_uptime = event.changes[0].uptime;
                    event.changes[0].consume();
                    self.phase = Phase::AwaitTouchSlop {
                        slop: TouchSlop::new(config.touch_slop),
                        stage: TapStage::Second { down_uptime },
                        check_final_pass: false,
                    };
                }
                Step::Continue
            }
        }
    }

    fn released_before_slop(
        &mut self,
        config: &ViewConfiguration,
        stage: TapStage,
        event: &PointerEvent,
        listener: &mut dyn ZoomableGestureListener,
    ) -> Step {
        if self.is_multi_touch || self.has_moved {
            return Step::End;
        }
        let up = &event.changes[0];
        let interest = listener.tap_interest();
        match stage {
            TapStage::First { .. } => {
                if !interest.contains(TapInterest::DOUBLE_TAP) && !listener.enable_one_finger_zoom() {
                    log::debug!("tap at {:?}", up.position);
                    if interest.contains(TapInterest::TAP) {
                        listener.on_tap(up.position);
                    }
                    return Step::End;
                }
                self.phase = Phase::AwaitSecondDown {
                    first_up: up.position,
                    min_uptime: up.uptime + config.double_tap_min_time_millis,
                    deadline: up.uptime + config.double_tap_timeout_millis,
                };
                Step::Continue
            }
            TapStage::Second { down_uptime } => {
                let pressed_time = up.uptime.saturating_sub(down_uptime);
                if pressed_time < config.long_press_timeout_millis {
                    log::debug!("double tap at {:?}", up.position);
                    if interest.contains(TapInterest::DOUBLE_TAP) {
                        listener.on_double_tap(up.position);
                    }
                }
                Step::End
            }
        }
    }

    fn transform(&mut self, event: &mut PointerEvent, listener: &mut dyn ZoomableGestureListener) -> Step {
        let zoom = event.calculate_zoom();
        let pan = event.calculate_pan();
        if zoom != 1.0 || pan != Point::ZERO {
            if let Some(centroid) = event.calculate_centroid(true) {
                if listener.can_consume_gesture(pan, zoom) {
                    listener.on_gesture(centroid, pan, zoom, event.uptime());
                    event.consume_position_changes();
                }
            }
        }
        self.has_moved = true;
        if listener.cancel_if_zoom_canceled() && event.is_pointer_reduced_to_one() {
            log::debug!("multi-finger gesture reduced to one finger");
            return Step::End;
        }
        Step::Continue
    }

    fn one_finger_zoom(
        &mut self,
        config: &ViewConfiguration,
        event: &mut PointerEvent,
        listener: &mut dyn ZoomableGestureListener,
    ) -> Step {
        self.has_moved = true;
        let pan = event.calculate_pan();
        let zoom = 1.0 + pan.y * config.one_finger_zoom_sensitivity;
        if zoom != 1.0 {
            if let Some(centroid) = event.calculate_centroid(true) {
                if listener.can_consume_gesture(Point::ZERO, zoom) {
                    listener.on_gesture(centroid, Point::ZERO, zoom, event.uptime());
                    event.consume_position_changes();
                }
            }
        }
        Step::Continue
    }
}
