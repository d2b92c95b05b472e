use std::cell::RefCell;
use std::rc::Rc;

use zoomable::prelude::*;
use zoomable::MIN_SCALE;
use zoomable_core::FrameClock;
use zoomable_foundation::{
    KeyboardModifier, PointerEvent, PointerEventKind, PointerEventPass, PointerKeyboardModifiers,
};
use zoomable_testing::{MouseInjector, TouchInjector};
use zoomable_ui_graphics::{Point, Size};

const BOUNDS: Size = Size {
    width: 100.0,
    height: 100.0,
};
const FRAME_NANOS: u64 = 16_000_000;

struct Fixture {
    clock: FrameClock,
    state: ZoomState,
    node: ZoomableNode,
    touch: TouchInjector,
}

impl Fixture {
    fn new(options: ZoomableOptions) -> Self {
        let clock = FrameClock::new();
        let state = ZoomState::new(clock.clone(), ZoomStateConfig::default()).expect("valid");
        let mut node = ZoomableNode::new(state.clone(), options);
        node.on_measured(BOUNDS);
        Self {
            clock,
            state,
            node,
            touch: TouchInjector::new(BOUNDS),
        }
    }

    fn flush(&mut self) -> Vec<PointerEvent> {
        self.touch.flush_into(&mut self.node)
    }

    /// Runs frames until every animation of the state has ended.
    fn settle(&self) {
        let mut time = self.clock.last_frame_nanos().unwrap_or(0);
        for _ in 0..2_000 {
            if !self.state.is_animating() {
                return;
            }
            time += FRAME_NANOS;
            self.clock.drain_frame_callbacks(time);
        }
        panic!("animations did not settle");
    }
}

/// Sums the movement that reaches it unconsumed.
#[derive(Default)]
struct ScrollableParent {
    received: Point,
}

impl PointerInputNode for ScrollableParent {
    fn on_pointer_event(
        &mut self,
        event: &mut PointerEvent,
        pass: PointerEventPass,
        _bounds: Size,
    ) -> bool {
        if pass != PointerEventPass::Main || event.kind != PointerEventKind::Move {
            return false;
        }
        for change in event.changes.iter_mut().filter(|c| !c.consumed) {
            self.received += change.position_change();
            change.consume();
        }
        true
    }
}

fn drag(touch: &mut TouchInjector, from: Point, step: Point, steps: usize) {
    touch.down(0, from);
    for _ in 0..steps {
        touch.move_by(0, step);
    }
    touch.up(0);
}

fn ctrl() -> PointerKeyboardModifiers {
    PointerKeyboardModifiers::NONE.with(KeyboardModifier::Ctrl)
}

#[test]
fn measuring_sets_layout_size() {
    let fixture = Fixture::new(ZoomableOptions::zoomable());
    assert_eq!(fixture.state.layout_size(), BOUNDS);
    assert_eq!(fixture.node.measured_size(), BOUNDS);
}

#[test]
fn pinch_zooms_up_to_max_scale() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let c = fixture.touch.center();
    fixture.touch.pinch(
        c - Point::new(10.0, 0.0),
        c - Point::new(60.0, 0.0),
        c + Point::new(10.0, 0.0),
        c + Point::new(60.0, 0.0),
        160,
    );
    fixture.flush();
    fixture.settle();

    assert_eq!(fixture.state.scale(), 5.0);
    let layer = fixture.node.graphics_layer();
    assert_eq!(layer.scale_x, 5.0);
    assert_eq!(layer.scale_y, 5.0);
}

#[test]
fn snap_back_returns_to_identity_after_pinch() {
    let mut fixture = Fixture::new(ZoomableOptions::snap_back());
    let c = fixture.touch.center();
    fixture.touch.pinch(
        c - Point::new(10.0, 0.0),
        c - Point::new(30.0, 10.0),
        c + Point::new(10.0, 0.0),
        c + Point::new(30.0, 30.0),
        160,
    );
    fixture.flush();
    assert!(fixture.state.is_animating());

    fixture.settle();
    assert_eq!(fixture.state.scale(), 1.0);
    assert_eq!(fixture.state.offset(), Point::ZERO);
    assert!(fixture.node.graphics_layer().is_identity());
}

fn spread_two_fingers(touch: &mut TouchInjector, from: f32, to: f32) {
    let c = touch.center();
    touch
        .down(0, c - Point::new(from, 0.0))
        .down(1, c + Point::new(from, 0.0))
        .move_pointers(&[
            (0, c - Point::new(to, 0.0)),
            (1, c + Point::new(to, 0.0)),
        ]);
}

#[test]
fn lost_pointer_input_still_snaps_back() {
    let mut fixture = Fixture::new(ZoomableOptions::snap_back());
    spread_two_fingers(&mut fixture.touch, 10.0, 20.0);
    fixture.flush();
    assert!((fixture.state.scale() - 2.0).abs() < 1e-4);

    fixture.node.on_cancel_pointer_input();
    assert!(fixture.state.is_animating());
    fixture.settle();
    assert_eq!(fixture.state.scale(), 1.0);
    assert_eq!(fixture.state.offset(), Point::ZERO);
}

#[test]
fn lost_pointer_input_restores_shrunk_content() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    spread_two_fingers(&mut fixture.touch, 20.0, 10.0);
    fixture.flush();
    assert_eq!(fixture.state.scale(), MIN_SCALE);

    fixture.node.on_cancel_pointer_input();
    fixture.settle();
    assert_eq!(fixture.state.scale(), 1.0);
}

#[test]
fn drag_pans_zoomed_content_and_flings() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    fixture
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(50.0, 50.0), 0);

    drag(&mut fixture.touch, Point::new(50.0, 50.0), Point::new(10.0, 0.0), 3);
    let delivered = fixture.flush();
    assert!(delivered
        .iter()
        .filter(|e| e.kind == PointerEventKind::Move)
        .all(PointerEvent::is_consumed));
    assert_eq!(fixture.state.offset_x(), 30.0);

    fixture.settle();
    assert!(fixture.state.offset_x() > 30.0);
    assert!(fixture.state.offset_x() <= 50.0);
    assert_eq!(fixture.state.scale(), 2.0);
}

#[test]
fn unzoomed_drag_goes_to_ancestor() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let mut parent = ScrollableParent::default();

    drag(&mut fixture.touch, Point::new(50.0, 50.0), Point::new(10.0, 0.0), 3);
    let mut path: [&mut dyn PointerInputNode; 2] = [&mut parent, &mut fixture.node];
    fixture.touch.flush(&mut path);

    assert_eq!(parent.received, Point::new(30.0, 0.0));
    assert_eq!(fixture.state.offset(), Point::ZERO);
}

#[test]
fn drag_past_content_edge_goes_to_ancestor() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let mut parent = ScrollableParent::default();
    // Left edge of the content at the left edge of the layout.
    fixture
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(0.0, 50.0), 0);
    assert_eq!(fixture.state.offset_x(), 50.0);

    drag(&mut fixture.touch, Point::new(50.0, 50.0), Point::new(10.0, 0.0), 3);
    {
        let mut path: [&mut dyn PointerInputNode; 2] = [&mut parent, &mut fixture.node];
        fixture.touch.flush(&mut path);
    }
    assert_eq!(parent.received, Point::new(30.0, 0.0));
    assert_eq!(fixture.state.offset_x(), 50.0);

    parent.received = Point::ZERO;
    drag(&mut fixture.touch, Point::new(50.0, 50.0), Point::new(-10.0, 0.0), 3);
    {
        let mut path: [&mut dyn PointerInputNode; 2] = [&mut parent, &mut fixture.node];
        fixture.touch.flush(&mut path);
    }
    assert_eq!(parent.received, Point::ZERO);
    assert_eq!(fixture.state.offset_x(), 20.0);
}

#[test]
fn not_zoomed_policy_keeps_drag_while_zoomed() {
    let mut fixture = Fixture::new(
        ZoomableOptions::zoomable()
            .with_scroll_gesture_propagation(ScrollGesturePropagation::NotZoomed),
    );
    let mut parent = ScrollableParent::default();
    fixture
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(0.0, 50.0), 0);

    drag(&mut fixture.touch, Point::new(50.0, 50.0), Point::new(10.0, 0.0), 3);
    let mut path: [&mut dyn PointerInputNode; 2] = [&mut parent, &mut fixture.node];
    fixture.touch.flush(&mut path);

    assert_eq!(parent.received, Point::ZERO);
    assert_eq!(fixture.state.offset_x(), 50.0);
}

#[test]
fn double_tap_toggles_scale_exactly() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let position = Point::new(30.0, 60.0);

    fixture.touch.double_click(position);
    fixture.flush();
    fixture.settle();
    assert_eq!(fixture.state.scale(), 2.5);
    assert_eq!(fixture.state.offset(), Point::new(30.0, -15.0));

    fixture.touch.double_click(position);
    fixture.flush();
    fixture.settle();
    assert_eq!(fixture.state.scale(), 1.0);
    assert_eq!(fixture.state.offset(), Point::ZERO);
    assert_eq!(fixture.state.offset_bounds(), Point::ZERO);
}

#[test]
fn tap_and_drag_zooms_with_one_finger() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let c = fixture.touch.center();
    fixture.touch.tap_and_drag_zoom(c, 125.0);
    fixture.flush();
    fixture.settle();
    assert!((fixture.state.scale() - 1.5).abs() < 1e-4);
}

#[test]
fn disabled_zoom_ignores_input_but_reports_taps() {
    let taps = Rc::new(RefCell::new(Vec::new()));
    let recorded = taps.clone();
    let mut fixture = Fixture::new(
        ZoomableOptions::zoomable()
            .with_zoom_enabled(false)
            .with_mouse_wheel_zoom(MouseWheelZoom::Enabled)
            .on_tap(move |position| recorded.borrow_mut().push(position)),
    );
    let c = fixture.touch.center();
    fixture.touch.pinch(
        c - Point::new(10.0, 0.0),
        c - Point::new(40.0, 0.0),
        c + Point::new(10.0, 0.0),
        c + Point::new(40.0, 0.0),
        160,
    );
    fixture.touch.double_click(c);
    fixture
        .touch
        .advance_event_time(500)
        .click(Point::new(10.0, 20.0))
        .advance_event_time(500);
    let delivered = fixture.flush();
    fixture.settle();

    assert_eq!(fixture.state.scale(), 1.0);
    assert!(delivered
        .iter()
        .filter(|e| e.kind == PointerEventKind::Move && e.changes.len() == 2)
        .all(|e| !e.is_consumed()));
    assert_eq!(*taps.borrow(), vec![Point::new(10.0, 20.0)]);

    let mut mouse = MouseInjector::new(BOUNDS);
    mouse.scroll(Point::new(0.0, -1.0));
    mouse.flush_into(&mut fixture.node);
    assert_eq!(fixture.state.scale(), 1.0);
}

#[test]
fn callbacks_receive_positions() {
    let taps = Rc::new(RefCell::new(Vec::new()));
    let double_taps = Rc::new(RefCell::new(Vec::new()));
    let long_presses = Rc::new(RefCell::new(Vec::new()));
    let options = {
        let taps = taps.clone();
        let double_taps = double_taps.clone();
        let long_presses = long_presses.clone();
        ZoomableOptions::zoomable()
            .on_tap(move |p| taps.borrow_mut().push(p))
            .on_double_tap(move |state, p| double_taps.borrow_mut().push((state.scale(), p)))
            .on_long_press(move |p| long_presses.borrow_mut().push(p))
    };
    let mut fixture = Fixture::new(options);

    fixture.touch.click(Point::new(10.0, 10.0));
    fixture.flush();
    assert!(taps.borrow().is_empty());
    fixture.touch.advance_event_time(300);
    fixture.flush();
    assert_eq!(*taps.borrow(), vec![Point::new(10.0, 10.0)]);

    fixture.touch.double_click(Point::new(20.0, 20.0));
    fixture.touch.long_click(Point::new(30.0, 30.0));
    fixture.flush();

    assert_eq!(*double_taps.borrow(), vec![(1.0, Point::new(20.0, 20.0))]);
    assert_eq!(*long_presses.borrow(), vec![Point::new(30.0, 30.0)]);
    // A custom double tap replaces the default zoom.
    assert!(!fixture.state.is_animating());
    assert_eq!(fixture.state.scale(), 1.0);
}

#[test]
fn ctrl_wheel_zooms_at_pointer() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let mut mouse = MouseInjector::new(BOUNDS);

    mouse.move_to(Point::ZERO).scroll(Point::new(0.0, -1.0));
    let delivered = mouse.flush_into(&mut fixture.node);
    assert!(!delivered[0].is_consumed());
    assert_eq!(fixture.state.scale(), 1.0);

    mouse.with_modifiers(ctrl()).scroll(Point::new(0.0, -1.0));
    let delivered = mouse.flush_into(&mut fixture.node);
    assert!(delivered[0].is_consumed());
    assert!((fixture.state.scale() - 1.3).abs() < 1e-5);
    assert!((fixture.state.offset_x() - 15.0).abs() < 1e-3);
    assert!((fixture.state.offset_y() - 15.0).abs() < 1e-3);
    assert!(!fixture.state.is_animating());
}

#[test]
fn wheel_zoom_out_stops_at_one() {
    let mut fixture =
        Fixture::new(ZoomableOptions::zoomable().with_mouse_wheel_zoom(MouseWheelZoom::Enabled));
    let mut mouse = MouseInjector::new(BOUNDS);
    mouse
        .scroll(Point::new(0.0, -1.0))
        .scroll(Point::new(0.0, 10.0))
        .scroll(Point::new(0.0, 10.0));
    mouse.flush_into(&mut fixture.node);
    assert_eq!(fixture.state.scale(), 1.0);
}

#[test]
fn disabled_wheel_leaves_scroll_alone() {
    let mut fixture = Fixture::new(ZoomableOptions::snap_back());
    let mut mouse = MouseInjector::new(BOUNDS);
    mouse.with_modifiers(ctrl()).scroll(Point::new(0.0, -1.0));
    let delivered = mouse.flush_into(&mut fixture.node);
    assert!(!delivered[0].is_consumed());
    assert_eq!(fixture.state.scale(), 1.0);
}

#[test]
fn new_state_receives_measured_size() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    let replacement =
        ZoomState::new(fixture.clock.clone(), ZoomStateConfig::default()).expect("valid");
    assert_eq!(replacement.layout_size(), Size::ZERO);

    fixture
        .node
        .update(replacement.clone(), ZoomableOptions::zoomable());
    assert_eq!(replacement.layout_size(), BOUNDS);
    assert!(fixture.node.state().ptr_eq(&replacement));
}

#[test]
fn tap_callback_appearing_restarts_detection() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    fixture
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(50.0, 50.0), 0);
    let c = fixture.touch.center();
    fixture
        .touch
        .down(0, c)
        .move_by(0, Point::new(10.0, 0.0))
        .move_by(0, Point::new(10.0, 0.0));
    fixture.flush();
    assert_eq!(fixture.state.offset_x(), 20.0);

    fixture
        .node
        .update(fixture.state.clone(), ZoomableOptions::zoomable().on_tap(|_| {}));
    fixture.touch.move_by(0, Point::new(10.0, 0.0)).up(0);
    fixture.flush();
    assert_eq!(fixture.state.offset_x(), 20.0);
}

#[test]
fn replacing_a_callback_keeps_the_gesture() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable().on_tap(|_| {}));
    fixture
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(50.0, 50.0), 0);
    let c = fixture.touch.center();
    fixture
        .touch
        .down(0, c)
        .move_by(0, Point::new(10.0, 0.0))
        .move_by(0, Point::new(10.0, 0.0));
    fixture.flush();

    fixture
        .node
        .update(fixture.state.clone(), ZoomableOptions::zoomable().on_tap(|_| {}));
    fixture.touch.move_by(0, Point::new(10.0, 0.0));
    fixture.flush();
    assert_eq!(fixture.state.offset_x(), 30.0);
}

#[test]
fn dispose_stops_animations() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable());
    fixture.touch.double_click(Point::new(50.0, 50.0));
    fixture.flush();
    fixture.clock.drain_frame_callbacks(FRAME_NANOS);
    assert!(fixture.state.is_animating());

    fixture.node.dispose();
    assert!(!fixture.state.is_animating());
    assert!(!fixture.clock.has_pending_frame_callbacks());
}

#[test]
fn nested_scroll_pans_with_leftover_delta() {
    let mut fixture = Fixture::new(ZoomableOptions::zoomable_with_scroll());
    fixture
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(50.0, 50.0), 0);
    assert_eq!(
        fixture.node.on_post_scroll(Point::new(80.0, 0.0)),
        Point::new(50.0, 0.0)
    );
    assert_eq!(fixture.state.offset_x(), 50.0);

    let mut plain = Fixture::new(ZoomableOptions::zoomable());
    plain
        .state
        .apply_gesture(Point::ZERO, 2.0, Point::new(50.0, 50.0), 0);
    assert_eq!(plain.node.on_post_scroll(Point::new(80.0, 0.0)), Point::ZERO);
    assert_eq!(plain.state.offset_x(), 0.0);
}
