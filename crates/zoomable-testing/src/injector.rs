use smallvec::SmallVec;
use zoomable_foundation::{
    PointerEvent, PointerEventKind, PointerId, PointerInputChange, PointerInputNode,
    PointerKeyboardModifiers, PointerType, ViewConfiguration,
};
use zoomable_ui_graphics::{Point, Size};

use crate::timeline::Timeline;

/// Time a move takes unless the script says otherwise.
pub const EVENT_PERIOD_MILLIS: u64 = 16;

#[derive(Clone, Copy, Debug)]
struct TrackedPointer {
    id: PointerId,
    position: Point,
}

/// Scripted multi-touch input.
///
/// Actions queue batches; nothing reaches a node until one of the `flush`
/// methods runs.
///
/// ```ignore
/// let mut touch = TouchInjector::new(Size::new(100.0, 100.0));
/// touch.down(0, center).move_by(0, Point::new(50.0, 0.0)).up(0);
/// touch.flush_into(&mut node);
/// ```
pub struct TouchInjector {
    timeline: Timeline,
    pointers: SmallVec<[TrackedPointer; 4]>,
    last_uptime: u64,
    config: ViewConfiguration,
}

impl TouchInjector {
    pub fn new(bounds: Size) -> Self {
        Self {
            timeline: Timeline::new(bounds),
            pointers: SmallVec::new(),
            last_uptime: 0,
            config: ViewConfiguration::default(),
        }
    }

    /// Uses `config` for the timings of the compound gestures.
    pub fn with_view_configuration(mut self, config: ViewConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn bounds(&self) -> Size {
        self.timeline.bounds
    }

    pub fn center(&self) -> Point {
        self.timeline.bounds.center()
    }

    pub fn current_time(&self) -> u64 {
        self.timeline.now
    }

    pub fn position_of(&self, id: PointerId) -> Option<Point> {
        self.pointers.iter().find(|p| p.id == id).map(|p| p.position)
    }

    pub fn advance_event_time(&mut self, millis: u64) -> &mut Self {
        self.timeline.now += millis;
        self
    }

    /// Presses pointer `id` at `position`, without moving the clock.
    pub fn down(&mut self, id: PointerId, position: Point) -> &mut Self {
        assert!(
            self.position_of(id).is_none(),
            "pointer {id} is already down"
        );
        let now = self.timeline.now;
        let mut changes = self.unchanged_pointers();
        changes.push(self.change(id, position, position, false, true, now));
        self.pointers.push(TrackedPointer { id, position });
        self.emit(PointerEventKind::Down, changes);
        self
    }

    pub fn move_to(&mut self, id: PointerId, position: Point) -> &mut Self {
        self.move_pointers(&[(id, position)])
    }

    pub fn move_by(&mut self, id: PointerId, delta: Point) -> &mut Self {
        let from = self.require(id);
        self.move_to(id, from + delta)
    }

    /// Moves several pointers in one batch after one event period.
    pub fn move_pointers(&mut self, targets: &[(PointerId, Point)]) -> &mut Self {
        for (id, _) in targets {
            self.require(*id);
        }
        self.timeline.now += EVENT_PERIOD_MILLIS;
        let now = self.timeline.now;
        let previous_uptime = self.last_uptime;
        let mut changes = SmallVec::<[PointerInputChange; 2]>::new();
        for pointer in self.pointers.iter_mut() {
            let from = pointer.position;
            let to = targets
                .iter()
                .find(|(id, _)| *id == pointer.id)
                .map(|(_, position)| *position)
                .unwrap_or(from);
            pointer.position = to;
            changes.push(PointerInputChange {
                id: pointer.id,
                uptime: now,
                position: to,
                pressed: true,
                previous_uptime,
                previous_position: from,
                previous_pressed: true,
                consumed: false,
                type_: PointerType::Touch,
                scroll_delta: Point::ZERO,
            });
        }
        self.emit(PointerEventKind::Move, changes);
        self
    }

    /// Lifts pointer `id`, without moving the clock.
    pub fn up(&mut self, id: PointerId) -> &mut Self {
        let position = self.require(id);
        let now = self.timeline.now;
        let changes = self
            .pointers
            .iter()
            .map(|pointer| {
                if pointer.id == id {
                    self.change(id, position, position, true, false, now)
                } else {
                    self.change(pointer.id, pointer.position, pointer.position, true, true, now)
                }
            })
            .collect();
        self.pointers.retain(|p| p.id != id);
        self.emit(PointerEventKind::Up, changes);
        self
    }

    /// Press and release one pointer with a still move in between.
    pub fn click(&mut self, position: Point) -> &mut Self {
        self.down(0, position).move_to(0, position).up(0)
    }

    /// Two clicks separated by the middle of the double tap window.
    pub fn double_click(&mut self, position: Point) -> &mut Self {
        let gap = (self.config.double_tap_min_time_millis + self.config.double_tap_timeout_millis)
            / 2;
        self.click(position).advance_event_time(gap).click(position)
    }

    /// Press held past the long press timeout, then released.
    pub fn long_click(&mut self, position: Point) -> &mut Self {
        let hold = self.config.long_press_timeout_millis + 100;
        self.down(0, position).advance_event_time(hold).up(0)
    }

    /// Two fingers travelling from their start to their end positions in
    /// one event period steps over `duration_millis`.
    pub fn pinch(
        &mut self,
        start0: Point,
        end0: Point,
        start1: Point,
        end1: Point,
        duration_millis: u64,
    ) -> &mut Self {
        let steps = (duration_millis / EVENT_PERIOD_MILLIS).max(1);
        self.down(0, start0).down(1, start1);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            self.move_pointers(&[
                (0, start0 + (end0 - start0) * fraction),
                (1, start1 + (end1 - start1) * fraction),
            ]);
        }
        self.up(0).up(1)
    }

    /// Double tap whose second press drags vertically by `drag_y` in a
    /// single move before lifting.
    pub fn tap_and_drag_zoom(&mut self, position: Point, drag_y: f32) -> &mut Self {
        let gap = (self.config.double_tap_min_time_millis + self.config.double_tap_timeout_millis)
            / 2;
        self.click(position)
            .advance_event_time(gap)
            .down(0, position)
            .move_by(0, Point::new(0.0, drag_y))
            .up(0)
    }

    pub fn flush(&mut self, path: &mut [&mut dyn PointerInputNode]) -> Vec<PointerEvent> {
        self.timeline.flush(path)
    }

    pub fn flush_into(&mut self, node: &mut dyn PointerInputNode) -> Vec<PointerEvent> {
        self.timeline.flush(&mut [node])
    }

    fn require(&self, id: PointerId) -> Point {
        match self.position_of(id) {
            Some(position) => position,
            None => panic!("pointer {id} is not down"),
        }
    }

    fn unchanged_pointers(&self) -> SmallVec<[PointerInputChange; 2]> {
        let now = self.timeline.now;
        self.pointers
            .iter()
            .map(|p| self.change(p.id, p.position, p.position, true, true, now))
            .collect()
    }

    fn change(
        &self,
        id: PointerId,
        from: Point,
        to: Point,
        previous_pressed: bool,
        pressed: bool,
        now: u64,
    ) -> PointerInputChange {
        PointerInputChange {
            id,
            uptime: now,
            position: to,
            pressed,
            previous_uptime: self.last_uptime,
            previous_position: from,
            previous_pressed,
            consumed: false,
            type_: PointerType::Touch,
            scroll_delta: Point::ZERO,
        }
    }

    fn emit(&mut self, kind: PointerEventKind, changes: SmallVec<[PointerInputChange; 2]>) {
        self.last_uptime = self.timeline.now;
        self.timeline.push(PointerEvent {
            changes,
            kind,
            keyboard_modifiers: PointerKeyboardModifiers::NONE,
        });
    }
}

/// Scripted mouse wheel input.
pub struct MouseInjector {
    timeline: Timeline,
    position: Point,
    modifiers: PointerKeyboardModifiers,
}

impl MouseInjector {
    pub fn new(bounds: Size) -> Self {
        Self {
            position: bounds.center(),
            timeline: Timeline::new(bounds),
            modifiers: PointerKeyboardModifiers::NONE,
        }
    }

    pub fn move_to(&mut self, position: Point) -> &mut Self {
        self.position = position;
        self
    }

    pub fn with_modifiers(&mut self, modifiers: PointerKeyboardModifiers) -> &mut Self {
        self.modifiers = modifiers;
        self
    }

    /// One wheel step at the current position.
    pub fn scroll(&mut self, delta: Point) -> &mut Self {
        let previous = self.timeline.now;
        self.timeline.now += EVENT_PERIOD_MILLIS;
        let change = PointerInputChange {
            id: 0,
            uptime: self.timeline.now,
            position: self.position,
            pressed: false,
            previous_uptime: previous,
            previous_position: self.position,
            previous_pressed: false,
            consumed: false,
            type_: PointerType::Mouse,
            scroll_delta: delta,
        };
        self.timeline.push(
            PointerEvent::new(PointerEventKind::Scroll, [change])
                .with_keyboard_modifiers(self.modifiers),
        );
        self
    }

    pub fn flush(&mut self, path: &mut [&mut dyn PointerInputNode]) -> Vec<PointerEvent> {
        self.timeline.flush(path)
    }

    pub fn flush_into(&mut self, node: &mut dyn PointerInputNode) -> Vec<PointerEvent> {
        self.timeline.flush(&mut [node])
    }
}
