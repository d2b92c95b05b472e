use smallvec::SmallVec;
use zoomable_ui_graphics::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    Mouse,
    Touch,
    Stylus,
    Unknown,
}

/// What produced a batch, as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Scroll,
    Cancel,
}

/// Dispatch passes of one batch: `Initial` runs ancestors first, `Main`
/// runs descendants first, `Final` runs ancestors first again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventPass {
    Initial,
    Main,
    Final,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyboardModifier {
    Ctrl = 0,
    Shift = 1,
    Alt = 2,
    Meta = 3,
}

/// Keyboard modifiers held while the batch was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PointerKeyboardModifiers(u8);

impl PointerKeyboardModifiers {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, modifier: KeyboardModifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn insert(&mut self, modifier: KeyboardModifier) {
        self.0 |= 1 << (modifier as u8);
    }

    pub fn contains(&self, modifier: KeyboardModifier) -> bool {
        (self.0 & (1 << (modifier as u8))) != 0
    }

    pub fn is_ctrl_pressed(&self) -> bool {
        self.contains(KeyboardModifier::Ctrl)
    }

    pub fn is_shift_pressed(&self) -> bool {
        self.contains(KeyboardModifier::Shift)
    }

    pub fn is_alt_pressed(&self) -> bool {
        self.contains(KeyboardModifier::Alt)
    }

    pub fn is_meta_pressed(&self) -> bool {
        self.contains(KeyboardModifier::Meta)
    }
}

/// State of one pointer in a batch, compared with the previous batch.
///
/// A handler claims a change by consuming it, which hides it from handlers
/// later in the dispatch order. [`PointerDispatcher::dispatch`] reports the
/// changes claimed during a dispatch by index.
///
/// [`PointerDispatcher::dispatch`]: super::PointerDispatcher::dispatch
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInputChange {
    pub id: PointerId,
    /// Milliseconds on the host's monotonic input clock.
    pub uptime: u64,
    pub position: Point,
    pub pressed: bool,
    pub previous_uptime: u64,
    pub previous_position: Point,
    pub previous_pressed: bool,
    pub consumed: bool,
    pub type_: PointerType,
    pub scroll_delta: Point,
}

impl PointerInputChange {
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn changed_to_down(&self) -> bool {
        !self.consumed && self.changed_to_down_ignore_consumed()
    }

    pub fn changed_to_down_ignore_consumed(&self) -> bool {
        !self.previous_pressed && self.pressed
    }

    pub fn changed_to_up(&self) -> bool {
        !self.consumed && self.changed_to_up_ignore_consumed()
    }

    pub fn changed_to_up_ignore_consumed(&self) -> bool {
        self.previous_pressed && !self.pressed
    }

    pub fn position_change(&self) -> Point {
        self.position - self.previous_position
    }

    pub fn position_changed(&self) -> bool {
        !self.consumed && self.position_changed_ignore_consumed()
    }

    pub fn position_changed_ignore_consumed(&self) -> bool {
        self.position_change() != Point::ZERO
    }
}

/// One batch of pointer changes delivered to every handler on the hit path.
///
/// A batch carries a change for every pointer that is down or was released
/// by it.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub changes: SmallVec<[PointerInputChange; 2]>,
    pub kind: PointerEventKind,
    pub keyboard_modifiers: PointerKeyboardModifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, changes: impl IntoIterator<Item = PointerInputChange>) -> Self {
        Self {
            changes: changes.into_iter().collect(),
            kind,
            keyboard_modifiers: PointerKeyboardModifiers::NONE,
        }
    }

    pub fn with_keyboard_modifiers(mut self, modifiers: PointerKeyboardModifiers) -> Self {
        self.keyboard_modifiers = modifiers;
        self
    }

    /// Uptime of the batch; every change of a batch shares it.
    pub fn uptime(&self) -> u64 {
        self.changes.first().map(|c| c.uptime).unwrap_or(0)
    }

    /// True while at least one pointer is down.
    pub fn is_pressed(&self) -> bool {
        self.changes.iter().any(|c| c.pressed)
    }

    pub fn is_consumed(&self) -> bool {
        self.changes.iter().any(|c| c.consumed)
    }

    pub fn pressed_count(&self) -> usize {
        self.changes.iter().filter(|c| c.pressed).count()
    }

    pub fn previously_pressed_count(&self) -> usize {
        self.changes.iter().filter(|c| c.previous_pressed).count()
    }

    pub fn consume_all(&mut self) {
        for change in self.changes.iter_mut() {
            change.consume();
        }
    }

    pub fn consume_position_changes(&mut self) {
        for change in self.changes.iter_mut() {
            if change.position_changed() {
                change.consume();
            }
        }
    }
}
