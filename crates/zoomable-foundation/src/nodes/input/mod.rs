pub mod dispatcher;
pub mod gestures;
pub mod types;

pub use dispatcher::{DispatchResult, PointerDispatcher};
pub use types::{
    KeyboardModifier, PointerEvent, PointerEventKind, PointerEventPass, PointerId,
    PointerInputChange, PointerKeyboardModifiers, PointerType,
};

pub mod prelude {
    pub use super::dispatcher::{DispatchResult, PointerDispatcher};
    pub use super::types::{
        KeyboardModifier, PointerEvent, PointerEventKind, PointerEventPass, PointerId,
        PointerInputChange, PointerKeyboardModifiers, PointerType,
    };
}
