use zoomable_foundation::PointerKeyboardModifiers;

/// Which keyboard modifier, if any, turns the mouse wheel into zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseWheelZoom {
    Disabled,
    /// Every wheel step zooms, whatever keys are held.
    Enabled,
    #[default]
    EnabledWithCtrlKey,
    EnabledWithShiftKey,
    EnabledWithAltKey,
    /// Command on macOS.
    EnabledWithMetaKey,
}

impl MouseWheelZoom {
    pub fn matches(&self, modifiers: PointerKeyboardModifiers) -> bool {
        match self {
            MouseWheelZoom::Disabled => false,
            MouseWheelZoom::Enabled => true,
            MouseWheelZoom::EnabledWithCtrlKey => modifiers.is_ctrl_pressed(),
            MouseWheelZoom::EnabledWithShiftKey => modifiers.is_shift_pressed(),
            MouseWheelZoom::EnabledWithAltKey => modifiers.is_alt_pressed(),
            MouseWheelZoom::EnabledWithMetaKey => modifiers.is_meta_pressed(),
        }
    }
}
