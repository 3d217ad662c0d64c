//! Event handling for dialog surfaces.

/// Events that can reach a dialog through its surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A pointer button was pressed.
    PointerDown(PointerEvent),
    /// The pointer moved.
    PointerMove(PointerEvent),
    /// A pointer button was released.
    PointerUp(PointerEvent),
    /// An element was activated with a click.
    Click,
    /// A key was pressed.
    KeyDown(Key),
    /// The window was resized.
    Resize(u32, u32),
}

/// A pointer position with the button involved, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub button: PointerButton,
}

impl PointerEvent {
    /// Create a primary-button pointer event at the given position.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// Set the button.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Whether the primary button is involved.
    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    /// The main button (usually left).
    #[default]
    Primary,
    /// The context-menu button (usually right).
    Secondary,
    /// The wheel button.
    Middle,
    /// Any other button, by index.
    Other(u8),
}

/// Keys a dialog cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Char(char),
}

/// Check if a key is Escape.
pub fn is_escape(key: &Key) -> bool {
    *key == Key::Escape
}

/// Check if a key is Enter.
pub fn is_enter(key: &Key) -> bool {
    *key == Key::Enter
}
