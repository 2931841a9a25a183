//! Input abstraction layer.
//!
//! Normalizes pointer, wheel, and keyboard events from the host into a
//! single `InputEvent` enum. Pointer coordinates are in screen space
//! (relative to the canvas viewport); the editor converts them to model
//! space before any tool sees them.

use dg_core::Point;

/// Keyboard modifier state carried by every pointer and key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether a click adds to the selection instead of replacing it.
    pub fn multi_select(&self) -> bool {
        self.shift || self.command()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer moved, pressed or not.
    PointerMove { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer released.
    PointerUp { x: f64, y: f64, modifiers: Modifiers },

    /// Press and release on the same spot (delivered after `PointerUp`).
    Click { x: f64, y: f64, modifiers: Modifiers },

    /// Mouse wheel over the canvas. Positive `delta_y` scrolls down.
    Wheel { delta_y: f64 },

    /// Key press. `in_text_input` is set while a text field has focus.
    Key {
        key: String,
        modifiers: Modifiers,
        in_text_input: bool,
    },
}

impl InputEvent {
    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
            in_text_input: false,
        }
    }

    /// Screen position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Click { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_select_accepts_shift_ctrl_and_meta() {
        assert!(!Modifiers::NONE.multi_select());
        for mods in [
            Modifiers { shift: true, ..Modifiers::NONE },
            Modifiers { ctrl: true, ..Modifiers::NONE },
            Modifiers { meta: true, ..Modifiers::NONE },
        ] {
            assert!(mods.multi_select());
        }
        assert!(!Modifiers { alt: true, ..Modifiers::NONE }.multi_select());
    }

    #[test]
    fn position_only_for_pointer_events() {
        let click = InputEvent::Click {
            x: 3.0,
            y: 4.0,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(click.position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(InputEvent::Wheel { delta_y: 1.0 }.position(), None);
    }
}
