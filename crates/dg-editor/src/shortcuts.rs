//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so every host
//! shares one binding table.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete every selected edge and node.
    Delete,
    /// Clear the selection and return to the select tool.
    Escape,
    /// Ask the host to open its save dialog. Never saves directly.
    RequestSave,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"s"`, `"Delete"`).
    /// Delete/Backspace are ignored while a text field has focus so typing
    /// never removes diagram elements.
    pub fn resolve(key: &str, modifiers: Modifiers, in_text_input: bool) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "s" | "S" => Some(ShortcutAction::RequestSave),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" if !in_text_input => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Escape),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE, false),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn delete_ignored_in_text_input() {
        assert_eq!(ShortcutMap::resolve("Backspace", Modifiers::NONE, true), None);
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE, true),
            Some(ShortcutAction::Escape)
        );
    }

    #[test]
    fn resolve_save_request() {
        assert_eq!(
            ShortcutMap::resolve("s", CTRL, false),
            Some(ShortcutAction::RequestSave)
        );
        assert_eq!(
            ShortcutMap::resolve("S", META, true),
            Some(ShortcutAction::RequestSave)
        );
        assert_eq!(ShortcutMap::resolve("s", Modifiers::NONE, false), None);
    }

    #[test]
    fn unbound_keys_resolve_to_none() {
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE, false), None);
        assert_eq!(ShortcutMap::resolve("Delete", CTRL, false), None);
    }
}
