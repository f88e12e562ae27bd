use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use smoothscroll_core::input::WheelEvent;

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    LineUp,
    LineDown,
    LineLeft,
    LineRight,
    JumpToTop,
    JumpToBottom,
    CenterCursor,
    FocusNext,
    ToggleLinked,
    ClosePane,
    /// First key of a doubled sequence, waiting for the second
    Pending(char),
    /// Wheel input at a screen position
    Wheel {
        event: WheelEvent,
        column: u16,
        row: u16,
    },
    /// Click that focuses the pane under the pointer
    Focus { column: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
///
/// `pending` is the first key of a sequence pressed just before this one.
pub fn handle_key_event(key: KeyEvent, keymap: &Keymap, pending: Option<char>) -> Action {
    let binding = KeyBinding::new(key.code, normalize_modifiers(key));

    if let (Some(first), crossterm::event::KeyCode::Char(c)) = (pending, key.code) {
        if first == c && binding.modifiers == KeyModifiers::NONE {
            if let Some(action) = keymap.sequence(c) {
                return *action;
            }
        }
    }

    if keymap.is_sequence_prefix(&binding) {
        if let crossterm::event::KeyCode::Char(c) = key.code {
            return Action::Pending(c);
        }
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}

/// Uppercase chars arrive with SHIFT on some terminals and without on others
fn normalize_modifiers(key: KeyEvent) -> KeyModifiers {
    match key.code {
        crossterm::event::KeyCode::Char(c) if c.is_ascii_uppercase() => {
            key.modifiers | KeyModifiers::SHIFT
        }
        _ => key.modifiers,
    }
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
    let alt = mouse.modifiers.contains(KeyModifiers::ALT);
    let (column, row) = (mouse.column, mouse.row);

    let event = match mouse.kind {
        MouseEventKind::ScrollUp => WheelEvent::notch_up().with_modifiers(shift, alt),
        MouseEventKind::ScrollDown => WheelEvent::notch_down().with_modifiers(shift, alt),
        MouseEventKind::ScrollLeft => WheelEvent::notch_up().with_modifiers(true, alt),
        MouseEventKind::ScrollRight => WheelEvent::notch_down().with_modifiers(true, alt),
        MouseEventKind::Down(_) => return Action::Focus { column, row },
        _ => return Action::None,
    };
    Action::Wheel { event, column, row }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, MouseButton};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column: 4,
            row: 7,
            modifiers,
        }
    }

    #[test]
    fn test_simple_bindings() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE), &keymap, None),
            Action::CursorDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('f'), KeyModifiers::CONTROL), &keymap, None),
            Action::PageDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('?'), KeyModifiers::NONE), &keymap, None),
            Action::None
        );
    }

    #[test]
    fn test_uppercase_without_shift_flag() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('G'), KeyModifiers::NONE), &keymap, None),
            Action::JumpToBottom
        );
    }

    #[test]
    fn test_doubled_sequences() {
        let keymap = Keymap::default();
        let z = key(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(z, &keymap, None), Action::Pending('z'));
        assert_eq!(handle_key_event(z, &keymap, Some('z')), Action::CenterCursor);

        // A different pending key starts over
        let g = key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(g, &keymap, Some('z')), Action::Pending('g'));
    }

    #[test]
    fn test_mouse_wheel() {
        let action = handle_mouse_event(mouse(MouseEventKind::ScrollDown, KeyModifiers::NONE));
        assert_eq!(
            action,
            Action::Wheel {
                event: WheelEvent::notch_down(),
                column: 4,
                row: 7
            }
        );

        let action = handle_mouse_event(mouse(MouseEventKind::ScrollUp, KeyModifiers::ALT));
        assert_eq!(
            action,
            Action::Wheel {
                event: WheelEvent::notch_up().with_modifiers(false, true),
                column: 4,
                row: 7
            }
        );

        let action = handle_mouse_event(mouse(MouseEventKind::ScrollRight, KeyModifiers::NONE));
        match action {
            Action::Wheel { event, .. } => assert!(event.shift),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_mouse_click_focuses() {
        let action = handle_mouse_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            KeyModifiers::NONE,
        ));
        assert_eq!(action, Action::Focus { column: 4, row: 7 });
    }
}
