//! Input event types and key binding matching.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Anything the bindings cannot name.
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT),
        }
    }
}

/// A processed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            key: Key::from(event.code),
            modifiers: Modifiers::from(event.modifiers),
        }
    }
}

impl InputEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// The typed character, if this is plain text input.
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => Some(c),
            _ => None,
        }
    }

    pub fn ctrl(&self) -> bool {
        self.modifiers.ctrl
    }

    /// Check if this matches a key binding string (e.g. "Ctrl+q", "Enter", "F2").
    ///
    /// Single-character bindings ignore Shift, since terminals report it for
    /// punctuation such as `?`.
    pub fn matches(&self, binding: &str) -> bool {
        let mut expected_ctrl = false;
        let mut expected_alt = false;
        let mut expected_shift = false;
        let mut expected_key = "";

        for part in binding.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" => expected_ctrl = true,
                "alt" => expected_alt = true,
                "shift" => expected_shift = true,
                _ => expected_key = part,
            }
        }

        let single_char = expected_key.chars().count() == 1;
        let shift_ok = self.modifiers.shift == expected_shift || (single_char && !expected_shift);
        if self.modifiers.ctrl != expected_ctrl || self.modifiers.alt != expected_alt || !shift_ok
        {
            return false;
        }

        match expected_key.to_lowercase().as_str() {
            "enter" => self.key == Key::Enter,
            "esc" | "escape" => self.key == Key::Escape,
            "backspace" => self.key == Key::Backspace,
            "tab" => self.key == Key::Tab,
            "up" => self.key == Key::Up,
            "down" => self.key == Key::Down,
            "left" => self.key == Key::Left,
            "right" => self.key == Key::Right,
            "home" => self.key == Key::Home,
            "end" => self.key == Key::End,
            "pageup" => self.key == Key::PageUp,
            "pagedown" => self.key == Key::PageDown,
            s if s.starts_with('f') && s.len() > 1 && s.len() <= 3 => {
                s[1..].parse::<u8>().is_ok_and(|n| self.key == Key::F(n))
            }
            _ if single_char => expected_key.chars().next().is_some_and(|c| {
                self.key == Key::Char(c.to_ascii_lowercase())
                    || self.key == Key::Char(c.to_ascii_uppercase())
            }),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> InputEvent {
        InputEvent::from(KeyEvent::new(code, mods))
    }

    #[test]
    fn test_plain_char_binding() {
        assert!(key(KeyCode::Char('q'), KeyModifiers::NONE).matches("q"));
        assert!(key(KeyCode::Char('Q'), KeyModifiers::SHIFT).matches("q"));
        assert!(!key(KeyCode::Char('w'), KeyModifiers::NONE).matches("q"));
    }

    #[test]
    fn test_shifted_punctuation_matches() {
        assert!(key(KeyCode::Char('?'), KeyModifiers::SHIFT).matches("?"));
        assert!(key(KeyCode::Char('/'), KeyModifiers::NONE).matches("/"));
    }

    #[test]
    fn test_modifier_bindings() {
        assert!(key(KeyCode::Char('c'), KeyModifiers::CONTROL).matches("Ctrl+c"));
        assert!(!key(KeyCode::Char('c'), KeyModifiers::NONE).matches("Ctrl+c"));
        assert!(!key(KeyCode::Char('c'), KeyModifiers::CONTROL).matches("c"));
        assert!(!key(KeyCode::Tab, KeyModifiers::NONE).matches("Shift+Tab"));
    }

    #[test]
    fn test_named_and_function_keys() {
        assert!(key(KeyCode::Enter, KeyModifiers::NONE).matches("Enter"));
        assert!(key(KeyCode::Esc, KeyModifiers::NONE).matches("Esc"));
        assert!(key(KeyCode::F(3), KeyModifiers::NONE).matches("F3"));
        assert!(!key(KeyCode::F(3), KeyModifiers::NONE).matches("F4"));
        assert!(!key(KeyCode::Char('f'), KeyModifiers::NONE).matches("F1"));
    }

    #[test]
    fn test_text_excludes_control_chords() {
        assert_eq!(key(KeyCode::Char('A'), KeyModifiers::SHIFT).text(), Some('A'));
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::CONTROL).text(), None);
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE).text(), None);
    }
}
