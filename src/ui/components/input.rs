//! Search text input.
//!
//! A single-line editor for the search field. Left and Right are not handled
//! here: in the picker they move focus across the selected tags.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single-line text input.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position as a byte offset into `value`.
    cursor: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    /// Create an empty input with a placeholder.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Clear the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            (KeyCode::Backspace, _) => match self.value[..self.cursor].chars().next_back() {
                Some(c) => {
                    self.cursor -= c.len_utf8();
                    self.value.remove(self.cursor);
                    true
                }
                None => false,
            },
            (KeyCode::Delete, _) => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                    true
                } else {
                    false
                }
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.len();
                false
            }
            // Ctrl+U - clear line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    false
                } else {
                    self.clear();
                    true
                }
            }
            // Ctrl+W - delete word before cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor == 0 {
                    return false;
                }
                let before = self.value[..self.cursor].trim_end();
                let word_start = before
                    .rfind(char::is_whitespace)
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.value.replace_range(word_start..self.cursor, "");
                self.cursor = word_start;
                true
            }
            _ => false,
        }
    }
}
