use crossterm::event::KeyCode;

/// Cursor and horizontal-scroll state for a single-line text input. The text
/// value itself lives in the form; `handle_key` returns the new value when a
/// key press changed it.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    cursor_pos: usize,
    scroll_offset: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_cursor_to_end(&mut self, text: &str) {
        self.cursor_pos = text.chars().count();
    }

    pub fn reset(&mut self) {
        self.cursor_pos = 0;
        self.scroll_offset = 0;
    }

    /// Apply a key press to `current_value`. Returns Some(new_value) when the
    /// text changed, None when only the cursor moved (or nothing happened).
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        current_value: &str,
        max_length: Option<usize>,
    ) -> Option<String> {
        let char_count = current_value.chars().count();
        // Cursor may be stale after the value was replaced externally.
        if self.cursor_pos > char_count {
            self.cursor_pos = char_count;
        }

        match key {
            KeyCode::Char(c) => {
                if max_length.is_some_and(|max| char_count >= max) {
                    return None;
                }
                let mut chars: Vec<char> = current_value.chars().collect();
                chars.insert(self.cursor_pos, c);
                self.cursor_pos += 1;
                Some(chars.into_iter().collect())
            }
            KeyCode::Backspace => {
                if self.cursor_pos == 0 {
                    return None;
                }
                let mut chars: Vec<char> = current_value.chars().collect();
                chars.remove(self.cursor_pos - 1);
                self.cursor_pos -= 1;
                Some(chars.into_iter().collect())
            }
            KeyCode::Delete => {
                if self.cursor_pos >= char_count {
                    return None;
                }
                let mut chars: Vec<char> = current_value.chars().collect();
                chars.remove(self.cursor_pos);
                Some(chars.into_iter().collect())
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor_pos < char_count {
                    self.cursor_pos += 1;
                }
                None
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                None
            }
            KeyCode::End => {
                self.cursor_pos = char_count;
                None
            }
            _ => None,
        }
    }

    /// Keep the cursor inside the visible window. Called during rendering.
    pub fn update_scroll(&mut self, visible_width: usize, text: &str) {
        if visible_width == 0 {
            return;
        }
        if self.cursor_pos < self.scroll_offset {
            self.scroll_offset = self.cursor_pos;
        } else if self.cursor_pos >= self.scroll_offset + visible_width {
            self.scroll_offset = self.cursor_pos - (visible_width - 1);
        }
        let max_offset = text.chars().count().saturating_sub(visible_width);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}
