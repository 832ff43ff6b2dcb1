/// Single-line text buffer used by the prompt dialogs.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set(text);
        input
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_char() {
            self.cursor -= prev.len_utf8();
            self.buffer.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_char() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.buffer[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
    }

    /// Returns the trimmed contents and empties the buffer.
    pub fn take_trimmed(&mut self) -> String {
        let text = self.buffer.trim().to_string();
        self.clear();
        text
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    fn prev_char(&self) -> Option<char> {
        self.buffer[..self.cursor].chars().next_back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_in_middle() {
        let mut input = InputState::new();
        input.insert_char('a');
        input.insert_char('c');
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.as_str(), "abc");
        assert_eq!(input.cursor_pos(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = InputState::with_text("a");
        input.move_home();
        input.backspace();
        assert_eq!(input.as_str(), "a");
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn test_delete_under_cursor() {
        let mut input = InputState::with_text("abc");
        input.move_home();
        input.delete();
        assert_eq!(input.as_str(), "bc");
        input.move_end();
        input.delete();
        assert_eq!(input.as_str(), "bc");
    }

    #[test]
    fn test_multibyte_navigation() {
        let mut input = InputState::new();
        input.insert_str("h\u{00e9}\u{1f600}");
        assert_eq!(input.cursor_pos(), 1 + 2 + 4);
        assert_eq!(input.cursor_column(), 3);

        input.move_left();
        assert_eq!(input.cursor_pos(), 3);
        input.backspace();
        assert_eq!(input.as_str(), "h\u{1f600}");
        assert_eq!(input.cursor_pos(), 1);
        input.move_right();
        assert_eq!(input.cursor_pos(), 5);
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let mut input = InputState::with_text("   ");
        assert!(input.is_empty());
        input.set("  Groceries ");
        assert!(!input.is_empty());
        assert_eq!(input.take_trimmed(), "Groceries");
        assert_eq!(input.as_str(), "");
        assert_eq!(input.cursor_pos(), 0);
    }
}
