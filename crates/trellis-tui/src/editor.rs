//! Multi-line text editor used for card descriptions.
//!
//! The buffer is one flat `String` with a byte cursor that always sits on a
//! char boundary. Line and column are derived from the text whenever they
//! are needed, so no second representation can drift out of sync.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Submit(String),
    Cancel,
}

/// Start offset and byte length of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    start: usize,
    len: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiLineEditor {
    text: String,
    cursor: usize,
}

impl MultiLineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut editor = Self::new();
        editor.set_text(text);
        editor
    }

    /// Replaces the buffer and puts the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_before(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn delete_at(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_line_start(&mut self) {
        let (line, _) = self.locate();
        self.cursor = self.lines()[line].start;
    }

    pub fn move_line_end(&mut self) {
        let (line, _) = self.locate();
        let span = self.lines()[line];
        self.cursor = span.start + span.len;
    }

    pub fn move_up(&mut self) {
        let (line, column) = self.locate();
        if line > 0 {
            self.cursor = self.offset_in_line(line - 1, column);
        }
    }

    pub fn move_down(&mut self) {
        let (line, column) = self.locate();
        if line + 1 < self.lines().len() {
            self.cursor = self.offset_in_line(line + 1, column);
        }
    }

    /// Cursor line and column, both counted in characters.
    pub fn cursor_position(&self) -> (usize, usize) {
        self.locate()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Enter if alt => self.insert_newline(),
            KeyCode::Enter => return EditorAction::Submit(self.text.clone()),
            KeyCode::Char('n') if ctrl => self.insert_newline(),
            KeyCode::Char('h') if ctrl => self.delete_before(),
            KeyCode::Char('\x7f') | KeyCode::Backspace => self.delete_before(),
            KeyCode::Delete => self.delete_at(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Tab => self.insert_str("  "),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),
            _ => {}
        }
        EditorAction::None
    }

    /// Renders the buffer with the character under the cursor reversed.
    pub fn render_lines(&self, style: Style) -> Vec<Line<'static>> {
        let cursor_style = style.add_modifier(Modifier::REVERSED);
        let (cursor_line, _) = self.locate();
        self.lines()
            .iter()
            .enumerate()
            .map(|(index, span)| {
                let text = &self.text[span.start..span.start + span.len];
                if index != cursor_line {
                    return Line::from(Span::styled(text.to_string(), style));
                }
                let split = self.cursor - span.start;
                let (before, rest) = text.split_at(split);
                let mut chars = rest.chars();
                let under = chars.next().map(String::from).unwrap_or_else(|| " ".into());
                Line::from(vec![
                    Span::styled(before.to_string(), style),
                    Span::styled(under, cursor_style),
                    Span::styled(chars.as_str().to_string(), style),
                ])
            })
            .collect()
    }

    fn lines(&self) -> Vec<LineSpan> {
        let mut spans = Vec::new();
        let mut start = 0;
        for line in self.text.split('\n') {
            spans.push(LineSpan {
                start,
                len: line.len(),
            });
            start += line.len() + 1;
        }
        spans
    }

    fn locate(&self) -> (usize, usize) {
        let lines = self.lines();
        let line = lines
            .iter()
            .rposition(|span| span.start <= self.cursor)
            .unwrap_or(0);
        let start = lines[line].start;
        let column = self.text[start..self.cursor].chars().count();
        (line, column)
    }

    /// Byte offset of `column` on `line`, clamped to the line's length.
    fn offset_in_line(&self, line: usize, column: usize) -> usize {
        let span = self.lines()[line];
        let text = &self.text[span.start..span.start + span.len];
        let within = text
            .char_indices()
            .nth(column)
            .map(|(offset, _)| offset)
            .unwrap_or(span.len);
        span.start + within
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_then_delete_restores_buffer() {
        let mut editor = MultiLineEditor::with_text("hello world");
        editor.move_left();
        editor.move_left();
        let before = editor.clone();

        editor.insert_str("ünï");
        for _ in 0..3 {
            editor.delete_before();
        }
        assert_eq!(editor, before);
    }

    #[test]
    fn test_delete_before_at_start_is_noop() {
        let mut editor = MultiLineEditor::new();
        editor.delete_before();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_down_preserves_column() {
        let mut editor = MultiLineEditor::with_text("0123456789\nabc\n01234567");
        editor.cursor = 7;
        editor.move_down();
        assert_eq!(editor.cursor_position(), (1, 3));
        editor.move_down();
        assert_eq!(editor.cursor_position(), (2, 3));
        editor.move_up();
        editor.move_up();
        assert_eq!(editor.cursor_position(), (0, 3));
    }

    #[test]
    fn test_vertical_moves_stop_at_edges() {
        let mut editor = MultiLineEditor::with_text("one\ntwo");
        editor.move_down();
        assert_eq!(editor.cursor_position(), (1, 3));
        editor.cursor = 1;
        editor.move_up();
        assert_eq!(editor.cursor_position(), (0, 1));
    }

    #[test]
    fn test_home_and_end_stay_on_line() {
        let mut editor = MultiLineEditor::with_text("first\nsecond");
        editor.move_line_start();
        assert_eq!(editor.cursor(), 6);
        editor.move_up();
        editor.move_line_end();
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn test_key_handling() {
        let mut editor = MultiLineEditor::new();
        editor.handle_key(key(KeyCode::Char('a')));
        editor.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        editor.handle_key(key(KeyCode::Tab));
        editor.handle_key(key(KeyCode::Char('b')));
        editor.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        editor.handle_key(key(KeyCode::Char('c')));
        editor.handle_key(key(KeyCode::Char('\x7f')));
        editor.handle_key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL));
        assert_eq!(editor.text(), "a\n  b");

        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            EditorAction::Submit("a\n  b".to_string())
        );
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), EditorAction::Cancel);
    }

    #[test]
    fn test_render_marks_cursor() {
        let editor = MultiLineEditor::with_text("ab\ncd");
        let lines = editor.render_lines(Style::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[1].content, " ");
        assert_eq!(lines[0].spans.len(), 1);
    }
}
