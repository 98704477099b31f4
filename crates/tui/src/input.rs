/// Single-line text buffer with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub buffer: String,
    cursor_position: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: text.to_string(),
            cursor_position: text.chars().count(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor_position
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn handle_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.buffer.insert(idx, c);
        self.cursor_position += 1;
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let idx = self.byte_index();
        self.buffer.remove(idx);
    }

    pub fn handle_delete(&mut self) {
        if self.cursor_position < self.buffer.chars().count() {
            let idx = self.byte_index();
            self.buffer.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.buffer.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_position = self.buffer.chars().count();
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}
