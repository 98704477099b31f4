use super::*;
use directories::BaseDirs;
use std::path::PathBuf;

const PAGE_SCROLL: i32 = 10;
const WHEEL_SCROLL: i32 = 3;

impl App {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Paste(text) => {
                self.handle_paste(&text);
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
            self.should_quit = true;
            return Ok(true);
        }

        if self.ui.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dispatch(Action::DismissNotice);
            }
            return Ok(false);
        }

        if key.code == KeyCode::F(1) {
            self.dispatch(Action::ToggleHelp);
            return Ok(false);
        }

        if self.ui.show_help {
            if key.code == KeyCode::Esc {
                self.dispatch(Action::ToggleHelp);
            }
            return Ok(false);
        }

        if self.show_error_details {
            match key.code {
                KeyCode::Enter => self.clear_error(),
                KeyCode::Esc => self.show_error_details = false,
                KeyCode::Char('e') if ctrl => self.show_error_details = false,
                _ => {}
            }
            return Ok(false);
        }

        if let Some(ref mut picker) = self.file_picker {
            match key.code {
                KeyCode::Enter => {
                    let raw = picker.buffer.clone();
                    self.file_picker = None;
                    self.dispatch(Action::SelectFile(resolve_picked_path(&raw)));
                }
                KeyCode::Esc => self.file_picker = None,
                KeyCode::Backspace => picker.handle_backspace(),
                KeyCode::Delete => picker.handle_delete(),
                KeyCode::Left => picker.move_left(),
                KeyCode::Right => picker.move_right(),
                KeyCode::Home => picker.move_home(),
                KeyCode::End => picker.move_end(),
                KeyCode::Char(c) if !ctrl => picker.handle_char(c),
                _ => {}
            }
            return Ok(false);
        }

        if self.ui.chunks.is_some() {
            if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('l')) {
                self.dispatch(Action::CloseChunks);
            }
            return Ok(false);
        }

        if ctrl {
            match key.code {
                KeyCode::Char('o') => self.open_file_picker(),
                KeyCode::Char('l') => self.dispatch(Action::RequestChunks),
                KeyCode::Char('e') => {
                    if self.ui.last_error.is_some() {
                        self.show_error_details = true;
                    }
                }
                KeyCode::Char('r') => self.dispatch(Action::CheckHealth),
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.dispatch(Action::FocusNext),
            KeyCode::Enter => self.dispatch(Action::Submit),
            KeyCode::Up => self.dispatch(Action::Scroll(-1)),
            KeyCode::Down => self.dispatch(Action::Scroll(1)),
            KeyCode::PageUp => self.dispatch(Action::Scroll(-self.page_height())),
            KeyCode::PageDown => self.dispatch(Action::Scroll(self.page_height())),
            _ => match self.ui.focus {
                Focus::Prompt => self.edit_prompt(key.code),
                Focus::Response => self.navigate_response(key.code),
            },
        }

        Ok(false)
    }

    fn edit_prompt(&mut self, code: KeyCode) {
        let query = &mut self.ui.query;
        match code {
            KeyCode::Char(c) => query.handle_char(c),
            KeyCode::Backspace => query.handle_backspace(),
            KeyCode::Delete => query.handle_delete(),
            KeyCode::Left => query.move_left(),
            KeyCode::Right => query.move_right(),
            KeyCode::Home => query.move_home(),
            KeyCode::End => query.move_end(),
            _ => {}
        }
    }

    fn navigate_response(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('k') => self.dispatch(Action::Scroll(-1)),
            KeyCode::Char('j') => self.dispatch(Action::Scroll(1)),
            KeyCode::Home | KeyCode::Char('g') => self.dispatch(Action::Scroll(i32::MIN / 2)),
            KeyCode::End | KeyCode::Char('G') => self.dispatch(Action::Scroll(i32::MAX / 2)),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<bool> {
        let over_response =
            self.layout.panel_at(mouse.column, mouse.row) == Some(PanelType::Response);
        match mouse.kind {
            MouseEventKind::ScrollUp if over_response => {
                self.dispatch(Action::Scroll(-WHEEL_SCROLL))
            }
            MouseEventKind::ScrollDown if over_response => {
                self.dispatch(Action::Scroll(WHEEL_SCROLL))
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_paste(&mut self, text: &str) {
        let target = match self.file_picker {
            Some(ref mut picker) => picker,
            None if self.ui.notice.is_none() && self.ui.focus == Focus::Prompt => {
                &mut self.ui.query
            }
            None => return,
        };
        for c in text.chars().filter(|c| !c.is_control()) {
            target.handle_char(c);
        }
    }

    fn open_file_picker(&mut self) {
        let initial = self
            .ui
            .selected_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.file_picker = Some(InputState::with_text(&initial));
    }

    fn page_height(&self) -> i32 {
        self.layout
            .get_response_rect()
            .map(|r| i32::from(r.height.saturating_sub(2)).max(1))
            .unwrap_or(PAGE_SCROLL)
    }
}

/// Turns the picker text into a path. Blank input means no file was chosen.
/// Quotes left by terminal drag-and-drop are stripped and `~` is expanded.
pub(super) fn resolve_picked_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| {
            trimmed
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
        })
        .unwrap_or(trimmed);

    if unquoted.is_empty() {
        return None;
    }

    if let Some(rest) = unquoted.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return Some(dirs.home_dir().join(rest));
        }
    }

    Some(PathBuf::from(unquoted))
}
