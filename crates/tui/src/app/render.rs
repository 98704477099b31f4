use super::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

const SNIPPET_WIDTH: usize = 60;

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        self.layout.calculate_layout(area);
        let panels = self.layout.get_panels().to_vec();
        if let Some(rect) = self.layout.get_response_rect() {
            self.ui.set_response_viewport(ratatui::layout::Size::new(
                rect.width.saturating_sub(2),
                rect.height.saturating_sub(2),
            ));
        }

        for panel in panels {
            match panel.panel_type {
                PanelType::Topbar => self.render_topbar(frame, panel.rect),
                PanelType::Upload => self.render_upload(frame, panel.rect),
                PanelType::Prompt => self.render_prompt(frame, panel.rect),
                PanelType::Response => self.render_response(frame, panel.rect),
                PanelType::Footer => self.render_footer(frame, panel.rect),
            }
        }

        if self.ui.chunks.is_some() {
            self.render_chunks(frame, area);
        }

        if let Some(ref picker) = self.file_picker {
            self.render_file_picker(frame, area, picker);
        }

        if self.ui.show_help {
            self.render_help(frame, area);
        }

        if self.show_error_details {
            self.render_error_details(frame, area);
        }

        if let Some(ref notice) = self.ui.notice {
            self.render_notice(frame, area, notice);
        }
    }

    fn render_topbar(&self, frame: &mut Frame, area: Rect) {
        let service = match self.ui.service {
            ServiceStatus::Unknown => Span::raw("service: ○ checking"),
            ServiceStatus::Online(_) => {
                Span::styled("service: ● online", Style::default().fg(Color::Green))
            }
            ServiceStatus::Offline(_) => {
                Span::styled("service: ✗ offline", Style::default().fg(Color::Red))
            }
        };

        let mut spans = vec![
            Span::styled(
                " AI Code Analysis ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {}   ",
                self.client
                    .as_ref()
                    .map(|c| c.base_url().to_string())
                    .unwrap_or_else(|| self.config.service.base_url.clone())
            )),
            service,
        ];
        if self.ui.last_error.is_some() {
            spans.push(Span::styled(
                "   ⚠ error",
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_upload(&self, frame: &mut Frame, area: Rect) {
        let file = self
            .ui
            .selected_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[no file selected]  Ctrl+O to choose".to_string());

        let status_style = match self.ui.upload_status {
            UploadStatus::Succeeded => Style::default().fg(Color::Green),
            UploadStatus::Failed => Style::default().fg(Color::Red),
            UploadStatus::Uploading => Style::default().fg(Color::Yellow),
            UploadStatus::Idle => Style::default(),
        };

        let lines = vec![
            Line::from(format!("File: {file}")),
            Line::from(Span::styled(self.ui.upload_status.label(), status_style)),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Upload Code File "),
            ),
            area,
        );
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect) {
        let focused = self.ui.focus == Focus::Prompt && self.file_picker.is_none();
        let query = &self.ui.query;

        let text = if query.buffer.is_empty() && !focused {
            Line::from(Span::styled(
                "Ask something about your code...",
                Style::default().fg(Color::DarkGray),
            ))
        } else if focused {
            let (before, after): (String, String) = {
                let chars: Vec<char> = query.buffer.chars().collect();
                let split = query.cursor().min(chars.len());
                (
                    chars[..split].iter().collect(),
                    chars[split..].iter().collect(),
                )
            };
            Line::from(vec![
                Span::raw(format!("> {before}")),
                Span::styled("█", Style::default().fg(Color::Yellow)),
                Span::raw(after),
            ])
        } else {
            Line::from(format!("> {}", query.buffer))
        };

        let button = if self.ui.loading {
            Span::styled(
                format!("[ {} ]", self.ui.submit_label()),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(
                format!("[ {} ]", self.ui.submit_label()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        };

        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(" Enter your Prompt ")
                    .title_bottom(Line::from(button).right_aligned()),
            ),
            area,
        );
    }

    fn render_response(&self, frame: &mut Frame, area: Rect) {
        let title = match self.ui.answer {
            Some(ref answer) => format!(
                " AI Response ({}, {}) ",
                if answer.structured { "json" } else { "text" },
                answer
                    .finished_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
            ),
            None => " AI Response ".to_string(),
        };

        let text = self.ui.response_text();

        let border_style = if self.ui.focus == Focus::Response {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        frame.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .scroll((self.ui.response_scroll, 0))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style)
                        .title(title),
                ),
            area,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let text = " [Enter] analyze  [Ctrl+O] upload  [Ctrl+L] chunks  [Tab] focus  [F1] help  [Ctrl+Q] quit";
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    fn render_file_picker(&self, frame: &mut Frame, area: Rect, picker: &InputState) {
        let popup_area = self.centered_rect(70, 20, area);

        frame.render_widget(Clear, popup_area);

        let text = format!(
            "Path of the file to upload:\n\n> {}█\n\n[Enter] to upload, [Esc] to cancel",
            picker.buffer
        );

        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Choose File "),
            ),
            popup_area,
        );
    }

    fn render_chunks(&self, frame: &mut Frame, area: Rect) {
        let Some(ref listing) = self.ui.chunks else {
            return;
        };
        let popup_area = self.centered_rect(80, 70, area);

        let items: Vec<ListItem> = if listing.chunks.is_empty() {
            vec![ListItem::new("No code has been indexed yet.")]
        } else {
            listing
                .chunks
                .iter()
                .map(|chunk| {
                    let id = chunk
                        .chunk_id
                        .as_ref()
                        .map(|id| format!("#{id}"))
                        .unwrap_or_default();
                    let snippet: String = chunk
                        .snippet
                        .chars()
                        .map(|c| if c.is_control() { ' ' } else { c })
                        .take(SNIPPET_WIDTH)
                        .collect();
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            format!(
                                "{}{}",
                                chunk.file.as_deref().unwrap_or("<unknown>"),
                                id
                            ),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(format!("  {snippet}")),
                    ])
                })
                .collect()
        };

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(format!(
                " Stored chunks ({} total) - Esc to close ",
                listing.total_chunks
            ))),
            popup_area,
        );
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help_text = self.keybinds.help_text();
        let popup_area = self.centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(help_text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Press F1 to close "),
            ),
            popup_area,
        );
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect, notice: &str) {
        let popup_area = self.centered_rect(40, 20, area);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(format!("\n{notice}\n\n[Enter] OK"))
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow))
                        .title(" Notice "),
                ),
            popup_area,
        );
    }

    fn render_error_details(&self, frame: &mut Frame, area: Rect) {
        let popup_area = self.centered_rect(60, 20, area);
        let details = self
            .ui
            .last_error
            .as_deref()
            .unwrap_or("No error details available.");
        let text = format!("{details}\n\n[Enter] to clear, [Esc] to close");

        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Error Details "),
            ),
            popup_area,
        );
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
                ratatui::layout::Constraint::Percentage(percent_y),
                ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Horizontal)
            .constraints([
                ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
                ratatui::layout::Constraint::Percentage(percent_x),
                ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}
