use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::panel::{Panel, PanelType};

const TOPBAR_HEIGHT: u16 = 1;
const UPLOAD_HEIGHT: u16 = 4;
const PROMPT_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;
const MIN_RESPONSE_HEIGHT: u16 = 3;

#[derive(Default)]
pub struct LayoutState {
    cached_panels: Vec<Panel>,
}

impl LayoutState {
    pub fn calculate_layout(&mut self, area: Rect) -> &[Panel] {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TOPBAR_HEIGHT),
                Constraint::Length(UPLOAD_HEIGHT),
                Constraint::Length(PROMPT_HEIGHT),
                Constraint::Min(MIN_RESPONSE_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.cached_panels = vec![
            Panel {
                panel_type: PanelType::Topbar,
                rect: rows[0],
            },
            Panel {
                panel_type: PanelType::Upload,
                rect: rows[1],
            },
            Panel {
                panel_type: PanelType::Prompt,
                rect: rows[2],
            },
            Panel {
                panel_type: PanelType::Response,
                rect: rows[3],
            },
            Panel {
                panel_type: PanelType::Footer,
                rect: rows[4],
            },
        ];

        &self.cached_panels
    }

    pub fn get_panels(&self) -> &[Panel] {
        &self.cached_panels
    }

    pub fn get_response_rect(&self) -> Option<Rect> {
        self.cached_panels
            .iter()
            .find(|p| matches!(p.panel_type, PanelType::Response))
            .map(|p| p.rect)
    }

    pub fn panel_at(&self, col: u16, row: u16) -> Option<PanelType> {
        self.cached_panels
            .iter()
            .find(|p| {
                col >= p.rect.x
                    && col < p.rect.x + p.rect.width
                    && row >= p.rect.y
                    && row < p.rect.y + p.rect.height
            })
            .map(|p| p.panel_type)
    }
}
