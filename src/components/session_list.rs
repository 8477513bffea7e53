// ABOUTME: Session list component showing each managed session with status glyph and autostart marker

use ratatui::{
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::AppState;
use crate::models::{SessionRecord, SessionStatus};

pub const AUTOSTART_MARKER: &str = "⏻";

pub struct SessionListComponent {
    list_state: ListState,
}

impl Default for SessionListComponent {
    fn default() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }
}

impl SessionListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        self.list_state.select(state.selected_index);

        let items: Vec<ListItem> = if state.sessions.is_empty() {
            vec![ListItem::new("No sessions. Press n to create one.").style(Style::default().fg(theme.muted))]
        } else {
            state
                .sessions
                .iter()
                .map(|session| {
                    let color = match session.status {
                        SessionStatus::Attached => theme.attached,
                        SessionStatus::Detached => theme.detached,
                        SessionStatus::Unknown => theme.muted,
                    };
                    ListItem::new(Self::line(session)).style(Style::default().fg(color))
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("Sessions ({})", state.sessions.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border))
                    .title_style(Style::default().fg(theme.accent))
                    .style(Style::default().bg(theme.panel_bg)),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.selected_bg)
                    .fg(theme.selected_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn line(session: &SessionRecord) -> String {
        let marker = if session.autostart { AUTOSTART_MARKER } else { " " };
        format!("{} {} {}", session.status.indicator(), session.name, marker)
            .trim_end()
            .to_string()
    }
}
