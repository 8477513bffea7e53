// ABOUTME: Input prompt overlay for the create workflow (name, then command, then description)

use ratatui::{
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect;
use crate::app::state::{InputStep, NewSessionState};
use crate::app::AppState;

pub struct NewSessionComponent;

impl NewSessionComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(ref session_state) = state.new_session_state else {
            return;
        };
        let theme = &state.theme;

        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("New Session - {}", Self::step_title(session_state)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.panel_bg));

        let mut lines = Vec::new();
        if !session_state.name.is_empty() {
            lines.push(Line::styled(format!("Name: {}", session_state.name), Style::default().fg(theme.muted)));
        }
        if !session_state.command.is_empty() {
            lines.push(Line::styled(
                format!("Command: {}", session_state.command),
                Style::default().fg(theme.muted),
            ));
        }
        lines.push(Line::from(""));
        lines.push(Line::styled(
            session_state.step.prompt(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            format!("> {}_", session_state.input),
            Style::default().fg(theme.text),
        ));
        lines.push(Line::from(""));
        lines.push(Line::styled("Enter to continue, Esc to cancel", Style::default().fg(theme.muted)));

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }

    fn step_title(session_state: &NewSessionState) -> &'static str {
        match session_state.step {
            InputStep::Name => "1/3",
            InputStep::Command => "2/3",
            InputStep::Description => "3/3",
        }
    }
}

impl Default for NewSessionComponent {
    fn default() -> Self {
        Self::new()
    }
}
