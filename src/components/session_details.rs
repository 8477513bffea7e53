// ABOUTME: Right-hand pane with the full record of the selected session

use ratatui::{
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::models::SessionRecord;

pub struct SessionDetailsComponent;

impl SessionDetailsComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.panel_bg));

        let lines = match state.selected_session() {
            Some(session) => Self::lines(session, state),
            None => vec![Line::styled("No session selected", Style::default().fg(theme.muted))],
        };

        let details = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(details, area);
    }

    fn lines<'a>(session: &'a SessionRecord, state: &AppState) -> Vec<Line<'a>> {
        let theme = &state.theme;
        let label = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
        let value = Style::default().fg(theme.text);
        let field = |name: &'static str, text: String| {
            Line::from(vec![Span::styled(format!("{:<12}", name), label), Span::styled(text, value)])
        };

        let autostart = if session.autostart { "enabled" } else { "disabled" };
        vec![
            field("Name", session.name.clone()),
            field("ID", session.id.clone()),
            field("Status", session.status.label().to_string()),
            field("Command", session.command.clone()),
            field("Autostart", autostart.to_string()),
            Line::from(""),
            Line::styled("Description", label),
            Line::styled(session.description.as_str(), value),
            Line::from(""),
            Line::styled(
                format!("Attach: screen -r {}", state.manager().attach_target(session)),
                Style::default().fg(theme.muted),
            ),
        ]
    }
}

impl Default for SessionDetailsComponent {
    fn default() -> Self {
        Self::new()
    }
}
