// ABOUTME: Main layout component handling header, split panes, bottom menu bar and notification line

use ratatui::{
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::{HelpComponent, NewSessionComponent, SessionDetailsComponent, SessionListComponent};
use crate::app::notification::NotificationType;
use crate::app::{state::View, AppState};
use crate::components::theme::Theme;

pub const MENU_TEXT: &str = "[n]ew [Enter]attach [d]kill [t]autostart [r]efresh [?]help [q]uit";

pub struct LayoutComponent {
    session_list: SessionListComponent,
    details: SessionDetailsComponent,
    help: HelpComponent,
    new_session: NewSessionComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            session_list: SessionListComponent::new(),
            details: SessionDetailsComponent::new(),
            help: HelpComponent::new(),
            new_session: NewSessionComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Bottom menu bar
                Constraint::Length(1), // Notification line
            ])
            .split(frame.size());

        self.render_header(frame, main_chunks[0], state);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[1]);

        self.session_list.render(frame, content_chunks[0], state);
        self.details.render(frame, content_chunks[1], state);

        self.render_menu_bar(frame, main_chunks[2], &state.theme);
        self.render_notification(frame, main_chunks[3], state);

        if state.current_view == View::NewSession {
            self.new_session.render(frame, frame.size(), state);
        }

        if state.help_visible {
            self.help.render(frame, frame.size(), state);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let title = Paragraph::new(format!(" spv {}", env!("CARGO_PKG_VERSION")))
            .style(Style::default().fg(theme.accent).bg(theme.header_bg).add_modifier(Modifier::BOLD));
        let stats = Paragraph::new(format!("{} ", state.stats.summary()))
            .style(Style::default().fg(theme.text).bg(theme.header_bg))
            .alignment(Alignment::Right);

        frame.render_widget(title, chunks[0]);
        frame.render_widget(stats, chunks[1]);
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let menu = Paragraph::new(MENU_TEXT)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            )
            .style(Style::default().fg(theme.accent))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(ref notification) = state.notification else {
            return;
        };
        let theme = &state.theme;
        let color = match notification.notification_type {
            NotificationType::Success => theme.attached,
            NotificationType::Error => Color::Red,
            NotificationType::Warning => Color::Yellow,
            NotificationType::Info => theme.text,
        };
        let line = Paragraph::new(format!(" {}", notification.message)).style(Style::default().fg(color));
        frame.render_widget(line, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
