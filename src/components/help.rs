// ABOUTME: Help overlay component displaying keyboard shortcuts, version and the latest upstream change

use ratatui::{
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

use super::centered_rect;
use crate::app::AppState;

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let popup_area = centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(theme.muted);
        let latest = state
            .latest_commit
            .clone()
            .unwrap_or_else(|| "unavailable".to_string());

        let help_items = vec![
            ListItem::new("Navigation:").style(heading),
            ListItem::new("  j/↓        Move down"),
            ListItem::new("  k/↑        Move up"),
            ListItem::new("  g          Go to top"),
            ListItem::new("  G          Go to bottom"),
            ListItem::new(""),
            ListItem::new("Session Actions:").style(heading),
            ListItem::new("  n/a        New session"),
            ListItem::new("  Enter      Attach to session"),
            ListItem::new("  d          Kill session"),
            ListItem::new("  t          Toggle autostart on boot"),
            ListItem::new("  r          Refresh"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  q/Esc      Quit application"),
            ListItem::new("  Ctrl+C     Force quit"),
            ListItem::new(""),
            ListItem::new("About:").style(heading),
            ListItem::new(format!("  spv {}", env!("CARGO_PKG_VERSION"))),
            ListItem::new(format!("  Theme      {}", theme.name)).style(muted),
            ListItem::new(format!("  Latest     {}", latest)).style(muted),
        ];

        let help_list = List::new(help_items)
            .style(Style::default().fg(theme.text).bg(theme.panel_bg))
            .block(
                Block::default()
                    .title("Help - Press ? or Esc to close")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.accent)),
            );

        frame.render_widget(help_list, popup_area);
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
