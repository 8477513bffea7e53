// ABOUTME: UI components for the dashboard including session list, details pane, input prompt, and help
// Every component takes the active Theme from AppState; there is no global style state

pub mod help;
pub mod layout;
pub mod new_session;
pub mod session_details;
pub mod session_list;
pub mod theme;

pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use new_session::NewSessionComponent;
pub use session_details::SessionDetailsComponent;
pub use session_list::SessionListComponent;

use ratatui::prelude::*;

/// Rectangle of `percent_x` by `percent_y` centred in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
