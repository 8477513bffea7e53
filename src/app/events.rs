// ABOUTME: Event handling system for keyboard input and app actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::state::{AsyncAction, View};
use crate::app::AppState;

/// Intent decoded from a key press in the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    NextSession,
    PreviousSession,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    Refresh,
    NewSession,
    KillSession,
    ToggleAutostart,
    AttachSession,
    // New session creation events
    NewSessionCancel,
    NewSessionInputChar(char),
    NewSessionBackspace,
    NewSessionSubmit,
}

/// Maps key presses to events and applies them to [`crate::app::AppState`].
pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Quit);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        if state.current_view == View::NewSession {
            return Self::handle_new_session_keys(key_event);
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextSession),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousSession),
            KeyCode::Char('g') => Some(AppEvent::GoToTop),
            KeyCode::Char('G') => Some(AppEvent::GoToBottom),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Char('r') => Some(AppEvent::Refresh),
            KeyCode::Char('n') | KeyCode::Char('a') => Some(AppEvent::NewSession),
            KeyCode::Char('d') => Some(AppEvent::KillSession),
            KeyCode::Char('t') => Some(AppEvent::ToggleAutostart),
            KeyCode::Enter => Some(AppEvent::AttachSession),
            _ => None,
        }
    }

    fn handle_new_session_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::NewSessionCancel),
            KeyCode::Enter => Some(AppEvent::NewSessionSubmit),
            KeyCode::Backspace => Some(AppEvent::NewSessionBackspace),
            KeyCode::Char(ch) => Some(AppEvent::NewSessionInputChar(ch)),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::NextSession => state.next_session(),
            AppEvent::PreviousSession => state.previous_session(),
            AppEvent::GoToTop => state.go_to_top(),
            AppEvent::GoToBottom => state.go_to_bottom(),
            AppEvent::Refresh => {
                state.pending_async_action = Some(AsyncAction::Refresh);
            }
            AppEvent::NewSession => state.start_new_session(),
            AppEvent::KillSession => state.request_kill(),
            AppEvent::ToggleAutostart => state.request_toggle_autostart(),
            AppEvent::AttachSession => state.request_attach(),
            AppEvent::NewSessionCancel => state.cancel_new_session(),
            AppEvent::NewSessionInputChar(ch) => state.new_session_input_char(ch),
            AppEvent::NewSessionBackspace => state.new_session_backspace(),
            AppEvent::NewSessionSubmit => state.new_session_submit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, HostPaths};
    use crate::models::{SessionRecord, SessionStatus};
    use crate::screen::MockCommandRunner;
    use crate::session::SessionManager;
    use crate::system::SystemDetector;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state(dir: &TempDir) -> AppState {
        let mut config = Config::with_dir(dir.path().join("config"));
        config.host = HostPaths::under(dir.path());
        let detector = SystemDetector::with_root(dir.path(), "linux");
        let manager = SessionManager::with_parts(config, Arc::new(MockCommandRunner::new()), detector);
        let mut state = AppState::new(manager);
        state.set_sessions(vec![SessionRecord {
            id: "4242".to_string(),
            name: "web".to_string(),
            status: SessionStatus::Detached,
            command: "shell".to_string(),
            description: String::new(),
            autostart: false,
        }]);
        state
    }

    fn press(state: &mut AppState, code: KeyCode) {
        if let Some(event) = EventHandler::handle_key_event(key(code), state) {
            EventHandler::process_event(event, state);
        }
    }

    #[test]
    fn test_list_keys_queue_actions_for_selected_session() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);

        press(&mut state, KeyCode::Char('t'));
        assert_eq!(state.pending_async_action, Some(AsyncAction::ToggleAutostart("web".to_string())));

        press(&mut state, KeyCode::Char('d'));
        assert_eq!(state.pending_async_action, Some(AsyncAction::KillSession("web".to_string())));

        press(&mut state, KeyCode::Enter);
        assert_eq!(state.pending_attach.as_deref(), Some("4242.spv_web"));
    }

    #[test]
    fn test_typed_q_goes_to_input_not_quit() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);

        press(&mut state, KeyCode::Char('n'));
        assert_eq!(state.current_view, View::NewSession);
        press(&mut state, KeyCode::Char('q'));
        assert!(!state.should_quit);
        assert_eq!(state.new_session_state.as_ref().map(|s| s.input.as_str()), Some("q"));

        press(&mut state, KeyCode::Esc);
        assert_eq!(state.current_view, View::SessionList);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);

        press(&mut state, KeyCode::Char('?'));
        assert!(state.help_visible);
        press(&mut state, KeyCode::Char('d'));
        assert!(state.pending_async_action.is_none());
        press(&mut state, KeyCode::Esc);
        assert!(!state.help_visible);
        assert!(!state.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_view() {
        let dir = TempDir::new().unwrap();
        let mut state = state(&dir);
        press(&mut state, KeyCode::Char('a'));

        let event = EventHandler::handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut state,
        );
        assert_eq!(event, Some(AppEvent::Quit));
    }
}
