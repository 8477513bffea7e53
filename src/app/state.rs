// ABOUTME: Application state for the dashboard: session list, selection, create workflow and pending actions
// Lifecycle work is queued as an AsyncAction and executed off the UI thread by process_async_action

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::app::notification::Notification;
use crate::app::stats::{HostStats, StatsSampler};
use crate::autostart::AutostartError;
use crate::components::theme::Theme;
use crate::models::SessionRecord;
use crate::session::{SessionError, SessionManager};

pub const UNSUPPORTED_AUTOSTART_MESSAGE: &str = "Autostart is not supported on this OS";

/// Which screen the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SessionList,
    NewSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStep {
    Name,
    Command,
    Description,
}

impl InputStep {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputStep::Name => "Session name",
            InputStep::Command => "Command (empty for an interactive shell)",
            InputStep::Description => "Description (optional)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSessionState {
    pub step: InputStep,
    pub input: String,
    pub name: String,
    pub command: String,
}

impl Default for NewSessionState {
    fn default() -> Self {
        Self {
            step: InputStep::Name,
            input: String::new(),
            name: String::new(),
            command: String::new(),
        }
    }
}

/// Blocking lifecycle work queued by a key press and run on the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    Refresh,
    CreateSession {
        name: String,
        command: String,
        description: String,
    },
    KillSession(String),
    ToggleAutostart(String),
}

/// Everything the dashboard renders and mutates between frames.
pub struct AppState {
    pub sessions: Vec<SessionRecord>,
    pub selected_index: Option<usize>,
    pub current_view: View,
    pub help_visible: bool,
    pub should_quit: bool,
    pub new_session_state: Option<NewSessionState>,
    pub pending_async_action: Option<AsyncAction>,
    /// `screen -r` target waiting for the main loop to hand over the terminal.
    pub pending_attach: Option<String>,
    pub notification: Option<Notification>,
    pub stats: HostStats,
    pub latest_commit: Option<String>,
    pub theme: Theme,
    pub ui_needs_refresh: bool,
    manager: Arc<SessionManager>,
}

impl AppState {
    pub fn new(manager: SessionManager) -> Self {
        let theme = Theme::resolve(&manager.config().theme);
        Self {
            sessions: Vec::new(),
            selected_index: None,
            current_view: View::SessionList,
            help_visible: false,
            should_quit: false,
            new_session_state: None,
            pending_async_action: None,
            pending_attach: None,
            notification: None,
            stats: HostStats::default(),
            latest_commit: None,
            theme,
            ui_needs_refresh: false,
            manager: Arc::new(manager),
        }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn selected_session(&self) -> Option<&SessionRecord> {
        self.selected_index.and_then(|idx| self.sessions.get(idx))
    }

    pub fn next_session(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(idx) if idx + 1 < self.sessions.len() => idx + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn previous_session(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(0) | None => self.sessions.len() - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn go_to_top(&mut self) {
        if !self.sessions.is_empty() {
            self.selected_index = Some(0);
        }
    }

    pub fn go_to_bottom(&mut self) {
        if !self.sessions.is_empty() {
            self.selected_index = Some(self.sessions.len() - 1);
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn clear_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }

    /// Replace the session list, keeping the selection on the same name when it survives.
    pub fn set_sessions(&mut self, sessions: Vec<SessionRecord>) {
        let selected_name = self.selected_session().map(|s| s.name.clone());
        let previous_index = self.selected_index;
        self.sessions = sessions;

        self.selected_index = if self.sessions.is_empty() {
            None
        } else if let Some(idx) = selected_name
            .and_then(|name| self.sessions.iter().position(|s| s.name == name))
        {
            Some(idx)
        } else {
            Some(previous_index.unwrap_or(0).min(self.sessions.len() - 1))
        };
    }

    pub fn start_new_session(&mut self) {
        self.new_session_state = Some(NewSessionState::default());
        self.current_view = View::NewSession;
    }

    pub fn cancel_new_session(&mut self) {
        self.new_session_state = None;
        self.current_view = View::SessionList;
    }

    pub fn new_session_input_char(&mut self, ch: char) {
        if let Some(ref mut session_state) = self.new_session_state {
            session_state.input.push(ch);
        }
    }

    pub fn new_session_backspace(&mut self) {
        if let Some(ref mut session_state) = self.new_session_state {
            session_state.input.pop();
        }
    }

    /// Accept the current input and advance; the final step queues the create action.
    pub fn new_session_submit(&mut self) {
        let Some(mut session_state) = self.new_session_state.take() else {
            return;
        };
        let input = std::mem::take(&mut session_state.input).trim().to_string();

        match session_state.step {
            InputStep::Name => {
                if input.is_empty() {
                    self.cancel_new_session();
                    self.notify(Notification::info("Session creation cancelled"));
                    return;
                }
                session_state.name = input;
                session_state.step = InputStep::Command;
                self.new_session_state = Some(session_state);
            }
            InputStep::Command if input.is_empty() => {
                self.queue_create(session_state.name, String::new(), String::new());
            }
            InputStep::Command => {
                session_state.command = input;
                session_state.step = InputStep::Description;
                self.new_session_state = Some(session_state);
            }
            InputStep::Description => {
                self.queue_create(session_state.name, session_state.command, input);
            }
        }
    }

    fn queue_create(&mut self, name: String, command: String, description: String) {
        self.current_view = View::SessionList;
        self.pending_async_action = Some(AsyncAction::CreateSession {
            name,
            command,
            description,
        });
    }

    pub fn request_kill(&mut self) {
        if let Some(session) = self.selected_session() {
            self.pending_async_action = Some(AsyncAction::KillSession(session.name.clone()));
        }
    }

    pub fn request_toggle_autostart(&mut self) {
        if let Some(session) = self.selected_session() {
            self.pending_async_action = Some(AsyncAction::ToggleAutostart(session.name.clone()));
        }
    }

    pub fn request_attach(&mut self) {
        if let Some(session) = self.selected_session() {
            self.pending_attach = Some(self.manager.attach_target(session));
        }
    }

    pub async fn refresh_sessions(&mut self) {
        let manager = Arc::clone(&self.manager);
        match tokio::task::spawn_blocking(move || manager.discover()).await {
            Ok(sessions) => self.set_sessions(sessions),
            Err(e) => error!("Session discovery task failed: {}", e),
        }
    }

    pub async fn process_async_action(&mut self) -> anyhow::Result<()> {
        let Some(action) = self.pending_async_action.take() else {
            return Ok(());
        };

        let manager = Arc::clone(&self.manager);
        match action {
            AsyncAction::Refresh => {
                self.refresh_sessions().await;
                self.notify(Notification::info("Sessions refreshed"));
            }
            AsyncAction::CreateSession {
                name,
                command,
                description,
            } => {
                let created = name.clone();
                let result = tokio::task::spawn_blocking(move || {
                    manager.create(&name, &command, &description)
                })
                .await?;
                match result {
                    Ok(()) => {
                        self.notify(Notification::success(format!("Session '{}' created", created)));
                        self.refresh_sessions().await;
                        if let Some(idx) = self.sessions.iter().position(|s| s.name == created) {
                            self.selected_index = Some(idx);
                        }
                    }
                    Err(e) => self.report_failure("create", &created, e),
                }
            }
            AsyncAction::KillSession(name) => {
                let target = name.clone();
                let result = tokio::task::spawn_blocking(move || manager.kill(&target)).await?;
                match result {
                    Ok(sessions) => {
                        self.set_sessions(sessions);
                        self.notify(Notification::success(format!("Session '{}' killed", name)));
                    }
                    Err(e) => {
                        self.report_failure("kill", &name, e);
                        self.refresh_sessions().await;
                    }
                }
            }
            AsyncAction::ToggleAutostart(name) => {
                let target = name.clone();
                let result =
                    tokio::task::spawn_blocking(move || manager.toggle_autostart(&target)).await?;
                match result {
                    Ok(sessions) => {
                        let enabled = sessions.iter().any(|s| s.name == name && s.autostart);
                        self.set_sessions(sessions);
                        let verb = if enabled { "enabled" } else { "disabled" };
                        self.notify(Notification::success(format!("Autostart {} for '{}'", verb, name)));
                    }
                    Err(e) => {
                        self.report_failure("toggle autostart for", &name, e);
                        self.refresh_sessions().await;
                    }
                }
            }
        }
        self.ui_needs_refresh = true;
        Ok(())
    }

    fn report_failure(&mut self, action: &str, name: &str, err: SessionError) {
        match err {
            SessionError::Autostart(AutostartError::UnsupportedOs(os)) => {
                warn!("Autostart requested on unsupported OS {}", os);
                self.notify(Notification::warning(UNSUPPORTED_AUTOSTART_MESSAGE));
            }
            err => {
                error!("Failed to {} session {}: {}", action, name, err);
                self.notify(Notification::error(err.to_string()));
            }
        }
    }
}

/// Dashboard state plus the periodic refresh clock.
pub struct App {
    pub state: AppState,
    sampler: StatsSampler,
    last_refresh: Option<Instant>,
    refresh_interval: Duration,
    latest_commit_rx: Option<oneshot::Receiver<Option<String>>>,
}

impl App {
    pub fn new(manager: SessionManager) -> Self {
        let refresh_interval = manager.config().refresh_interval;
        Self {
            state: AppState::new(manager),
            sampler: StatsSampler::new(),
            last_refresh: None,
            refresh_interval,
            latest_commit_rx: None,
        }
    }

    pub async fn init(&mut self) {
        self.state.refresh_sessions().await;
        self.state.stats = self.sampler.sample();
        self.last_refresh = Some(Instant::now());
        info!("Dashboard started with {} managed sessions", self.state.sessions.len());
    }

    /// Receive the about-overlay commit subject from a background fetch.
    pub fn watch_latest_commit(&mut self, rx: oneshot::Receiver<Option<String>>) {
        self.latest_commit_rx = Some(rx);
    }

    pub fn needs_ui_refresh(&mut self) -> bool {
        std::mem::take(&mut self.state.ui_needs_refresh)
    }

    pub async fn tick(&mut self) -> anyhow::Result<()> {
        if let Err(e) = self.state.process_async_action().await {
            warn!("Error processing async action: {}", e);
            self.state.new_session_state = None;
            self.state.current_view = View::SessionList;
        }

        self.poll_latest_commit();
        self.state.clear_expired_notification();

        let due = self
            .last_refresh
            .map_or(true, |at| at.elapsed() >= self.refresh_interval);
        if due && self.state.current_view == View::SessionList {
            self.state.refresh_sessions().await;
            self.state.stats = self.sampler.sample();
            self.last_refresh = Some(Instant::now());
        }
        Ok(())
    }

    fn poll_latest_commit(&mut self) {
        let Some(rx) = self.latest_commit_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(subject) => {
                self.state.latest_commit = subject;
                self.latest_commit_rx = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => self.latest_commit_rx = None,
        }
    }

    /// Restart the refresh clock, e.g. after returning from an attached session.
    pub fn mark_stale(&mut self) {
        self.last_refresh = None;
        self.state.ui_needs_refresh = true;
    }
}
