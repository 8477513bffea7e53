// ABOUTME: Main application structure and state management for the TUI

pub mod attach;
pub mod events;
pub mod notification;
pub mod release;
pub mod state;
pub mod stats;

pub use events::EventHandler;
pub use state::{App, AppState};
