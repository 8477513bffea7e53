// ABOUTME: GNU screen plumbing for managed sessions
// Wraps command execution behind a seam so discovery and lifecycle code can be tested without screen

pub mod error;
pub mod runner;
pub mod session;

pub use error::ScreenError;
pub use runner::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use session::ScreenSession;

#[cfg(test)]
pub use runner::MockCommandRunner;
