// ABOUTME: Library crate for spv exposing session discovery, lifecycle, and autostart provisioning
// The binary wires these into the interactive dashboard

//! Manage GNU screen sessions from a terminal dashboard and keep the ones
//! flagged for autostart relaunching at boot.

pub mod app;
pub mod autostart;
pub mod components;
pub mod config;
pub mod models;
pub mod screen;
pub mod session;
pub mod system;
