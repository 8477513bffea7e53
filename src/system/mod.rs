// ABOUTME: Host system detection used to pick a boot-time provisioning strategy

pub mod detect;

pub use detect::{DistroFamily, InitSystem, OsFamily, SystemDetector, SystemInfo};
