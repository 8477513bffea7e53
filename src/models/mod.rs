// ABOUTME: Core data models for screen sessions and their persisted metadata

pub mod session;

pub use session::{MetadataEntry, SessionRecord, SessionStatus, DEFAULT_COMMAND};
