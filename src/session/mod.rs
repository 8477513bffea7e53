// ABOUTME: Session management module for managed screen sessions
// Provides metadata persistence, live discovery, and lifecycle orchestration

pub mod discovery;
pub mod manager;
pub mod persistence;

pub use discovery::{parse_listing, reconcile, ListedSession, SessionDiscovery};
pub use manager::{SessionError, SessionManager};
pub use persistence::{MetadataKind, MetadataStore, StoreError};
