//! Staffdir - a staff directory service
//!
//! Stores a two-level department hierarchy and person records, and keeps an
//! in-memory n-gram search index eventually consistent with person data so
//! free-text queries resolve to person IDs without touching the store.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod images;
pub mod routes;
pub mod search;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
