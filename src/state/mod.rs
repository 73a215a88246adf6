//! Application state module
//!
//! Holds the session controller, the persistence adapter and the bookkeeping
//! the HTTP layer reports.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;
