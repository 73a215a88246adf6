//! Background tasks module
//!
//! Suspend/resume glue and the task that persists session transitions while
//! the server runs.

pub mod persistence;
pub mod resume;
pub mod suspend;

// Re-export main functions
pub use persistence::session_persistence_task;
pub use resume::{resume_core, ResumePlan};
pub use suspend::suspend;
