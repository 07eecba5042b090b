//! Embassy async tasks
//!
//! All device logic runs in the single poll task; nothing is shared between
//! tasks.

pub mod poll;

pub use poll::{poll_task, Board, POLL_INTERVAL_MS};
