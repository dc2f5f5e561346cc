//! In-memory activity feed of successful mutations.

pub mod log;

pub use log::{Activity, ActivityAction, ActivityLog, DEFAULT_LIST_LIMIT};
