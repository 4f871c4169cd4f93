//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (`time`): an injectable scheduler instead of self-rescheduling callbacks
//! - Input events (`input`): DOM key names to game keys

pub mod input;
pub mod time;

pub use input::Key;
pub use time::{FrameHandle, FrameScheduler, ManualScheduler};
