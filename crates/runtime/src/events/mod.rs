//! Event bus and event types.

pub mod bus;
pub mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ClockEvent, ProgressionEvent, QuestEvent};
