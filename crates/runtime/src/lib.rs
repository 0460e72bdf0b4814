//! Async runtime around the progression engine.
//!
//! The engine itself is synchronous and single-owner; this crate gives it a
//! home: a command worker that serializes access, a trusted clock kept
//! anchored to internet time, a rollover monitor, periodic persistence, and
//! an event bus for UI surfaces.

pub mod api;
pub mod clock;
pub mod events;
pub mod repository;
pub mod runtime;
pub mod workers;

pub use api::{EngineHandle, RuntimeError};
pub use clock::{TimeAnchor, TrustedClock};
pub use events::{ClockEvent, Event, EventBus, ProgressionEvent, QuestEvent, Topic};
pub use repository::{FileSnapshotRepository, RepositoryError, SnapshotRepository};
pub use runtime::{Runtime, RuntimeConfig};
pub use workers::ProgressionStats;
