//! Background workers.

pub mod engine;
pub mod persistence;
pub mod rollover;
pub mod timesync;

pub use engine::{Command, EngineWorker, ProgressionStats};
pub use persistence::PersistenceWorker;
pub use rollover::RolloverWorker;
pub use timesync::{DateProbe, HttpDateProbe, SyncError, TimeSyncWorker};
