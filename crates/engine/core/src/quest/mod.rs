//! Quest templates, rotation, claims, and state resolution.

pub mod claim;
pub mod rotation;
pub mod state;
pub mod template;

pub use claim::{ClaimKey, ClaimKeyError, ClaimLedger};
pub use rotation::{Rotation, daily_seed, fnv1a32, mix32, select, weekly_seed};
pub use state::{QuestState, metric_value, resolve};
pub use template::{QuestMetric, QuestTemplate, Unit};
