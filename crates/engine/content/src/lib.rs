//! Compiled-in reference data for the progression engine.
//!
//! This crate houses the static quest pools and achievement milestones.
//! Content is consumed by the runtime through [`catalog`] and never appears
//! in persisted state; only template ids do, which is what lets the catalog
//! evolve between versions while cached rotations self-heal.

pub mod achievements;
pub mod quests;

use engine_core::Catalog;

pub use achievements::ACHIEVEMENTS;
pub use quests::{DAILY_QUESTS, WEEKLY_QUESTS};

/// Bump when pool contents change in a way worth surfacing in logs.
pub const CATALOG_VERSION: u32 = 1;

/// The full static catalog handed to the engine.
pub const fn catalog() -> Catalog {
    Catalog {
        daily_pool: &DAILY_QUESTS,
        weekly_pool: &WEEKLY_QUESTS,
        achievements: &ACHIEVEMENTS,
        version: CATALOG_VERSION,
    }
}
