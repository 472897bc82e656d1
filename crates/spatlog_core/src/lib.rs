//! Core state layer for spatlog, a couple's disagreement tracker.
//! This crate owns the argument and reward collections and their persistence.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use config::{CoreConfig, StorageLocation};
pub use context::{ConfiguredStorage, CoreContext};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::argument::{Argument, ArgumentId, ArgumentPatch, ArgumentStatus, Severity};
pub use model::category::{default_categories, Category, CategoryPatch};
pub use model::reward::{
    default_rewards, NewReward, Reward, RewardKind, RewardPatch, RewardRecord,
};
pub use model::ValidationError;
pub use storage::{
    KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageKey, StorageResult,
};
pub use store::argument_store::{ArgumentStore, CategoryRemoval, CategoryStat};
pub use store::reward_store::{RewardStore, RewardTally};
pub use store::{EntityKind, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
