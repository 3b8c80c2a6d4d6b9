//! Mathic module enhancement and loadout core.
//!
//! Modules are equipment pieces with a fixed main stat and up to four
//! randomly-rolled substats. The [`engine`] applies bounded, weighted-random
//! enhancement steps; the [`Inventory`] owns modules and loadouts, enforces the
//! equip rules, and folds loadout totals. All randomness flows through a
//! caller-seeded [`Rng`], so every sequence is reproducible.

pub mod data;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod model;
pub mod rng;

pub use data::{load_config, ConfigError, MathicConfig, Snapshot};
pub use engine::{efficiency, enhance, EnhanceOutcome};
pub use error::MathicError;
pub use inventory::Inventory;
pub use model::{Loadout, Module, ModuleId, ModuleType, StatKind, StatTotals, Substat};
pub use rng::Rng;
