pub mod loadout;
pub mod module;
pub mod stats;

pub use loadout::Loadout;
pub use module::{Module, ModuleId, ModuleType, StatKind, Substat};
pub use stats::StatTotals;
