pub mod config;
pub mod snapshot;
pub mod validate;

pub use config::{
    load_config, ConfigError, MathicConfig, ModuleTypeConfig, RollStep, SlotConfig, SubstatConfig,
    DEFAULT_CONFIG_PATH,
};
pub use snapshot::{LoadoutSnapshot, Snapshot};
pub use validate::{validate_config, ValidationDiagnostic, ValidationReport, ValidationSeverity};
