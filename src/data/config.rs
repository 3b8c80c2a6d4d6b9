//! Mathic game data: per-type main stat tables, substat domains and roll tables,
//! slot affinities, the enhancement ceiling. Loaded once from JSON and validated
//! before anything else runs; invalid config is fatal, never discovered
//! mid-operation.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::validate::{validate_config, ValidationReport};
use crate::model::{ModuleType, StatKind};

pub const DEFAULT_CONFIG_PATH: &str = "data/mathic_config.json";

/// One enhancement outcome for a kind: how much the substat gains, and the
/// relative chance of drawing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollStep {
    pub amount: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstatConfig {
    /// Value at creation, and the floor of the value domain.
    pub min: f64,
    /// Enhancement clamps to this ceiling.
    pub max: f64,
    /// Weighted sub-roll table drawn from on each enhancement.
    pub rolls: Vec<RollStep>,
    /// Relative chance of this kind being picked for enhancement, against the
    /// other substats present on the module.
    #[serde(default = "default_selection_weight")]
    pub weight: f64,
    /// Per-substat roll budget; a substat at its budget is no longer a candidate.
    #[serde(default = "default_max_rolls")]
    pub max_rolls: u32,
}

fn default_selection_weight() -> f64 {
    1.0
}

fn default_max_rolls() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTypeConfig {
    /// Legal main stats with their fixed values.
    pub main_stats: BTreeMap<StatKind, f64>,
    /// Kinds this type can never roll as a substat.
    #[serde(default)]
    pub restricted_substats: Vec<StatKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub slot_id: u8,
    pub allowed_types: Vec<ModuleType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathicConfig {
    pub module_types: BTreeMap<ModuleType, ModuleTypeConfig>,
    pub substats: BTreeMap<StatKind, SubstatConfig>,
    pub slots: Vec<SlotConfig>,
    #[serde(default = "default_ceiling")]
    pub enhancement_ceiling: u32,
    /// How many substats a fresh module rolls.
    #[serde(default = "default_creation_substats")]
    pub creation_substats: usize,
}

fn default_ceiling() -> u32 {
    15
}

fn default_creation_substats() -> usize {
    4
}

impl MathicConfig {
    pub fn substat(&self, kind: StatKind) -> Option<&SubstatConfig> {
        self.substats.get(&kind)
    }

    /// Fixed main stat value for a (type, kind) pair, if the pair is legal.
    pub fn main_stat_value(&self, module_type: ModuleType, kind: StatKind) -> Option<f64> {
        self.module_types
            .get(&module_type)?
            .main_stats
            .get(&kind)
            .copied()
    }

    pub fn slot(&self, slot_id: u8) -> Option<&SlotConfig> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    pub fn slot_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.slots.iter().map(|s| s.slot_id)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.into_validated()
    }

    fn into_validated(self) -> Result<Self, ConfigError> {
        let report = validate_config(&self);
        if report.has_errors() {
            return Err(ConfigError::Validation(report));
        }
        Ok(self)
    }

    /// The stock game data, for callers that do not ship their own config file.
    pub fn builtin() -> Self {
        let mut module_types = BTreeMap::new();
        module_types.insert(
            ModuleType::Mask,
            ModuleTypeConfig {
                main_stats: BTreeMap::from([(StatKind::Atk, 550.0)]),
                restricted_substats: Vec::new(),
            },
        );
        module_types.insert(
            ModuleType::Transistor,
            ModuleTypeConfig {
                main_stats: BTreeMap::from([(StatKind::Hp, 2780.0)]),
                restricted_substats: Vec::new(),
            },
        );
        module_types.insert(
            ModuleType::Wristwheel,
            ModuleTypeConfig {
                main_stats: BTreeMap::from([(StatKind::Def, 412.0)]),
                restricted_substats: Vec::new(),
            },
        );
        module_types.insert(
            ModuleType::Core,
            ModuleTypeConfig {
                main_stats: BTreeMap::from([
                    (StatKind::HpPct, 33.0),
                    (StatKind::AtkPct, 33.0),
                    (StatKind::DefPct, 41.5),
                    (StatKind::CritRate, 24.0),
                    (StatKind::CritDmg, 48.0),
                    (StatKind::Pen, 24.0),
                    (StatKind::AnomalyMastery, 86.0),
                    (StatKind::EnergyRegen, 19.2),
                ]),
                restricted_substats: vec![StatKind::Impact],
            },
        );

        let weights = [10.0, 35.0, 35.0, 20.0];
        let substat = |amounts: [f64; 4], min: f64| SubstatConfig {
            min,
            // 5 rolls of the best amount, on top of the creation value.
            max: min + 5.0 * amounts[3],
            rolls: amounts
                .iter()
                .zip(weights.iter())
                .map(|(amount, weight)| RollStep {
                    amount: *amount,
                    weight: *weight,
                })
                .collect(),
            weight: default_selection_weight(),
            max_rolls: default_max_rolls(),
        };

        let substats = BTreeMap::from([
            (StatKind::Hp, substat([80.0, 95.0, 105.0, 120.0], 80.0)),
            (StatKind::HpPct, substat([2.4, 2.8, 3.2, 3.6], 2.4)),
            (StatKind::Atk, substat([12.0, 14.0, 16.0, 19.0], 12.0)),
            (StatKind::AtkPct, substat([2.4, 2.8, 3.2, 3.6], 2.4)),
            (StatKind::Def, substat([10.0, 12.0, 14.0, 15.0], 10.0)),
            (StatKind::DefPct, substat([3.0, 3.5, 4.0, 4.5], 3.0)),
            (StatKind::CritRate, substat([1.6, 1.9, 2.2, 2.5], 1.6)),
            (StatKind::CritDmg, substat([3.2, 3.8, 4.4, 5.0], 3.2)),
            (StatKind::Spd, substat([2.0, 3.0, 4.0, 5.0], 2.0)),
            (StatKind::Pen, substat([6.0, 7.0, 8.0, 9.0], 6.0)),
            (StatKind::AnomalyMastery, substat([6.0, 7.0, 8.0, 9.0], 6.0)),
            (StatKind::Impact, substat([4.0, 5.0, 6.0, 7.0], 4.0)),
            (StatKind::EnergyRegen, substat([0.6, 0.7, 0.8, 0.9], 0.6)),
        ]);

        let slots = vec![
            SlotConfig {
                slot_id: 1,
                allowed_types: vec![ModuleType::Mask],
            },
            SlotConfig {
                slot_id: 2,
                allowed_types: vec![ModuleType::Transistor],
            },
            SlotConfig {
                slot_id: 3,
                allowed_types: vec![ModuleType::Wristwheel],
            },
            SlotConfig {
                slot_id: 4,
                allowed_types: vec![ModuleType::Core],
            },
            SlotConfig {
                slot_id: 5,
                allowed_types: vec![ModuleType::Core],
            },
            SlotConfig {
                slot_id: 6,
                allowed_types: vec![ModuleType::Core],
            },
        ];

        Self {
            module_types,
            substats,
            slots,
            enhancement_ceiling: default_ceiling(),
            creation_substats: default_creation_substats(),
        }
    }
}

/// Load and validate a config file. Any failure here is fatal to the core.
pub fn load_config(path: impl AsRef<Path>) -> Result<MathicConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(ConfigError::Read)?;
    MathicConfig::from_json_str(&raw)
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Validation(ValidationReport),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read config file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config JSON: {err}"),
            Self::Validation(report) => {
                write!(f, "config failed validation: ")?;
                let mut first = true;
                for diag in report.errors() {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", diag.context, diag.message)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_passes_validation() {
        let report = validate_config(&MathicConfig::builtin());
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
    }

    #[test]
    fn builtin_config_round_trips_through_json() {
        let config = MathicConfig::builtin();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back = MathicConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn builtin_covers_every_stat_kind() {
        let config = MathicConfig::builtin();
        for kind in StatKind::ALL {
            assert!(config.substat(kind).is_some(), "missing {kind}");
        }
    }

    #[test]
    fn defaults_fill_in_omitted_fields() {
        let raw = r#"{
            "module_types": {
                "mask": { "main_stats": { "ATK": 550.0 } }
            },
            "substats": {
                "SPD": { "min": 2.0, "max": 27.0,
                         "rolls": [ { "amount": 2.0, "weight": 1.0 } ] }
            },
            "slots": [ { "slot_id": 1, "allowed_types": ["mask"] } ],
            "creation_substats": 1
        }"#;
        let config = MathicConfig::from_json_str(raw).unwrap();
        assert_eq!(config.enhancement_ceiling, 15);
        let spd = config.substat(StatKind::Spd).unwrap();
        assert_eq!(spd.max_rolls, 5);
        assert_eq!(spd.weight, 1.0);
        assert!(config
            .module_types
            .get(&ModuleType::Mask)
            .unwrap()
            .restricted_substats
            .is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MathicConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config("data/does_not_exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
