use std::fmt;

use crate::model::{ModuleId, ModuleType, StatKind};

/// Everything a mathic operation can reject. Each variant is checked before any
/// mutation, so a returned error never leaves partial state behind.
#[derive(Debug, Clone, PartialEq)]
pub enum MathicError {
    /// The requested main stat is not legal for the module type.
    InvalidMainStat {
        module_type: ModuleType,
        stat: StatKind,
    },
    /// The config does not leave enough distinct substat kinds to roll.
    NotEnoughSubstats {
        module_type: ModuleType,
        needed: usize,
        available: usize,
    },
    DuplicateName(String),
    UnknownLoadout(String),
    UnknownModule(ModuleId),
    UnknownSlot(u8),
    SlotTypeMismatch {
        slot: u8,
        module_type: ModuleType,
    },
    /// The module id is already referenced by some tracked loadout slot.
    ModuleAlreadyEquipped {
        module: ModuleId,
        loadout: String,
        slot: u8,
    },
    /// Deletion blocked: the module is still equipped.
    ModuleEquipped {
        module: ModuleId,
        loadout: String,
        slot: u8,
    },
    // Snapshot restore rejections.
    DuplicateModuleId(ModuleId),
    TooManySubstats {
        module: ModuleId,
        count: usize,
    },
    DuplicateSubstat {
        module: ModuleId,
        kind: StatKind,
    },
    /// A substat repeats the module's main stat kind, or its flat/percentage
    /// sibling; creation never rolls either.
    SubstatConflictsMainStat {
        module: ModuleId,
        kind: StatKind,
    },
    RollsOverBudget {
        module: ModuleId,
        kind: StatKind,
        rolls_used: u32,
        max_rolls: u32,
    },
    UnknownSubstatKind {
        module: ModuleId,
        kind: StatKind,
    },
    SubstatOutOfRange {
        module: ModuleId,
        kind: StatKind,
        value: f64,
    },
    LevelAboveCeiling {
        module: ModuleId,
        level: u32,
        ceiling: u32,
    },
}

impl fmt::Display for MathicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMainStat { module_type, stat } => {
                write!(f, "main stat '{stat}' is not legal for {module_type} modules")
            }
            Self::NotEnoughSubstats {
                module_type,
                needed,
                available,
            } => write!(
                f,
                "{module_type} modules need {needed} substat candidates but config leaves {available}"
            ),
            Self::DuplicateName(name) => write!(f, "loadout '{name}' already exists"),
            Self::UnknownLoadout(name) => write!(f, "no loadout named '{name}'"),
            Self::UnknownModule(id) => write!(f, "no module with id {id}"),
            Self::UnknownSlot(slot) => write!(f, "no slot {slot} in loadout layout"),
            Self::SlotTypeMismatch { slot, module_type } => {
                write!(f, "slot {slot} does not accept {module_type} modules")
            }
            Self::ModuleAlreadyEquipped {
                module,
                loadout,
                slot,
            } => write!(
                f,
                "module {module} is already equipped in loadout '{loadout}' slot {slot}"
            ),
            Self::ModuleEquipped {
                module,
                loadout,
                slot,
            } => write!(
                f,
                "module {module} cannot be deleted while equipped in loadout '{loadout}' slot {slot}"
            ),
            Self::DuplicateModuleId(id) => write!(f, "snapshot repeats module id {id}"),
            Self::TooManySubstats { module, count } => write!(
                f,
                "module {module} carries {count} substats, above the cap of {}",
                crate::model::Module::MAX_SUBSTATS
            ),
            Self::DuplicateSubstat { module, kind } => {
                write!(f, "module {module} carries substat '{kind}' twice")
            }
            Self::SubstatConflictsMainStat { module, kind } => write!(
                f,
                "module {module} substat '{kind}' conflicts with its main stat"
            ),
            Self::RollsOverBudget {
                module,
                kind,
                rolls_used,
                max_rolls,
            } => write!(
                f,
                "module {module} substat '{kind}' used {rolls_used} rolls, above the budget of {max_rolls}"
            ),
            Self::UnknownSubstatKind { module, kind } => {
                write!(f, "module {module} carries substat '{kind}' missing from config")
            }
            Self::SubstatOutOfRange {
                module,
                kind,
                value,
            } => write!(
                f,
                "module {module} substat '{kind}' value {value} is outside its configured domain"
            ),
            Self::LevelAboveCeiling {
                module,
                level,
                ceiling,
            } => write!(
                f,
                "module {module} is at level {level}, above the ceiling {ceiling}"
            ),
        }
    }
}

impl std::error::Error for MathicError {}
