//! Module entities: stat kinds, module types, and the module record itself.
//! Values use the in-game display spellings when serialized ("CRIT Rate", "ATK%").

use std::fmt;

use serde::{Deserialize, Serialize};

/// The thirteen stat kinds a module can carry, as main stat or substat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "HP")]
    Hp,
    #[serde(rename = "HP%")]
    HpPct,
    #[serde(rename = "ATK")]
    Atk,
    #[serde(rename = "ATK%")]
    AtkPct,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "DEF%")]
    DefPct,
    #[serde(rename = "CRIT Rate")]
    CritRate,
    #[serde(rename = "CRIT DMG")]
    CritDmg,
    #[serde(rename = "SPD")]
    Spd,
    #[serde(rename = "PEN")]
    Pen,
    #[serde(rename = "Anomaly Mastery")]
    AnomalyMastery,
    #[serde(rename = "Impact")]
    Impact,
    #[serde(rename = "Energy Regen")]
    EnergyRegen,
}

impl StatKind {
    pub const ALL: [StatKind; 13] = [
        Self::Hp,
        Self::HpPct,
        Self::Atk,
        Self::AtkPct,
        Self::Def,
        Self::DefPct,
        Self::CritRate,
        Self::CritDmg,
        Self::Spd,
        Self::Pen,
        Self::AnomalyMastery,
        Self::Impact,
        Self::EnergyRegen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hp => "HP",
            Self::HpPct => "HP%",
            Self::Atk => "ATK",
            Self::AtkPct => "ATK%",
            Self::Def => "DEF",
            Self::DefPct => "DEF%",
            Self::CritRate => "CRIT Rate",
            Self::CritDmg => "CRIT DMG",
            Self::Spd => "SPD",
            Self::Pen => "PEN",
            Self::AnomalyMastery => "Anomaly Mastery",
            Self::Impact => "Impact",
            Self::EnergyRegen => "Energy Regen",
        }
    }

    /// The flat/percentage counterpart (ATK vs ATK%), if the kind has one.
    /// A module never rolls its main stat's sibling as a substat.
    pub fn sibling(self) -> Option<StatKind> {
        match self {
            Self::Hp => Some(Self::HpPct),
            Self::HpPct => Some(Self::Hp),
            Self::Atk => Some(Self::AtkPct),
            Self::AtkPct => Some(Self::Atk),
            Self::Def => Some(Self::DefPct),
            Self::DefPct => Some(Self::Def),
            _ => None,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Mask,
    Transistor,
    Wristwheel,
    Core,
}

impl ModuleType {
    pub const ALL: [ModuleType; 4] = [Self::Mask, Self::Transistor, Self::Wristwheel, Self::Core];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Transistor => "transistor",
            Self::Wristwheel => "wristwheel",
            Self::Core => "core",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Allocator-assigned module identity. Loadouts reference modules by id only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ModuleId(pub u64);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One secondary attribute on a module. Only `value` and `rolls_used` change
/// after creation, and only through enhancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substat {
    pub kind: StatKind,
    pub value: f64,
    pub rolls_used: u32,
}

impl Substat {
    pub fn new(kind: StatKind, value: f64) -> Self {
        Self {
            kind,
            value,
            rolls_used: 0,
        }
    }

    pub fn can_enhance(&self, max_rolls: u32) -> bool {
        self.rolls_used < max_rolls
    }

    /// Position of the current value inside `[min, max]`, as a percentage.
    /// Derived on demand, never stored.
    pub fn efficiency(&self, min: f64, max: f64) -> f64 {
        if max <= min {
            return 0.0;
        }
        (self.value - min) / (max - min) * 100.0
    }
}

/// A single equipment piece. Identity, type and main stat are fixed at creation;
/// substat values and the level counter move only through the enhancement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub module_type: ModuleType,
    pub main_stat: StatKind,
    pub main_stat_value: f64,
    pub substats: Vec<Substat>,
    pub level: u32,
}

impl Module {
    /// Hard cap on substats per module, independent of how many creation rolls.
    pub const MAX_SUBSTATS: usize = 4;

    pub fn substat(&self, kind: StatKind) -> Option<&Substat> {
        self.substats.iter().find(|s| s.kind == kind)
    }

    pub fn has_substat(&self, kind: StatKind) -> bool {
        self.substat(kind).is_some()
    }

    /// Main stat plus every substat, in contribution form for aggregation.
    pub fn stat_contributions(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        std::iter::once((self.main_stat, self.main_stat_value))
            .chain(self.substats.iter().map(|s| (s.kind, s.value)))
    }
}
