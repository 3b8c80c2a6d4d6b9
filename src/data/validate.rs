//! Structural checks over a loaded [`MathicConfig`]. Errors make the config
//! unusable; warnings flag data that is legal but probably not intended.

use std::fmt;

use crate::data::config::MathicConfig;
use crate::model::{Module, StatKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }
}

pub fn validate_config(config: &MathicConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.module_types.is_empty() {
        report.push(
            ValidationSeverity::Error,
            "module_types",
            "no module types defined",
        );
    }
    if config.substats.is_empty() {
        report.push(ValidationSeverity::Error, "substats", "no substats defined");
    }
    if config.enhancement_ceiling == 0 {
        report.push(
            ValidationSeverity::Error,
            "enhancement_ceiling",
            "ceiling must be at least 1",
        );
    }
    if config.creation_substats > Module::MAX_SUBSTATS {
        report.push(
            ValidationSeverity::Error,
            "creation_substats",
            format!(
                "modules carry at most {} substats, got {}",
                Module::MAX_SUBSTATS,
                config.creation_substats
            ),
        );
    }

    for (kind, substat) in &config.substats {
        let context = format!("substats.{kind}");
        if !substat.min.is_finite() || !substat.max.is_finite() {
            report.push(ValidationSeverity::Error, &context, "non-finite value domain");
            continue;
        }
        if substat.min > substat.max {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("min {} above max {}", substat.min, substat.max),
            );
        }
        if substat.rolls.is_empty() {
            report.push(ValidationSeverity::Error, &context, "empty roll table");
        }
        for (index, roll) in substat.rolls.iter().enumerate() {
            if !roll.amount.is_finite() || roll.amount <= 0.0 {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.rolls[{index}]"),
                    format!("roll amount must be positive, got {}", roll.amount),
                );
            }
            if !roll.weight.is_finite() || roll.weight < 0.0 {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.rolls[{index}]"),
                    format!("roll weight must be non-negative, got {}", roll.weight),
                );
            }
        }
        if !substat.rolls.is_empty() && substat.rolls.iter().all(|r| r.weight <= 0.0) {
            report.push(
                ValidationSeverity::Error,
                &context,
                "all roll weights are zero; nothing can be drawn",
            );
        }
        if substat.max_rolls == 0 {
            report.push(
                ValidationSeverity::Error,
                &context,
                "max_rolls of 0 makes the substat dead on arrival",
            );
        }
        if !substat.weight.is_finite() || substat.weight < 0.0 {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("selection weight must be non-negative, got {}", substat.weight),
            );
        } else if substat.weight == 0.0 {
            report.push(
                ValidationSeverity::Warning,
                &context,
                "selection weight 0 means this substat is never enhanced",
            );
        }
        let best_roll = substat.rolls.iter().fold(0.0_f64, |acc, r| acc.max(r.amount));
        if substat.min + substat.max_rolls as f64 * best_roll < substat.max {
            report.push(
                ValidationSeverity::Warning,
                &context,
                "max value is unreachable within the roll budget",
            );
        }
    }

    for (module_type, type_config) in &config.module_types {
        let context = format!("module_types.{module_type}");
        if type_config.main_stats.is_empty() {
            report.push(ValidationSeverity::Error, &context, "no legal main stats");
        }
        for (kind, value) in &type_config.main_stats {
            if !value.is_finite() || *value <= 0.0 {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.main_stats.{kind}"),
                    format!("main stat value must be positive, got {value}"),
                );
            }
        }
        for kind in &type_config.restricted_substats {
            if !config.substats.contains_key(kind) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.restricted_substats"),
                    format!("'{kind}' restricts a substat that is not defined"),
                );
            }
        }
        for main_stat in type_config.main_stats.keys() {
            let available = creation_pool_size(config, *main_stat, &type_config.restricted_substats);
            if available < config.creation_substats {
                report.push(
                    ValidationSeverity::Error,
                    &context,
                    format!(
                        "main stat '{main_stat}' leaves {available} substat candidates, \
                         need {}",
                        config.creation_substats
                    ),
                );
            }
        }
    }

    if config.slots.is_empty() {
        report.push(ValidationSeverity::Error, "slots", "no slots defined");
    } else if config.slots.len() != 6 {
        report.push(
            ValidationSeverity::Warning,
            "slots",
            format!("layout has {} slots, loadouts expect 6", config.slots.len()),
        );
    }
    let mut seen_slots = Vec::new();
    for slot in &config.slots {
        let context = format!("slots.{}", slot.slot_id);
        if seen_slots.contains(&slot.slot_id) {
            report.push(ValidationSeverity::Error, &context, "duplicate slot id");
        }
        seen_slots.push(slot.slot_id);
        if slot.allowed_types.is_empty() {
            report.push(ValidationSeverity::Error, &context, "no allowed module types");
        }
        for module_type in &slot.allowed_types {
            if !config.module_types.contains_key(module_type) {
                report.push(
                    ValidationSeverity::Error,
                    &context,
                    format!("allowed type '{module_type}' is not defined"),
                );
            }
        }
    }

    report
}

/// Distinct kinds a fresh module of this main stat can roll: everything defined,
/// minus the main stat, its flat/percentage sibling, and the type's restrictions.
fn creation_pool_size(config: &MathicConfig, main_stat: StatKind, restricted: &[StatKind]) -> usize {
    config
        .substats
        .keys()
        .filter(|kind| {
            **kind != main_stat
                && Some(**kind) != main_stat.sibling()
                && !restricted.contains(kind)
        })
        .count()
}
