//! Enhancement engine: the randomized transitions of a module's life.
//!
//! Every draw goes through a caller-supplied [`Rng`], so a fixed seed replays
//! the exact same sequence of (substat, delta) choices. There is no ambient
//! randomness anywhere in the crate.

use crate::data::config::MathicConfig;
use crate::error::MathicError;
use crate::model::{Module, ModuleType, StatKind, Substat};
use crate::rng::Rng;

/// What a single enhancement call did. `AlreadyMaxed` is a terminal-state
/// signal, not an error: the module is untouched and the caller decides
/// whether that counts as success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnhanceOutcome {
    Enhanced { kind: StatKind, delta: f64 },
    AlreadyMaxed,
}

impl EnhanceOutcome {
    pub fn is_maxed(&self) -> bool {
        matches!(self, Self::AlreadyMaxed)
    }
}

/// Apply one enhancement step: pick a substat proportionally to its configured
/// selection weight, draw an increment from its roll table, clamp to the kind
/// maximum, bump the roll counter and the module level.
///
/// Substats are candidates only while they have roll budget left and their
/// config entry is drawable; a module with no candidates, or at the global
/// ceiling, reports `AlreadyMaxed` without mutating anything.
pub fn enhance(module: &mut Module, config: &MathicConfig, rng: &mut Rng) -> EnhanceOutcome {
    if module.level >= config.enhancement_ceiling {
        return EnhanceOutcome::AlreadyMaxed;
    }

    let mut candidates = Vec::with_capacity(module.substats.len());
    let mut weights = Vec::with_capacity(module.substats.len());
    for (index, substat) in module.substats.iter().enumerate() {
        let Some(substat_config) = config.substat(substat.kind) else {
            continue;
        };
        if !substat.can_enhance(substat_config.max_rolls) {
            continue;
        }
        if substat_config.rolls.iter().all(|r| r.weight <= 0.0) {
            continue;
        }
        candidates.push(index);
        weights.push(substat_config.weight);
    }

    let Some(picked) = rng.weighted_index(&weights) else {
        return EnhanceOutcome::AlreadyMaxed;
    };
    let substat = &mut module.substats[candidates[picked]];
    let substat_config = match config.substat(substat.kind) {
        Some(c) => c,
        None => return EnhanceOutcome::AlreadyMaxed,
    };

    let roll_weights: Vec<f64> = substat_config.rolls.iter().map(|r| r.weight).collect();
    let Some(roll) = rng.weighted_index(&roll_weights) else {
        return EnhanceOutcome::AlreadyMaxed;
    };
    let amount = substat_config.rolls[roll].amount;

    let new_value = (substat.value + amount).min(substat_config.max);
    let delta = new_value - substat.value;
    substat.value = new_value;
    substat.rolls_used += 1;
    module.level += 1;

    EnhanceOutcome::Enhanced {
        kind: substat.kind,
        delta,
    }
}

/// Derived efficiency of a substat, as a percentage of its configured domain.
/// `None` when the kind is absent from the config.
pub fn efficiency(config: &MathicConfig, substat: &Substat) -> Option<f64> {
    let substat_config = config.substat(substat.kind)?;
    Some(substat.efficiency(substat_config.min, substat_config.max))
}

/// Roll the creation-time substat set: a random distinct subset of the defined
/// kinds, excluding the main stat, its flat/percentage sibling, and the type's
/// restricted kinds. Each starts at its configured minimum with no rolls used.
pub(crate) fn roll_creation_substats(
    module_type: ModuleType,
    main_stat: StatKind,
    config: &MathicConfig,
    rng: &mut Rng,
) -> Result<Vec<Substat>, MathicError> {
    let restricted = config
        .module_types
        .get(&module_type)
        .map(|t| t.restricted_substats.as_slice())
        .unwrap_or(&[]);

    // BTreeMap keys come out sorted, so the pool order is stable across runs.
    let mut pool: Vec<StatKind> = config
        .substats
        .keys()
        .copied()
        .filter(|kind| {
            *kind != main_stat && Some(*kind) != main_stat.sibling() && !restricted.contains(kind)
        })
        .collect();

    let count = config.creation_substats;
    if pool.len() < count {
        return Err(MathicError::NotEnoughSubstats {
            module_type,
            needed: count,
            available: pool.len(),
        });
    }

    // Partial Fisher-Yates: the first `count` entries end up a uniform sample.
    for index in 0..count {
        let swap_with = index + rng.next_below(pool.len() - index);
        pool.swap(index, swap_with);
    }

    Ok(pool[..count]
        .iter()
        .map(|kind| {
            let min = config.substat(*kind).map(|c| c.min).unwrap_or(0.0);
            Substat::new(*kind, min)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleId;

    fn test_module(substats: &[StatKind], config: &MathicConfig) -> Module {
        Module {
            id: ModuleId(1),
            module_type: ModuleType::Mask,
            main_stat: StatKind::Atk,
            main_stat_value: 550.0,
            substats: substats
                .iter()
                .map(|kind| Substat::new(*kind, config.substat(*kind).unwrap().min))
                .collect(),
            level: 0,
        }
    }

    #[test]
    fn enhance_at_ceiling_is_a_reported_noop() {
        let config = MathicConfig::builtin();
        let mut module = test_module(&[StatKind::Spd], &config);
        module.level = config.enhancement_ceiling;
        let before = module.clone();
        assert_eq!(
            enhance(&mut module, &config, &mut Rng::new(1)),
            EnhanceOutcome::AlreadyMaxed
        );
        assert_eq!(module, before);
    }

    #[test]
    fn enhance_bumps_level_and_roll_counter() {
        let config = MathicConfig::builtin();
        let mut module = test_module(&[StatKind::Spd, StatKind::Hp], &config);
        let outcome = enhance(&mut module, &config, &mut Rng::new(5));
        let EnhanceOutcome::Enhanced { kind, delta } = outcome else {
            panic!("expected an enhancement");
        };
        assert!(delta > 0.0);
        assert_eq!(module.level, 1);
        assert_eq!(module.substat(kind).unwrap().rolls_used, 1);
    }

    #[test]
    fn same_seed_replays_the_same_choices() {
        let config = MathicConfig::builtin();
        let kinds = [StatKind::Def, StatKind::Hp, StatKind::CritRate, StatKind::Spd];
        let mut first = test_module(&kinds, &config);
        let mut second = test_module(&kinds, &config);
        let mut rng_a = Rng::new(99);
        let mut rng_b = Rng::new(99);
        for _ in 0..15 {
            assert_eq!(
                enhance(&mut first, &config, &mut rng_a),
                enhance(&mut second, &config, &mut rng_b)
            );
        }
        assert_eq!(first, second);
    }

    #[test]
    fn roll_budget_exhaustion_reports_maxed_below_ceiling() {
        let config = MathicConfig::builtin();
        let mut module = test_module(&[StatKind::Spd], &config);
        let budget = config.substat(StatKind::Spd).unwrap().max_rolls;
        let mut rng = Rng::new(7);
        for _ in 0..budget {
            assert!(!enhance(&mut module, &config, &mut rng).is_maxed());
        }
        assert!(module.level < config.enhancement_ceiling);
        assert!(enhance(&mut module, &config, &mut rng).is_maxed());
        assert_eq!(module.level, budget);
    }

    #[test]
    fn values_clamp_to_the_kind_maximum() {
        let mut config = MathicConfig::builtin();
        // Shrink the domain so the very first roll overshoots.
        let spd = config.substats.get_mut(&StatKind::Spd).unwrap();
        spd.max = spd.min + 1.0;
        let mut module = test_module(&[StatKind::Spd], &config);
        let outcome = enhance(&mut module, &config, &mut Rng::new(11));
        let EnhanceOutcome::Enhanced { delta, .. } = outcome else {
            panic!("expected an enhancement");
        };
        assert!((delta - 1.0).abs() < 1e-9);
        let spd_config = config.substat(StatKind::Spd).unwrap();
        assert_eq!(module.substat(StatKind::Spd).unwrap().value, spd_config.max);
    }

    #[test]
    fn zero_weight_substats_are_never_picked() {
        let mut config = MathicConfig::builtin();
        config.substats.get_mut(&StatKind::Hp).unwrap().weight = 0.0;
        let mut module = test_module(&[StatKind::Hp, StatKind::Spd], &config);
        let mut rng = Rng::new(21);
        for _ in 0..5 {
            match enhance(&mut module, &config, &mut rng) {
                EnhanceOutcome::Enhanced { kind, .. } => assert_eq!(kind, StatKind::Spd),
                EnhanceOutcome::AlreadyMaxed => break,
            }
        }
        assert_eq!(module.substat(StatKind::Hp).unwrap().rolls_used, 0);
    }

    #[test]
    fn creation_substats_are_distinct_and_legal() {
        let config = MathicConfig::builtin();
        for seed in 0..50 {
            let rolled = roll_creation_substats(
                ModuleType::Mask,
                StatKind::Atk,
                &config,
                &mut Rng::new(seed),
            )
            .unwrap();
            assert_eq!(rolled.len(), config.creation_substats);
            let mut kinds: Vec<_> = rolled.iter().map(|s| s.kind).collect();
            kinds.sort();
            kinds.dedup();
            assert_eq!(kinds.len(), rolled.len(), "duplicate kind under seed {seed}");
            for substat in &rolled {
                assert_ne!(substat.kind, StatKind::Atk);
                assert_ne!(Some(substat.kind), StatKind::Atk.sibling());
                assert_eq!(substat.value, config.substat(substat.kind).unwrap().min);
                assert_eq!(substat.rolls_used, 0);
            }
        }
    }

    #[test]
    fn restricted_kinds_never_roll_at_creation() {
        let config = MathicConfig::builtin();
        for seed in 0..100 {
            let rolled = roll_creation_substats(
                ModuleType::Core,
                StatKind::CritRate,
                &config,
                &mut Rng::new(seed),
            )
            .unwrap();
            assert!(rolled.iter().all(|s| s.kind != StatKind::Impact));
        }
    }

    #[test]
    fn starved_pool_is_rejected() {
        let mut config = MathicConfig::builtin();
        let spd = config.substats.get(&StatKind::Spd).unwrap().clone();
        config.substats.clear();
        config.substats.insert(StatKind::Spd, spd);
        let err = roll_creation_substats(
            ModuleType::Mask,
            StatKind::Atk,
            &config,
            &mut Rng::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, MathicError::NotEnoughSubstats { .. }));
    }

    #[test]
    fn efficiency_tracks_enhancement() {
        let config = MathicConfig::builtin();
        let mut module = test_module(&[StatKind::Spd], &config);
        let mut rng = Rng::new(3);
        let mut last = efficiency(&config, module.substat(StatKind::Spd).unwrap()).unwrap();
        assert_eq!(last, 0.0);
        while !enhance(&mut module, &config, &mut rng).is_maxed() {
            let now = efficiency(&config, module.substat(StatKind::Spd).unwrap()).unwrap();
            assert!(now >= last);
            last = now;
        }
        assert!(last <= 100.0 + 1e-9);
    }
}
