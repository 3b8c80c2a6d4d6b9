//! The owning collection: modules, loadouts, and the id allocator live here.
//! Loadouts only ever hold module ids; the maps in this struct are the single
//! source of truth, and every mutating operation checks its preconditions
//! before touching state, so a returned error never leaves partial effects.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::data::config::{ConfigError, MathicConfig};
use crate::data::snapshot::{LoadoutSnapshot, Snapshot};
use crate::engine::{self, EnhanceOutcome};
use crate::error::MathicError;
use crate::model::{Loadout, Module, ModuleId, ModuleType, StatKind, StatTotals};
use crate::rng::Rng;

#[derive(Debug, Clone)]
pub struct Inventory {
    config: MathicConfig,
    modules: BTreeMap<ModuleId, Module>,
    loadouts: BTreeMap<String, Loadout>,
    next_id: u64,
}

impl Inventory {
    /// Fails fast on invalid config; nothing operates without a clean one.
    pub fn new(config: MathicConfig) -> Result<Self, ConfigError> {
        let report = crate::data::validate::validate_config(&config);
        if report.has_errors() {
            return Err(ConfigError::Validation(report));
        }
        Ok(Self {
            config,
            modules: BTreeMap::new(),
            loadouts: BTreeMap::new(),
            next_id: 1,
        })
    }

    pub fn config(&self) -> &MathicConfig {
        &self.config
    }

    fn allocate_id(&mut self) -> ModuleId {
        let id = ModuleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a module of `module_type` with the given main stat. The main stat
    /// value is fixed by config; substats are rolled through `rng`.
    pub fn create_module(
        &mut self,
        module_type: ModuleType,
        main_stat: StatKind,
        rng: &mut Rng,
    ) -> Result<ModuleId, MathicError> {
        let main_stat_value = self
            .config
            .main_stat_value(module_type, main_stat)
            .ok_or(MathicError::InvalidMainStat {
                module_type,
                stat: main_stat,
            })?;
        let substats = engine::roll_creation_substats(module_type, main_stat, &self.config, rng)?;

        let id = self.allocate_id();
        self.modules.insert(
            id,
            Module {
                id,
                module_type,
                main_stat,
                main_stat_value,
                substats,
                level: 0,
            },
        );
        Ok(id)
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// One enhancement step on an owned module. See [`engine::enhance`].
    pub fn enhance(&mut self, id: ModuleId, rng: &mut Rng) -> Result<EnhanceOutcome, MathicError> {
        let module = self
            .modules
            .get_mut(&id)
            .ok_or(MathicError::UnknownModule(id))?;
        Ok(engine::enhance(module, &self.config, rng))
    }

    /// Delete a module. Blocked while the module is equipped anywhere; unassign
    /// it (or delete the loadout) first.
    pub fn delete_module(&mut self, id: ModuleId) -> Result<(), MathicError> {
        if !self.modules.contains_key(&id) {
            return Err(MathicError::UnknownModule(id));
        }
        if let Some((loadout, slot)) = self.equipped_location(id) {
            return Err(MathicError::ModuleEquipped {
                module: id,
                loadout: loadout.to_string(),
                slot,
            });
        }
        self.modules.remove(&id);
        Ok(())
    }

    /// Register a new, empty loadout with the config's slot layout.
    pub fn create_loadout(&mut self, name: impl Into<String>) -> Result<&Loadout, MathicError> {
        match self.loadouts.entry(name.into()) {
            Entry::Occupied(entry) => Err(MathicError::DuplicateName(entry.key().clone())),
            Entry::Vacant(entry) => {
                let loadout = Loadout::empty(entry.key().clone(), self.config.slot_ids());
                Ok(&*entry.insert(loadout))
            }
        }
    }

    pub fn loadout(&self, name: &str) -> Option<&Loadout> {
        self.loadouts.get(name)
    }

    pub fn loadouts(&self) -> impl Iterator<Item = &Loadout> {
        self.loadouts.values()
    }

    /// Drop a loadout, freeing whatever it held.
    pub fn delete_loadout(&mut self, name: &str) -> Result<(), MathicError> {
        self.loadouts
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MathicError::UnknownLoadout(name.to_string()))
    }

    /// Where a module is equipped, if anywhere. At most one location can exist.
    pub fn equipped_location(&self, id: ModuleId) -> Option<(&str, u8)> {
        self.loadouts
            .values()
            .find_map(|loadout| loadout.slot_of(id).map(|slot| (loadout.name.as_str(), slot)))
    }

    /// Equip a module. Replaces (and returns) the slot's previous occupant; the
    /// evicted module becomes unequipped, not deleted. A module already
    /// referenced by any tracked loadout is rejected.
    pub fn assign(
        &mut self,
        loadout_name: &str,
        slot_id: u8,
        id: ModuleId,
    ) -> Result<Option<ModuleId>, MathicError> {
        if !self.loadouts.contains_key(loadout_name) {
            return Err(MathicError::UnknownLoadout(loadout_name.to_string()));
        }
        let module_type = self
            .modules
            .get(&id)
            .map(|m| m.module_type)
            .ok_or(MathicError::UnknownModule(id))?;
        let slot = self
            .config
            .slot(slot_id)
            .ok_or(MathicError::UnknownSlot(slot_id))?;
        if !slot.allowed_types.contains(&module_type) {
            return Err(MathicError::SlotTypeMismatch {
                slot: slot_id,
                module_type,
            });
        }
        if let Some((loadout, slot)) = self.equipped_location(id) {
            return Err(MathicError::ModuleAlreadyEquipped {
                module: id,
                loadout: loadout.to_string(),
                slot,
            });
        }

        let loadout = self
            .loadouts
            .get_mut(loadout_name)
            .ok_or_else(|| MathicError::UnknownLoadout(loadout_name.to_string()))?;
        let evicted = loadout.slots.insert(slot_id, Some(id)).flatten();
        Ok(evicted)
    }

    /// Clear a slot. Returns the module that was there; `None` means the slot
    /// was already empty, which is not an error.
    pub fn unassign(
        &mut self,
        loadout_name: &str,
        slot_id: u8,
    ) -> Result<Option<ModuleId>, MathicError> {
        let loadout = self
            .loadouts
            .get_mut(loadout_name)
            .ok_or_else(|| MathicError::UnknownLoadout(loadout_name.to_string()))?;
        if !loadout.has_slot(slot_id) {
            return Err(MathicError::UnknownSlot(slot_id));
        }
        let evicted = loadout.slots.insert(slot_id, None).flatten();
        Ok(evicted)
    }

    /// Sum main stat and substat values across occupied slots, grouped by kind.
    /// Pure read; an empty loadout folds to an empty map.
    pub fn total_stats(&self, loadout_name: &str) -> Result<StatTotals, MathicError> {
        let loadout = self
            .loadouts
            .get(loadout_name)
            .ok_or_else(|| MathicError::UnknownLoadout(loadout_name.to_string()))?;
        let mut totals = StatTotals::new();
        for (_, id) in loadout.occupied() {
            // Deletion is blocked while equipped, so ids always resolve.
            if let Some(module) = self.modules.get(&id) {
                totals.add_many(module.stat_contributions());
            }
        }
        Ok(totals)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            modules: self.modules.values().cloned().collect(),
            loadouts: self.loadouts.values().map(LoadoutSnapshot::from).collect(),
        }
    }

    /// Rebuild the collections from a snapshot, replacing current contents.
    /// Every invariant the live operations enforce is re-checked; on error the
    /// inventory is left untouched. The id allocator resumes past the highest
    /// restored id.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), MathicError> {
        let mut modules: BTreeMap<ModuleId, Module> = BTreeMap::new();
        for module in &snapshot.modules {
            self.check_module(module)?;
            if modules.insert(module.id, module.clone()).is_some() {
                return Err(MathicError::DuplicateModuleId(module.id));
            }
        }

        let mut loadouts: BTreeMap<String, Loadout> = BTreeMap::new();
        let mut equipped: BTreeMap<ModuleId, (String, u8)> = BTreeMap::new();
        for entry in &snapshot.loadouts {
            if loadouts.contains_key(&entry.name) {
                return Err(MathicError::DuplicateName(entry.name.clone()));
            }
            let mut loadout = Loadout::empty(entry.name.clone(), self.config.slot_ids());
            for (slot_id, id) in &entry.slots {
                let slot = self
                    .config
                    .slot(*slot_id)
                    .ok_or(MathicError::UnknownSlot(*slot_id))?;
                let module = modules.get(id).ok_or(MathicError::UnknownModule(*id))?;
                if !slot.allowed_types.contains(&module.module_type) {
                    return Err(MathicError::SlotTypeMismatch {
                        slot: *slot_id,
                        module_type: module.module_type,
                    });
                }
                if let Some((loadout_name, slot)) = equipped.get(id) {
                    return Err(MathicError::ModuleAlreadyEquipped {
                        module: *id,
                        loadout: loadout_name.clone(),
                        slot: *slot,
                    });
                }
                equipped.insert(*id, (entry.name.clone(), *slot_id));
                loadout.slots.insert(*slot_id, Some(*id));
            }
            loadouts.insert(entry.name.clone(), loadout);
        }

        self.next_id = modules.keys().last().map(|id| id.0 + 1).unwrap_or(1);
        self.modules = modules;
        self.loadouts = loadouts;
        Ok(())
    }

    fn check_module(&self, module: &Module) -> Result<(), MathicError> {
        if self
            .config
            .main_stat_value(module.module_type, module.main_stat)
            .is_none()
        {
            return Err(MathicError::InvalidMainStat {
                module_type: module.module_type,
                stat: module.main_stat,
            });
        }
        if module.level > self.config.enhancement_ceiling {
            return Err(MathicError::LevelAboveCeiling {
                module: module.id,
                level: module.level,
                ceiling: self.config.enhancement_ceiling,
            });
        }
        if module.substats.len() > Module::MAX_SUBSTATS {
            return Err(MathicError::TooManySubstats {
                module: module.id,
                count: module.substats.len(),
            });
        }
        let mut seen: Vec<StatKind> = Vec::with_capacity(module.substats.len());
        for substat in &module.substats {
            if seen.contains(&substat.kind) {
                return Err(MathicError::DuplicateSubstat {
                    module: module.id,
                    kind: substat.kind,
                });
            }
            seen.push(substat.kind);
            if substat.kind == module.main_stat
                || Some(substat.kind) == module.main_stat.sibling()
            {
                return Err(MathicError::SubstatConflictsMainStat {
                    module: module.id,
                    kind: substat.kind,
                });
            }
            let substat_config =
                self.config
                    .substat(substat.kind)
                    .ok_or(MathicError::UnknownSubstatKind {
                        module: module.id,
                        kind: substat.kind,
                    })?;
            if substat.value < substat_config.min || substat.value > substat_config.max {
                return Err(MathicError::SubstatOutOfRange {
                    module: module.id,
                    kind: substat.kind,
                    value: substat.value,
                });
            }
            if substat.rolls_used > substat_config.max_rolls {
                return Err(MathicError::RollsOverBudget {
                    module: module.id,
                    kind: substat.kind,
                    rolls_used: substat.rolls_used,
                    max_rolls: substat_config.max_rolls,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Inventory {
        Inventory::new(MathicConfig::builtin()).unwrap()
    }

    #[test]
    fn module_ids_are_unique_and_monotonic() {
        let mut inv = inventory();
        let mut rng = Rng::new(1);
        let a = inv
            .create_module(ModuleType::Mask, StatKind::Atk, &mut rng)
            .unwrap();
        let b = inv
            .create_module(ModuleType::Core, StatKind::CritRate, &mut rng)
            .unwrap();
        assert!(b > a);
        assert_ne!(inv.module(a).unwrap().module_type, inv.module(b).unwrap().module_type);
    }

    #[test]
    fn invalid_main_stat_is_rejected_before_allocation() {
        let mut inv = inventory();
        let mut rng = Rng::new(1);
        let err = inv
            .create_module(ModuleType::Mask, StatKind::Spd, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            MathicError::InvalidMainStat {
                module_type: ModuleType::Mask,
                stat: StatKind::Spd,
            }
        );
        assert_eq!(inv.modules().count(), 0);
        // The failed call must not burn an id.
        let id = inv
            .create_module(ModuleType::Mask, StatKind::Atk, &mut rng)
            .unwrap();
        assert_eq!(id, ModuleId(1));
    }

    #[test]
    fn enhancing_unknown_module_fails() {
        let mut inv = inventory();
        let err = inv.enhance(ModuleId(99), &mut Rng::new(1)).unwrap_err();
        assert_eq!(err, MathicError::UnknownModule(ModuleId(99)));
    }

    #[test]
    fn invalid_config_is_fatal_at_construction() {
        let mut config = MathicConfig::builtin();
        config.substats.clear();
        assert!(matches!(
            Inventory::new(config),
            Err(ConfigError::Validation(_))
        ));
    }
}
