//! Serializable snapshot of the inventory: every module record plus each
//! loadout's occupied slots. The encoding and the store that holds it belong to
//! an external collaborator; this crate only emits and reconstructs the shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Loadout, Module, ModuleId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub modules: Vec<Module>,
    pub loadouts: Vec<LoadoutSnapshot>,
}

/// Only occupied slots are recorded; restore re-creates the empty ones from the
/// config's slot layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutSnapshot {
    pub name: String,
    pub slots: BTreeMap<u8, ModuleId>,
}

impl From<&Loadout> for LoadoutSnapshot {
    fn from(loadout: &Loadout) -> Self {
        Self {
            name: loadout.name.clone(),
            slots: loadout.occupied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loadout_snapshot_keeps_only_occupied_slots() {
        let mut loadout = Loadout::empty("L1", 1..=6);
        loadout.slots.insert(2, Some(ModuleId(7)));
        let snap = LoadoutSnapshot::from(&loadout);
        assert_eq!(snap.name, "L1");
        assert_eq!(snap.slots, BTreeMap::from([(2, ModuleId(7))]));
    }
}
