//! A loadout is six slots referencing modules by id. It never owns modules;
//! the inventory does, and it enforces the cross-loadout equip rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ModuleId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub name: String,
    /// slot id -> occupant. Every slot id from the config layout is present;
    /// empty slots map to `None`.
    pub slots: BTreeMap<u8, Option<ModuleId>>,
}

impl Loadout {
    pub fn empty(name: impl Into<String>, slot_ids: impl IntoIterator<Item = u8>) -> Self {
        Self {
            name: name.into(),
            slots: slot_ids.into_iter().map(|id| (id, None)).collect(),
        }
    }

    pub fn occupant(&self, slot_id: u8) -> Option<ModuleId> {
        self.slots.get(&slot_id).copied().flatten()
    }

    pub fn has_slot(&self, slot_id: u8) -> bool {
        self.slots.contains_key(&slot_id)
    }

    /// The slot currently holding `module`, if any.
    pub fn slot_of(&self, module: ModuleId) -> Option<u8> {
        self.slots
            .iter()
            .find(|(_, occupant)| **occupant == Some(module))
            .map(|(slot_id, _)| *slot_id)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (u8, ModuleId)> + '_ {
        self.slots
            .iter()
            .filter_map(|(slot_id, occupant)| occupant.map(|id| (*slot_id, id)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Option::is_none)
    }
}
