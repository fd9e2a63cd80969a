//! Authoritative plant state management utilities.

use std::collections::BTreeMap;

use garden_defence_core::{CellCoord, PlantId, PlantKind, PlantSnapshot};

/// Plant stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct PlantState {
    pub(crate) id: PlantId,
    pub(crate) kind: PlantKind,
    pub(crate) cell: CellCoord,
    pub(crate) cooldown_ticks: u32,
}

impl PlantState {
    pub(crate) fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            cooldown_ticks: self.cooldown_ticks,
        }
    }
}

/// Registry that stores plants by identifier and indexes them by cell.
#[derive(Debug)]
pub(crate) struct PlantRegistry {
    entries: BTreeMap<PlantId, PlantState>,
    by_cell: BTreeMap<CellCoord, PlantId>,
    next_plant_id: PlantId,
}

impl PlantRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_cell: BTreeMap::new(),
            next_plant_id: PlantId::new(0),
        }
    }

    pub(crate) fn is_occupied(&self, cell: CellCoord) -> bool {
        self.by_cell.contains_key(&cell)
    }

    pub(crate) fn at(&self, cell: CellCoord) -> Option<&PlantState> {
        self.by_cell
            .get(&cell)
            .and_then(|id| self.entries.get(id))
    }

    pub(crate) fn get_mut(&mut self, id: PlantId) -> Option<&mut PlantState> {
        self.entries.get_mut(&id)
    }

    /// Inserts a new plant, returning its identifier. The caller checks occupancy.
    pub(crate) fn insert(&mut self, kind: PlantKind, cell: CellCoord) -> PlantId {
        let id = self.next_plant_id;
        self.next_plant_id = PlantId::new(id.get().saturating_add(1));
        let _ = self.by_cell.insert(cell, id);
        let _ = self.entries.insert(
            id,
            PlantState {
                id,
                kind,
                cell,
                cooldown_ticks: 0,
            },
        );
        id
    }

    /// Counts every plant's cooldown down by a single tick.
    pub(crate) fn tick_cooldowns(&mut self) {
        for plant in self.entries.values_mut() {
            plant.cooldown_ticks = plant.cooldown_ticks.saturating_sub(1);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlantState> {
        self.entries.values()
    }
}
