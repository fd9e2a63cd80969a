#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits pea firing commands for ready peashooters.

use garden_defence_core::{Command, GameStatus, PlantKind, PlantView, ZombieView};

/// Plant combat system that queues firing commands for ready peashooters.
#[derive(Debug, Default)]
pub struct PlantCombat {
    scratch: Vec<Command>,
}

impl PlantCombat {
    /// Creates a new plant combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FirePea` for every ready peashooter facing a zombie in its lane.
    pub fn handle(
        &mut self,
        status: GameStatus,
        plants: &PlantView,
        zombies: &ZombieView,
        out: &mut Vec<Command>,
    ) {
        if status != GameStatus::Playing || zombies.is_empty() {
            return;
        }

        self.scratch.clear();
        for plant in plants.iter() {
            if plant.kind == PlantKind::Peashooter
                && plant.is_ready()
                && zombies.occupies_row(plant.cell.row())
            {
                self.scratch.push(Command::FirePea { plant: plant.id });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
