#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that asks ready sunflowers to produce sun.

use garden_defence_core::{Command, GameStatus, PlantKind, PlantView};

/// Emits `Command::ProduceSun` for sunflowers whose cooldown elapsed.
#[derive(Debug, Default)]
pub struct SunProduction;

impl SunProduction {
    /// Creates a new sun production system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Queues production for every ready sunflower while the game runs.
    pub fn handle(&self, status: GameStatus, plants: &PlantView, out: &mut Vec<Command>) {
        if status != GameStatus::Playing {
            return;
        }

        out.extend(
            plants
                .iter()
                .filter(|plant| plant.kind == PlantKind::Sunflower && plant.is_ready())
                .map(|plant| Command::ProduceSun { plant: plant.id }),
        );
    }
}
