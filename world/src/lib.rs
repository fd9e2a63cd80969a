#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Garden Defence.

mod combat;
mod plants;

use garden_defence_core::{
    lawn_width, wave_quota, CellCoord, Command, Event, GameStatus, LawnPoint, PeaId,
    PlacementError, PlantId, PlantKind, SunAmount, SunId, ZombieId, CELL_LENGTH, INITIAL_SUN,
    KILL_SCORE, LAWN_ROWS, SUN_FALL_PER_TICK, SUN_REST_HEIGHT, SUN_SPAWN_OFFSET_X, SUN_TOKEN_VALUE,
    WELCOME_BANNER, ZOMBIE_HEALTH, ZOMBIE_SPAWN_INSET, ZOMBIE_SPEED_PER_TICK,
};

use self::{
    combat::{Pea, Zombie},
    plants::PlantRegistry,
};

/// Represents the authoritative Garden Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    status: GameStatus,
    sun: SunAmount,
    score: u32,
    wave: u32,
    kills: u32,
    zombies_spawned_in_wave: u32,
    plants: PlantRegistry,
    zombies: Vec<Zombie>,
    peas: Vec<Pea>,
    suns: Vec<Sun>,
    next_zombie_id: ZombieId,
    next_pea_id: PeaId,
    next_sun_id: SunId,
    tick_index: u64,
}

impl World {
    /// Creates a new Garden Defence world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            status: GameStatus::Playing,
            sun: INITIAL_SUN,
            score: 0,
            wave: 1,
            kills: 0,
            zombies_spawned_in_wave: 0,
            plants: PlantRegistry::new(),
            zombies: Vec::new(),
            peas: Vec::new(),
            suns: Vec::new(),
            next_zombie_id: ZombieId::new(0),
            next_pea_id: PeaId::new(0),
            next_sun_id: SunId::new(0),
            tick_index: 0,
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        combat::advance_peas(&mut self.peas, out_events);

        let mut breached = false;
        for zombie in &mut self.zombies {
            if zombie.x <= 0.0 {
                breached = true;
                out_events.push(Event::ZombieReachedHouse {
                    zombie: zombie.id,
                    row: zombie.row,
                });
            }
            zombie.x -= zombie.speed;
        }

        if breached {
            self.status = GameStatus::Lost;
            out_events.push(Event::GameLost {
                score: self.score,
                waves_completed: self.wave.saturating_sub(1),
            });
            return;
        }

        for sun in &mut self.suns {
            sun.settle();
        }

        self.plants.tick_cooldowns();

        let kills = combat::resolve_hits(&mut self.peas, &mut self.zombies, out_events);
        self.credit_kills(kills);
    }

    fn credit_kills(&mut self, kills: u32) {
        self.kills = self.kills.saturating_add(kills);
        self.score = self.score.saturating_add(kills.saturating_mul(KILL_SCORE));
    }

    fn place_plant(&mut self, kind: PlantKind, cell: CellCoord) -> Result<Event, PlacementError> {
        if self.status.is_over() {
            return Err(PlacementError::GameOver);
        }
        if !cell.is_on_lawn() {
            return Err(PlacementError::OutOfBounds);
        }
        if self.plants.is_occupied(cell) {
            return Err(PlacementError::Occupied);
        }

        let cost = kind.cost();
        self.sun = self
            .sun
            .checked_sub(cost)
            .ok_or(PlacementError::InsufficientSun)?;
        let plant = self.plants.insert(kind, cell);
        Ok(Event::PlantPlaced {
            plant,
            kind,
            cell,
            cost,
        })
    }

    fn fire_pea(&mut self, plant: PlantId, out_events: &mut Vec<Event>) {
        let Some(shooter) = self.plants.get_mut(plant) else {
            return;
        };
        if shooter.kind != PlantKind::Peashooter || shooter.cooldown_ticks != 0 {
            return;
        }

        shooter.cooldown_ticks = shooter.kind.reload_ticks();
        let row = shooter.cell.row();
        let x = shooter.cell.origin().x + CELL_LENGTH;

        let pea = self.next_pea_id;
        self.next_pea_id = PeaId::new(pea.get().saturating_add(1));
        out_events.push(Event::PeaFired { pea, plant, row });

        // A fresh pea collides on the tick it was fired, before it can leave the lawn.
        let mut fresh = vec![Pea { id: pea, row, x }];
        let kills = combat::resolve_hits(&mut fresh, &mut self.zombies, out_events);
        self.credit_kills(kills);
        self.peas.append(&mut fresh);
    }

    fn produce_sun(&mut self, plant: PlantId, out_events: &mut Vec<Event>) {
        let Some(sunflower) = self.plants.get_mut(plant) else {
            return;
        };
        if sunflower.kind != PlantKind::Sunflower || sunflower.cooldown_ticks != 0 {
            return;
        }

        sunflower.cooldown_ticks = sunflower.kind.reload_ticks();
        let origin = sunflower.cell.origin();

        let sun = self.next_sun_id;
        self.next_sun_id = SunId::new(sun.get().saturating_add(1));
        self.suns.push(Sun {
            id: sun,
            position: LawnPoint::new(origin.x + SUN_SPAWN_OFFSET_X, origin.y),
            falling: true,
        });
        out_events.push(Event::SunProduced { sun, plant });
    }

    fn spawn_zombie(&mut self, row: u32, out_events: &mut Vec<Event>) {
        if row >= LAWN_ROWS {
            return;
        }

        let zombie = self.next_zombie_id;
        self.next_zombie_id = ZombieId::new(zombie.get().saturating_add(1));
        self.zombies.push(Zombie {
            id: zombie,
            row,
            x: lawn_width() - ZOMBIE_SPAWN_INSET,
            health: ZOMBIE_HEALTH,
            speed: ZOMBIE_SPEED_PER_TICK,
        });
        self.zombies_spawned_in_wave = self.zombies_spawned_in_wave.saturating_add(1);
        out_events.push(Event::ZombieSpawned { zombie, row });
    }

    fn wave_cleared(&self) -> bool {
        self.kills >= wave_quota(self.wave) && self.zombies.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Command::Restart = command {
        *world = World::new();
        out_events.push(Event::GameRestarted);
        return;
    }

    if let Command::PlacePlant { kind, cell } = command {
        match world.place_plant(kind, cell) {
            Ok(event) => out_events.push(event),
            Err(reason) => out_events.push(Event::PlantPlacementRejected { kind, cell, reason }),
        }
        return;
    }

    if world.status.is_over() {
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.tick(out_events);
        }
        Command::CollectSun { sun } => {
            match world.suns.iter().position(|token| token.id == sun) {
                Some(index) => {
                    let _ = world.suns.remove(index);
                    world.sun = world.sun.saturating_add(SUN_TOKEN_VALUE);
                    out_events.push(Event::SunCollected {
                        sun,
                        amount: SUN_TOKEN_VALUE,
                    });
                }
                None => out_events.push(Event::SunCollectionRejected { sun }),
            }
        }
        Command::SpawnZombie { row } => world.spawn_zombie(row, out_events),
        Command::FirePea { plant } => world.fire_pea(plant, out_events),
        Command::ProduceSun { plant } => world.produce_sun(plant, out_events),
        Command::AdvanceWave => {
            if world.wave_cleared() {
                world.wave = world.wave.saturating_add(1);
                world.kills = 0;
                world.zombies_spawned_in_wave = 0;
                out_events.push(Event::WaveAdvanced { wave: world.wave });
            }
        }
        Command::DeclareVictory => {
            world.status = GameStatus::Won;
            out_events.push(Event::GameWon {
                score: world.score,
                waves_completed: world.wave.saturating_sub(1),
            });
        }
        Command::PlacePlant { .. } | Command::Restart => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use garden_defence_core::{
        wave_quota, CellCoord, GameStatus, LawnPoint, PeaSnapshot, PeaView, PlantSnapshot,
        PlantView, ProgressSnapshot, SunAmount, SunId, SunSnapshot, SunView, ZombieSnapshot,
        ZombieView, SUN_PICK_RADIUS,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports whether the game is running, won or lost.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Sun currently available for planting.
    #[must_use]
    pub fn sun_balance(world: &World) -> SunAmount {
        world.sun
    }

    /// Number of the active wave.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Number of simulation ticks processed since the game began.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of zombies that entered the lawn during the active wave.
    #[must_use]
    pub fn zombies_spawned_in_wave(world: &World) -> u32 {
        world.zombies_spawned_in_wave
    }

    /// Captures the economy and wave progress of the current game.
    #[must_use]
    pub fn progress(world: &World) -> ProgressSnapshot {
        ProgressSnapshot {
            status: world.status,
            sun: world.sun,
            score: world.score,
            wave: world.wave,
            kills: world.kills,
            quota: wave_quota(world.wave),
        }
    }

    /// Captures a read-only view of the plants on the lawn.
    #[must_use]
    pub fn plant_view(world: &World) -> PlantView {
        PlantView::from_snapshots(world.plants.iter().map(|plant| plant.snapshot()).collect())
    }

    /// Returns the plant occupying the provided cell, if any.
    #[must_use]
    pub fn plant_at(world: &World, cell: CellCoord) -> Option<PlantSnapshot> {
        world.plants.at(cell).map(|plant| plant.snapshot())
    }

    /// Captures a read-only view of the zombies on the lawn.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        ZombieView::from_snapshots(
            world
                .zombies
                .iter()
                .map(|zombie| ZombieSnapshot {
                    id: zombie.id,
                    row: zombie.row,
                    x: zombie.x,
                    health: zombie.health,
                    speed: zombie.speed,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the peas in flight.
    #[must_use]
    pub fn pea_view(world: &World) -> PeaView {
        PeaView::from_snapshots(
            world
                .peas
                .iter()
                .map(|pea| PeaSnapshot {
                    id: pea.id,
                    row: pea.row,
                    x: pea.x,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the uncollected sun tokens.
    #[must_use]
    pub fn sun_view(world: &World) -> SunView {
        SunView::from_snapshots(
            world
                .suns
                .iter()
                .map(|sun| SunSnapshot {
                    id: sun.id,
                    position: sun.position,
                    falling: sun.falling,
                })
                .collect(),
        )
    }

    /// Returns the most recently produced sun token under the provided point.
    #[must_use]
    pub fn sun_at(world: &World, point: LawnPoint) -> Option<SunId> {
        world
            .suns
            .iter()
            .rev()
            .find(|sun| {
                let dx = sun.position.x - point.x;
                let dy = sun.position.y - point.y;
                dx * dx + dy * dy <= SUN_PICK_RADIUS * SUN_PICK_RADIUS
            })
            .map(|sun| sun.id)
    }
}

#[derive(Clone, Debug)]
struct Sun {
    id: SunId,
    position: LawnPoint,
    falling: bool,
}

impl Sun {
    fn settle(&mut self) {
        if self.falling && self.position.y < SUN_REST_HEIGHT {
            self.position.y += SUN_FALL_PER_TICK;
        } else {
            self.falling = false;
        }
    }
}
