//! Fixed-step driver that feeds world events through the game systems.

use std::time::Duration;

use garden_defence_core::{
    CellCoord, Command, Event, GameStatus, LawnPoint, PlantKind, CELL_LENGTH, LAWN_ROWS,
    TICK_DURATION,
};
use garden_defence_system_plant_combat::PlantCombat;
use garden_defence_system_planting::{Planting, PlantingInput};
use garden_defence_system_spawning::Spawning;
use garden_defence_system_sun_production::SunProduction;
use garden_defence_system_waves::Waves;
use garden_defence_world::{self as world, query, World};

use crate::config::GameConfig;

/// Upper bound on ticks processed in one frame; slower frames drop the rest.
const MAX_TICKS_PER_FRAME: u32 = 10;
/// Upper bound on system passes after a tick before the step is considered settled.
const MAX_SYSTEM_ROUNDS: u32 = 8;

/// Player intent gathered for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PlayerInput {
    /// Seed packet picked this frame.
    pub(crate) packet: Option<PlantKind>,
    /// Lawn position clicked this frame.
    pub(crate) click: Option<LawnPoint>,
    /// Whether a fresh game was requested.
    pub(crate) restart: bool,
}

/// Final result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) status: GameStatus,
    pub(crate) score: u32,
    pub(crate) waves_completed: u32,
}

impl Outcome {
    /// Extracts the game result announced by the provided events, if any.
    pub(crate) fn from_events(events: &[Event]) -> Option<Self> {
        events.iter().find_map(|event| match *event {
            Event::GameWon {
                score,
                waves_completed,
            } => Some(Self {
                status: GameStatus::Won,
                score,
                waves_completed,
            }),
            Event::GameLost {
                score,
                waves_completed,
            } => Some(Self {
                status: GameStatus::Lost,
                score,
                waves_completed,
            }),
            _ => None,
        })
    }
}

/// Owns the world and every system, advancing them in lockstep.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    plant_combat: PlantCombat,
    sun_production: SunProduction,
    planting: Planting,
    waves: Waves,
    accumulator: Duration,
    unseen_by_planting: Vec<Event>,
    frame_events: Vec<Event>,
    step_events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    pub(crate) fn new(config: &GameConfig) -> Self {
        Self {
            world: World::new(),
            spawning: Spawning::new(config.spawn_config()),
            plant_combat: PlantCombat::new(),
            sun_production: SunProduction::new(),
            planting: Planting::new(),
            waves: Waves::new(config.final_wave),
            accumulator: Duration::ZERO,
            unseen_by_planting: Vec::new(),
            frame_events: Vec::new(),
            step_events: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Seed packet the player is holding.
    pub(crate) fn selected_packet(&self) -> Option<PlantKind> {
        self.planting.selected()
    }

    /// Applies player input, then advances the world by `dt` in fixed ticks.
    ///
    /// Returns every event the world emitted during the frame.
    pub(crate) fn frame(&mut self, dt: Duration, input: PlayerInput) -> &[Event] {
        self.frame_events.clear();

        if input.restart {
            self.accumulator = Duration::ZERO;
            self.apply_all(std::iter::once(Command::Restart));
        }

        let planting_input = self.resolve_input(input);
        let progress = query::progress(&self.world);
        self.planting.handle(
            &self.unseen_by_planting,
            progress,
            planting_input,
            &mut self.commands,
        );
        self.unseen_by_planting.clear();
        let commands = std::mem::take(&mut self.commands);
        self.apply_all(commands);

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION {
            self.accumulator -= TICK_DURATION;
            if ticks == MAX_TICKS_PER_FRAME {
                tracing::debug!(dropped = ?self.accumulator, "frame too slow, dropping time");
                self.accumulator = Duration::ZERO;
                break;
            }
            ticks += 1;
            self.step();
        }

        &self.frame_events
    }

    /// Translates a lawn click into either a sun pick-up or a planting target.
    fn resolve_input(&self, input: PlayerInput) -> PlantingInput {
        let sun_click = input
            .click
            .and_then(|point| query::sun_at(&self.world, point));
        let lawn_click = match sun_click {
            Some(_) => None,
            None => input.click.and_then(CellCoord::containing),
        };
        PlantingInput::new(input.packet, lawn_click, sun_click)
    }

    fn step(&mut self) {
        let mut events = std::mem::take(&mut self.step_events);
        events.clear();
        world::apply(
            &mut self.world,
            Command::Tick { dt: TICK_DURATION },
            &mut events,
        );

        for round in 0..MAX_SYSTEM_ROUNDS {
            self.record(&events);
            self.run_systems(&events);
            if self.commands.is_empty() {
                break;
            }
            events.clear();
            if round + 1 == MAX_SYSTEM_ROUNDS {
                tracing::warn!(
                    pending = self.commands.len(),
                    "systems did not settle, dropping commands"
                );
                self.commands.clear();
                break;
            }
            for command in self.commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        self.step_events = events;
    }

    fn run_systems(&mut self, events: &[Event]) {
        let progress = query::progress(&self.world);
        self.spawning.handle(
            events,
            progress,
            query::zombies_spawned_in_wave(&self.world),
            &mut self.commands,
        );

        let plants = query::plant_view(&self.world);
        let zombies = query::zombie_view(&self.world);
        self.plant_combat
            .handle(progress.status, &plants, &zombies, &mut self.commands);
        self.sun_production
            .handle(progress.status, &plants, &mut self.commands);
        self.waves.handle(progress, zombies.len(), &mut self.commands);
    }

    fn apply_all<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.record(&events);
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            log_event(event);
        }
        self.frame_events.extend_from_slice(events);
        self.unseen_by_planting.extend_from_slice(events);
    }
}

fn log_event(event: &Event) {
    match event {
        Event::PlantPlaced { kind, cell, .. } => {
            tracing::debug!(
                kind = kind.label(),
                column = cell.column(),
                row = cell.row(),
                "plant placed"
            );
        }
        Event::PlantPlacementRejected { kind, reason, .. } => {
            tracing::debug!(kind = kind.label(), ?reason, "placement rejected");
        }
        Event::ZombieSpawned { row, .. } => tracing::debug!(row, "zombie spawned"),
        Event::ZombieKilled { row, .. } => tracing::debug!(row, "zombie killed"),
        Event::WaveAdvanced { wave } => tracing::info!(wave, "wave advanced"),
        Event::GameWon {
            score,
            waves_completed,
        } => tracing::info!(score, waves_completed, "game won"),
        Event::GameLost {
            score,
            waves_completed,
        } => tracing::info!(score, waves_completed, "game lost"),
        Event::ZombieReachedHouse { row, .. } => tracing::info!(row, "zombie reached the house"),
        _ => {}
    }
}

/// Scripted player for headless runs.
///
/// Picks up every sun, then fills the lawn from the house outwards: a
/// sunflower per lane first, then columns of peashooters.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    plan: Vec<(PlantKind, CellCoord)>,
}

/// Peashooter columns the autopilot fills after the sunflower column.
const AUTOPILOT_PEASHOOTER_COLUMNS: u32 = 4;

impl Autopilot {
    pub(crate) fn new() -> Self {
        let sunflowers = (0..LAWN_ROWS).map(|row| (PlantKind::Sunflower, CellCoord::new(0, row)));
        let peashooters = (1..=AUTOPILOT_PEASHOOTER_COLUMNS).flat_map(|column| {
            (0..LAWN_ROWS).map(move |row| (PlantKind::Peashooter, CellCoord::new(column, row)))
        });
        Self {
            plan: sunflowers.chain(peashooters).collect(),
        }
    }

    /// Chooses this frame's input from the current world state.
    pub(crate) fn decide(&self, world: &World) -> PlayerInput {
        if let Some(sun) = query::sun_view(world).iter().next() {
            return PlayerInput {
                click: Some(sun.position),
                ..PlayerInput::default()
            };
        }

        let balance = query::sun_balance(world);
        let next = self
            .plan
            .iter()
            .find(|(_, cell)| query::plant_at(world, *cell).is_none());
        match next {
            Some(&(kind, cell)) if balance >= kind.cost() => PlayerInput {
                packet: Some(kind),
                click: Some(cell_center(cell)),
                restart: false,
            },
            _ => PlayerInput::default(),
        }
    }
}

fn cell_center(cell: CellCoord) -> LawnPoint {
    let origin = cell.origin();
    LawnPoint::new(origin.x + CELL_LENGTH * 0.5, origin.y + CELL_LENGTH * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_defence_core::{SunAmount, INITIAL_SUN, SUN_REST_HEIGHT};

    fn simulation() -> Simulation {
        Simulation::new(&GameConfig::default())
    }

    #[test]
    fn partial_ticks_carry_over_between_frames() {
        let mut simulation = simulation();

        let _ = simulation.frame(Duration::from_millis(30), PlayerInput::default());
        assert_eq!(query::tick_index(simulation.world()), 0);

        let _ = simulation.frame(Duration::from_millis(30), PlayerInput::default());
        assert_eq!(query::tick_index(simulation.world()), 1);
    }

    #[test]
    fn slow_frames_are_capped() {
        let mut simulation = simulation();

        let _ = simulation.frame(Duration::from_secs(5), PlayerInput::default());

        assert_eq!(
            query::tick_index(simulation.world()),
            u64::from(MAX_TICKS_PER_FRAME)
        );
    }

    #[test]
    fn packet_and_click_in_one_frame_plants() {
        let mut simulation = simulation();
        let input = PlayerInput {
            packet: Some(PlantKind::Sunflower),
            click: Some(LawnPoint::new(100.0, 100.0)),
            restart: false,
        };

        let events = simulation.frame(Duration::ZERO, input).to_vec();

        assert!(events.iter().any(|event| matches!(
            event,
            Event::PlantPlaced { cell, .. } if *cell == CellCoord::new(1, 1)
        )));
        assert_eq!(
            query::sun_balance(simulation.world()),
            INITIAL_SUN.checked_sub(PlantKind::Sunflower.cost()).expect("affordable")
        );
    }

    #[test]
    fn placement_releases_the_packet_on_the_next_frame() {
        let mut simulation = simulation();
        let _ = simulation.frame(
            Duration::ZERO,
            PlayerInput {
                packet: Some(PlantKind::Sunflower),
                click: Some(LawnPoint::new(10.0, 10.0)),
                restart: false,
            },
        );
        assert_eq!(simulation.selected_packet(), Some(PlantKind::Sunflower));

        let _ = simulation.frame(Duration::ZERO, PlayerInput::default());

        assert_eq!(simulation.selected_packet(), None);
    }

    #[test]
    fn fresh_sunflower_drops_sun_on_its_first_tick() {
        let mut simulation = simulation();
        let _ = simulation.frame(
            Duration::ZERO,
            PlayerInput {
                packet: Some(PlantKind::Sunflower),
                click: Some(LawnPoint::new(10.0, 10.0)),
                restart: false,
            },
        );

        let events = simulation.frame(TICK_DURATION, PlayerInput::default()).to_vec();

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::SunProduced { .. })));
    }

    #[test]
    fn clicking_a_sun_collects_it() {
        let mut simulation = simulation();
        let _ = simulation.frame(
            Duration::ZERO,
            PlayerInput {
                packet: Some(PlantKind::Sunflower),
                click: Some(LawnPoint::new(10.0, 10.0)),
                restart: false,
            },
        );
        let _ = simulation.frame(TICK_DURATION, PlayerInput::default());
        let sun = *query::sun_view(simulation.world())
            .iter()
            .next()
            .expect("sun produced");
        let before = query::sun_balance(simulation.world());

        let events = simulation
            .frame(
                Duration::ZERO,
                PlayerInput {
                    click: Some(sun.position),
                    ..PlayerInput::default()
                },
            )
            .to_vec();

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::SunCollected { .. })));
        assert_eq!(
            query::sun_balance(simulation.world()),
            before.saturating_add(SunAmount::new(25))
        );
        assert!(query::plant_at(simulation.world(), CellCoord::new(0, 0)).is_some());
    }

    #[test]
    fn resting_sun_is_collected_from_below_the_lawn() {
        let mut simulation = simulation();
        let _ = simulation.frame(
            Duration::ZERO,
            PlayerInput {
                packet: Some(PlantKind::Sunflower),
                click: Some(LawnPoint::new(10.0, 10.0)),
                restart: false,
            },
        );
        for _ in 0..21 {
            let _ = simulation.frame(TICK_DURATION * 10, PlayerInput::default());
        }
        let sun = *query::sun_view(simulation.world())
            .iter()
            .next()
            .expect("sun produced");
        assert_eq!(sun.position.y, SUN_REST_HEIGHT);

        let events = simulation
            .frame(
                Duration::ZERO,
                PlayerInput {
                    click: Some(LawnPoint::new(sun.position.x, SUN_REST_HEIGHT + 10.0)),
                    ..PlayerInput::default()
                },
            )
            .to_vec();

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::SunCollected { sun: id, .. } if *id == sun.id)));
    }

    #[test]
    fn restart_resets_the_world() {
        let mut simulation = simulation();
        let _ = simulation.frame(Duration::from_millis(200), PlayerInput::default());

        let events = simulation
            .frame(
                Duration::ZERO,
                PlayerInput {
                    restart: true,
                    ..PlayerInput::default()
                },
            )
            .to_vec();

        assert!(events.contains(&Event::GameRestarted));
        assert_eq!(query::tick_index(simulation.world()), 0);
    }

    #[test]
    fn autopilot_collects_suns_before_planting() {
        let mut simulation = simulation();
        let autopilot = Autopilot::new();

        let first = autopilot.decide(simulation.world());
        assert_eq!(first.packet, Some(PlantKind::Sunflower));
        let _ = simulation.frame(TICK_DURATION, first);

        let second = autopilot.decide(simulation.world());
        assert_eq!(second.packet, None);
        assert!(second.click.is_some());
    }

    #[test]
    fn outcome_is_read_from_terminal_events() {
        let events = [
            Event::WaveAdvanced { wave: 6 },
            Event::GameWon {
                score: 1_500,
                waves_completed: 5,
            },
        ];

        assert_eq!(
            Outcome::from_events(&events),
            Some(Outcome {
                status: GameStatus::Won,
                score: 1_500,
                waves_completed: 5,
            })
        );
        assert_eq!(Outcome::from_events(&events[..1]), None);
    }
}
