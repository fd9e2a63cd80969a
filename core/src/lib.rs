#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Garden Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Garden Defence.";

/// Number of lanes on the lawn.
pub const LAWN_ROWS: u32 = 5;
/// Number of planting columns in each lane.
pub const LAWN_COLUMNS: u32 = 9;
/// Side length of a single lawn cell expressed in world units.
pub const CELL_LENGTH: f32 = 80.0;

/// Simulated time covered by a single fixed simulation step.
pub const TICK_DURATION: Duration = Duration::from_millis(50);

/// Sun balance granted at the start of every game.
pub const INITIAL_SUN: SunAmount = SunAmount::new(150);
/// Sun granted for every collected sun token.
pub const SUN_TOKEN_VALUE: SunAmount = SunAmount::new(25);
/// Horizontal offset of a produced sun relative to its sunflower's cell.
pub const SUN_SPAWN_OFFSET_X: f32 = 20.0;
/// Distance a falling sun drops per tick.
pub const SUN_FALL_PER_TICK: f32 = 2.0;
/// Height at which falling suns come to rest: the bottom edge of the lawn.
pub const SUN_REST_HEIGHT: f32 = lawn_height();
/// Radius around a sun's anchor that counts as a click on the sun.
pub const SUN_PICK_RADIUS: f32 = 20.0;

/// Distance a pea travels per tick.
pub const PEA_SPEED_PER_TICK: f32 = 5.0;
/// Health removed from a zombie by a single pea.
pub const PEA_DAMAGE: i32 = 20;
/// Maximum horizontal distance between a pea and a zombie that counts as a hit.
pub const PEA_HIT_DISTANCE: f32 = 30.0;

/// Health assigned to freshly spawned zombies.
pub const ZOMBIE_HEALTH: i32 = 100;
/// Distance a zombie walks per tick.
pub const ZOMBIE_SPEED_PER_TICK: f32 = 0.5;
/// Distance from the right edge of the lawn at which zombies appear.
pub const ZOMBIE_SPAWN_INSET: f32 = 20.0;

/// Score awarded for every zombie killed.
pub const KILL_SCORE: u32 = 10;
/// Kills required per wave number; wave `n` requires `n * KILLS_PER_WAVE` kills.
pub const KILLS_PER_WAVE: u32 = 10;
/// Wave whose completion wins the game by default.
pub const DEFAULT_FINAL_WAVE: u32 = 5;

/// Total width of the lawn measured in world units.
#[must_use]
pub const fn lawn_width() -> f32 {
    LAWN_COLUMNS as f32 * CELL_LENGTH
}

/// Total height of the lawn measured in world units.
#[must_use]
pub const fn lawn_height() -> f32 {
    LAWN_ROWS as f32 * CELL_LENGTH
}

/// Number of kills required to clear the provided wave.
#[must_use]
pub const fn wave_quota(wave: u32) -> u32 {
    wave.saturating_mul(KILLS_PER_WAVE)
}

/// Describes whether the game is still being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Zombies advance, plants act and the player may plant.
    Playing,
    /// The final wave was cleared.
    Won,
    /// A zombie reached the house.
    Lost,
}

impl GameStatus {
    /// Reports whether the game has finished, either way.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one fixed step covering `dt`.
    Tick {
        /// Duration of simulated time covered by the step.
        dt: Duration,
    },
    /// Requests that a plant be bought and placed into a lawn cell.
    PlacePlant {
        /// Type of plant to place.
        kind: PlantKind,
        /// Cell that should host the plant.
        cell: CellCoord,
    },
    /// Requests that a sun token be collected into the player's balance.
    CollectSun {
        /// Identifier of the sun token to collect.
        sun: SunId,
    },
    /// Requests that a zombie enter the provided lane.
    SpawnZombie {
        /// Zero-based lane index.
        row: u32,
    },
    /// Requests that a peashooter launch a pea down its lane.
    FirePea {
        /// Identifier of the firing peashooter.
        plant: PlantId,
    },
    /// Requests that a sunflower produce a sun token.
    ProduceSun {
        /// Identifier of the producing sunflower.
        plant: PlantId,
    },
    /// Requests that the world move on to the next wave.
    AdvanceWave,
    /// Requests that the world mark the game as won.
    DeclareVictory,
    /// Requests that the world discard the current game and start a fresh one.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a plant was bought and placed.
    PlantPlaced {
        /// Identifier assigned to the plant.
        plant: PlantId,
        /// Type of plant placed.
        kind: PlantKind,
        /// Cell hosting the plant.
        cell: CellCoord,
        /// Sun deducted from the balance.
        cost: SunAmount,
    },
    /// Reports that a placement request was rejected.
    PlantPlacementRejected {
        /// Type of plant requested.
        kind: PlantKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a sunflower produced a sun token.
    SunProduced {
        /// Identifier assigned to the sun token.
        sun: SunId,
        /// Sunflower that produced the token.
        plant: PlantId,
    },
    /// Confirms that a sun token was collected.
    SunCollected {
        /// Identifier of the collected token.
        sun: SunId,
        /// Amount credited to the balance.
        amount: SunAmount,
    },
    /// Reports that a collection request referenced an unknown sun token.
    SunCollectionRejected {
        /// Identifier provided in the request.
        sun: SunId,
    },
    /// Confirms that a zombie entered the lawn.
    ZombieSpawned {
        /// Identifier assigned to the zombie.
        zombie: ZombieId,
        /// Lane the zombie walks down.
        row: u32,
    },
    /// Confirms that a peashooter fired.
    PeaFired {
        /// Identifier assigned to the pea.
        pea: PeaId,
        /// Peashooter that fired.
        plant: PlantId,
        /// Lane the pea travels down.
        row: u32,
    },
    /// Reports that a pea struck a zombie.
    ZombieHit {
        /// Zombie that was struck.
        zombie: ZombieId,
        /// Pea consumed by the hit.
        pea: PeaId,
        /// Health left after the hit, possibly negative.
        remaining_health: i32,
    },
    /// Reports that a zombie was destroyed.
    ZombieKilled {
        /// Identifier of the destroyed zombie.
        zombie: ZombieId,
        /// Lane the zombie occupied.
        row: u32,
    },
    /// Reports that a pea left the lawn without hitting anything.
    PeaExpired {
        /// Identifier of the expired pea.
        pea: PeaId,
    },
    /// Reports that a zombie walked into the house.
    ZombieReachedHouse {
        /// Identifier of the zombie.
        zombie: ZombieId,
        /// Lane the zombie came down.
        row: u32,
    },
    /// Announces that the game was lost.
    GameLost {
        /// Final score.
        score: u32,
        /// Waves cleared before the loss.
        waves_completed: u32,
    },
    /// Announces that a new wave began.
    WaveAdvanced {
        /// Number of the wave that is now active.
        wave: u32,
    },
    /// Announces that the game was won.
    GameWon {
        /// Final score.
        score: u32,
        /// Waves cleared.
        waves_completed: u32,
    },
    /// Announces that the world was reset to a fresh game.
    GameRestarted,
}

/// Plants available from the seed packets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantKind {
    /// Produces sun tokens on a slow cadence.
    Sunflower,
    /// Fires peas at zombies walking down its lane.
    Peashooter,
}

impl PlantKind {
    /// Every plant kind in seed-packet order.
    pub const ALL: [PlantKind; 2] = [PlantKind::Sunflower, PlantKind::Peashooter];

    /// Sun required to place the plant.
    #[must_use]
    pub const fn cost(self) -> SunAmount {
        match self {
            Self::Sunflower => SunAmount::new(50),
            Self::Peashooter => SunAmount::new(100),
        }
    }

    /// Ticks the plant waits after acting before it may act again.
    #[must_use]
    pub const fn reload_ticks(self) -> u32 {
        match self {
            Self::Sunflower => 300,
            Self::Peashooter => 30,
        }
    }

    /// Human-readable label shown on seed packets.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunflower => "Sunflower",
            Self::Peashooter => "Peashooter",
        }
    }
}

/// Amount of the sun currency.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SunAmount(u32);

impl SunAmount {
    /// A zero balance.
    pub const ZERO: SunAmount = SunAmount(0);

    /// Creates a new amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds two amounts, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: SunAmount) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `other`, returning `None` when the balance would go negative.
    #[must_use]
    pub const fn checked_sub(self, other: SunAmount) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

/// Unique identifier assigned to a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlantId(u32);

impl PlantId {
    /// Creates a new plant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a zombie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pea.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeaId(u32);

impl PeaId {
    /// Creates a new pea identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a sun token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SunId(u32);

impl SunId {
    /// Creates a new sun identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single lawn cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new lawn cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row (lane) index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the cell lies on the lawn.
    #[must_use]
    pub const fn is_on_lawn(&self) -> bool {
        self.column < LAWN_COLUMNS && self.row < LAWN_ROWS
    }

    /// Resolves the lawn cell containing the provided world-space point.
    #[must_use]
    pub fn containing(point: LawnPoint) -> Option<Self> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let cell = Self::new(
            (point.x / CELL_LENGTH) as u32,
            (point.y / CELL_LENGTH) as u32,
        );
        cell.is_on_lawn().then_some(cell)
    }

    /// World-space point at the upper-left corner of the cell.
    #[must_use]
    pub fn origin(&self) -> LawnPoint {
        LawnPoint::new(
            self.column as f32 * CELL_LENGTH,
            self.row as f32 * CELL_LENGTH,
        )
    }
}

/// Point on the lawn expressed in world units, origin at the upper-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LawnPoint {
    /// Horizontal distance from the house side of the lawn.
    pub x: f32,
    /// Vertical distance from the top lane edge.
    pub y: f32,
}

impl LawnPoint {
    /// Creates a new lawn point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Reasons a plant placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The game has ended, so planting is disabled.
    GameOver,
    /// The requested cell lies outside the lawn.
    OutOfBounds,
    /// The requested cell already hosts a plant.
    Occupied,
    /// The balance cannot cover the plant's cost.
    InsufficientSun,
}

/// Economy and wave progress of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Whether the game is running, won or lost.
    pub status: GameStatus,
    /// Sun available for planting.
    pub sun: SunAmount,
    /// Score accumulated from kills.
    pub score: u32,
    /// Number of the active wave.
    pub wave: u32,
    /// Kills recorded during the active wave.
    pub kills: u32,
    /// Kills required to clear the active wave.
    pub quota: u32,
}

/// Immutable representation of a single plant's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlantSnapshot {
    /// Identifier allocated to the plant by the world.
    pub id: PlantId,
    /// Kind of plant.
    pub kind: PlantKind,
    /// Cell hosting the plant.
    pub cell: CellCoord,
    /// Ticks remaining before the plant may act again.
    pub cooldown_ticks: u32,
}

impl PlantSnapshot {
    /// Reports whether the plant may act on this tick.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown_ticks == 0
    }
}

/// Immutable representation of a single zombie's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Identifier allocated to the zombie by the world.
    pub id: ZombieId,
    /// Lane the zombie walks down.
    pub row: u32,
    /// Horizontal position of the zombie's left edge.
    pub x: f32,
    /// Remaining health.
    pub health: i32,
    /// Distance walked per tick.
    pub speed: f32,
}

/// Immutable representation of a single pea's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeaSnapshot {
    /// Identifier allocated to the pea by the world.
    pub id: PeaId,
    /// Lane the pea travels down.
    pub row: u32,
    /// Horizontal position of the pea.
    pub x: f32,
}

/// Immutable representation of a single sun token used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunSnapshot {
    /// Identifier allocated to the token by the world.
    pub id: SunId,
    /// Anchor position of the token.
    pub position: LawnPoint,
    /// Whether the token is still dropping toward its rest height.
    pub falling: bool,
}

/// Read-only snapshot describing all plants on the lawn.
#[derive(Clone, Debug, Default)]
pub struct PlantView {
    snapshots: Vec<PlantSnapshot>,
}

impl PlantView {
    /// Creates a new plant view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PlantSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PlantSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured plants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the lawn holds no plants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PlantSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all zombies on the lawn.
#[derive(Clone, Debug, Default)]
pub struct ZombieView {
    snapshots: Vec<ZombieSnapshot>,
}

impl ZombieView {
    /// Creates a new zombie view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ZombieSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether any captured zombie walks down the provided lane.
    #[must_use]
    pub fn occupies_row(&self, row: u32) -> bool {
        self.snapshots.iter().any(|snapshot| snapshot.row == row)
    }

    /// Number of captured zombies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the lawn holds no zombies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ZombieSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all peas in flight.
#[derive(Clone, Debug, Default)]
pub struct PeaView {
    snapshots: Vec<PeaSnapshot>,
}

impl PeaView {
    /// Creates a new pea view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PeaSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PeaSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PeaSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all uncollected sun tokens.
#[derive(Clone, Debug, Default)]
pub struct SunView {
    snapshots: Vec<SunSnapshot>,
}

impl SunView {
    /// Creates a new sun view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SunSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &SunSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SunSnapshot> {
        self.snapshots
    }
}
