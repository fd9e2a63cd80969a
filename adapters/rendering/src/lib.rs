#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Garden Defence adapters.

use anyhow::Result as AnyResult;
use garden_defence_core::{
    CellCoord, GameStatus, LawnPoint, PlantId, PlantKind, SunAmount, SunId, ZombieId,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let lift = |channel: f32| channel + (1.0 - channel) * amount;

        Self {
            red: lift(self.red),
            green: lift(self.green),
            blue: lift(self.blue),
            alpha: self.alpha,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in lawn world units, when the cursor hovers the lawn
    /// or the sun pick-up margin around it.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the primary button was pressed on the lawn this frame.
    pub lawn_click: bool,
    /// Seed packet picked this frame via the packet bar or a shortcut.
    pub packet: Option<PlantKind>,
    /// Whether the player asked for a fresh game this frame.
    pub restart: bool,
}

/// Describes the lawn grid that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LawnPresentation {
    /// Number of planting columns.
    pub columns: u32,
    /// Number of lanes.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Grass color used for even cells; odd cells use a lightened shade.
    pub grass: Color,
}

impl LawnPresentation {
    /// Creates a new lawn descriptor.
    ///
    /// Returns an error when `cell_length` is not positive.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_length: f32,
        grass: Color,
    ) -> Result<Self, RenderingError> {
        if cell_length <= 0.0 || !cell_length.is_finite() {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
            grass,
        })
    }

    /// Calculates the total width of the lawn.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Calculates the total height of the lawn.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Resolves the cell under a world-space position, if the position lies on the lawn.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let column = (position.x / self.cell_length) as u32;
        let row = (position.y / self.cell_length) as u32;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }
}

/// Plant drawn inside its lawn cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePlant {
    /// Identifier allocated to the plant by the world.
    pub id: PlantId,
    /// Kind of plant.
    pub kind: PlantKind,
    /// Cell hosting the plant.
    pub cell: CellCoord,
}

/// Zombie drawn at its lane position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneZombie {
    /// Identifier allocated to the zombie by the world.
    pub id: ZombieId,
    /// Upper-left corner of the zombie's cell-sized footprint in world units.
    pub position: Vec2,
    /// Remaining health as a fraction of full health, in 0.0..=1.0.
    pub health_fraction: f32,
}

/// Pea in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePea {
    /// Center of the pea in world units.
    pub position: Vec2,
}

/// Uncollected sun token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSun {
    /// Identifier allocated to the token by the world.
    pub id: SunId,
    /// Anchor of the token in world units.
    pub position: Vec2,
}

/// Seed packet shown in the packet bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedPacket {
    /// Plant the packet buys.
    pub kind: PlantKind,
    /// Price of the plant.
    pub cost: SunAmount,
    /// Whether the current balance covers the price.
    pub affordable: bool,
    /// Whether the player currently holds this packet.
    pub selected: bool,
}

/// Counters shown in the heads-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Sun available for planting.
    pub sun: u32,
    /// Score accumulated from kills.
    pub score: u32,
    /// Active wave.
    pub wave: u32,
    /// Kills recorded during the active wave.
    pub kills: u32,
    /// Kills required to clear the active wave.
    pub quota: u32,
}

/// End-of-game overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutcomePresentation {
    /// Final status, either won or lost.
    pub status: GameStatus,
    /// Final score.
    pub score: u32,
    /// Waves cleared.
    pub waves_completed: u32,
}

impl OutcomePresentation {
    /// Headline drawn on the overlay.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self.status {
            GameStatus::Won => "Victory!",
            GameStatus::Lost | GameStatus::Playing => "The zombies ate your brains!",
        }
    }
}

/// Scene description combining the lawn and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Lawn that composes the play area.
    pub lawn: LawnPresentation,
    /// Plants currently on the lawn.
    pub plants: Vec<ScenePlant>,
    /// Zombies currently on the lawn.
    pub zombies: Vec<SceneZombie>,
    /// Peas in flight.
    pub peas: Vec<ScenePea>,
    /// Uncollected sun tokens.
    pub suns: Vec<SceneSun>,
    /// Packet bar content in display order.
    pub packets: Vec<SeedPacket>,
    /// Heads-up display counters.
    pub hud: HudPresentation,
    /// Overlay shown once the game has ended.
    pub outcome: Option<OutcomePresentation>,
    /// Short status line, e.g. the account the score will be saved to.
    pub status_line: Option<String>,
}

impl Scene {
    /// Creates an empty scene over the provided lawn.
    #[must_use]
    pub fn new(lawn: LawnPresentation) -> Self {
        Self {
            lawn,
            plants: Vec::new(),
            zombies: Vec::new(),
            peas: Vec::new(),
            suns: Vec::new(),
            packets: Vec::new(),
            hud: HudPresentation::default(),
            outcome: None,
            status_line: None,
        }
    }
}

/// Converts a lawn point into a rendering vector.
#[must_use]
pub fn to_vec2(point: LawnPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Converts a rendering vector into a lawn point.
#[must_use]
pub fn to_lawn_point(position: Vec2) -> LawnPoint {
    LawnPoint::new(position.x, position.y)
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Garden Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be positive and finite.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be positive (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lawn() -> LawnPresentation {
        LawnPresentation::new(9, 5, 80.0, Color::from_rgb_u8(0x4c, 0xaf, 0x50))
            .expect("valid lawn")
    }

    #[test]
    fn lawn_creation_rejects_non_positive_cell_length() {
        let error = LawnPresentation::new(9, 5, 0.0, Color::from_rgb_u8(0, 0, 0))
            .expect_err("zero cell length must be rejected");

        assert_eq!(error, RenderingError::InvalidCellLength { cell_length: 0.0 });
    }

    #[test]
    fn lawn_dimensions_follow_cell_length() {
        let lawn = lawn();
        assert_eq!(lawn.width(), 720.0);
        assert_eq!(lawn.height(), 400.0);
    }

    #[test]
    fn cell_at_resolves_positions_inside_lawn() {
        let lawn = lawn();
        assert_eq!(lawn.cell_at(Vec2::new(161.0, 79.0)), Some(CellCoord::new(2, 0)));
        assert_eq!(lawn.cell_at(Vec2::new(-0.5, 10.0)), None);
        assert_eq!(lawn.cell_at(Vec2::new(10.0, 400.0)), None);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(0.5);
        assert!((color.red - 0.5).abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn outcome_headline_reflects_status() {
        let won = OutcomePresentation {
            status: GameStatus::Won,
            score: 10,
            waves_completed: 5,
        };
        assert_eq!(won.headline(), "Victory!");
    }
}
