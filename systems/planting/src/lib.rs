#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planting system responsible for seed-packet selection, plant placement and sun pickup.

use garden_defence_core::{CellCoord, Command, Event, GameStatus, PlantKind, ProgressSnapshot, SunId};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlantingInput {
    /// Seed packet the player picked on this frame.
    pub packet: Option<PlantKind>,
    /// Lawn cell the player clicked on this frame, when no sun was under the cursor.
    pub lawn_click: Option<CellCoord>,
    /// Sun token the player clicked on this frame.
    pub sun_click: Option<SunId>,
}

impl PlantingInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        packet: Option<PlantKind>,
        lawn_click: Option<CellCoord>,
        sun_click: Option<SunId>,
    ) -> Self {
        Self {
            packet,
            lawn_click,
            sun_click,
        }
    }
}

/// Planting system that translates packet selection + clicks into world commands.
#[derive(Clone, Debug, Default)]
pub struct Planting {
    selected: Option<PlantKind>,
}

impl Planting {
    /// Creates a new planting system with no packet selected.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Seed packet currently held by the player.
    #[must_use]
    pub const fn selected(&self) -> Option<PlantKind> {
        self.selected
    }

    /// Consumes world events and adapter-derived input to emit planting commands.
    ///
    /// The held packet is released once the world confirms a placement, so
    /// every purchase takes a fresh packet pick. Packets the balance cannot
    /// cover are not picked up.
    pub fn handle(
        &mut self,
        events: &[Event],
        progress: ProgressSnapshot,
        input: PlantingInput,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if matches!(event, Event::PlantPlaced { .. } | Event::GameRestarted) {
                self.selected = None;
            }
        }

        if progress.status != GameStatus::Playing {
            self.selected = None;
            return;
        }

        if let Some(kind) = input.packet {
            if progress.sun >= kind.cost() {
                self.selected = Some(kind);
            }
        }

        if let Some(sun) = input.sun_click {
            out.push(Command::CollectSun { sun });
            return;
        }

        if let (Some(kind), Some(cell)) = (self.selected, input.lawn_click) {
            out.push(Command::PlacePlant { kind, cell });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_defence_core::{SunAmount, INITIAL_SUN};

    fn progress(sun: u32) -> ProgressSnapshot {
        ProgressSnapshot {
            status: GameStatus::Playing,
            sun: SunAmount::new(sun),
            score: 0,
            wave: 1,
            kills: 0,
            quota: 10,
        }
    }

    #[test]
    fn unaffordable_packet_is_not_picked_up() {
        let mut planting = Planting::new();
        let mut out = Vec::new();

        planting.handle(
            &[],
            progress(75),
            PlantingInput::new(Some(PlantKind::Peashooter), None, None),
            &mut out,
        );

        assert_eq!(planting.selected(), None);
        assert!(out.is_empty());
    }

    #[test]
    fn click_without_packet_is_ignored() {
        let mut planting = Planting::new();
        let mut out = Vec::new();

        planting.handle(
            &[],
            progress(INITIAL_SUN.get()),
            PlantingInput::new(None, Some(CellCoord::new(0, 0)), None),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn sun_click_takes_priority_over_planting() {
        let mut planting = Planting::new();
        let mut out = Vec::new();

        planting.handle(
            &[],
            progress(150),
            PlantingInput::new(
                Some(PlantKind::Sunflower),
                Some(CellCoord::new(2, 2)),
                Some(SunId::new(5)),
            ),
            &mut out,
        );

        assert_eq!(out, vec![Command::CollectSun { sun: SunId::new(5) }]);
        assert_eq!(planting.selected(), Some(PlantKind::Sunflower));
    }

    #[test]
    fn finished_game_drops_selection() {
        let mut planting = Planting::new();
        let mut out = Vec::new();
        planting.handle(
            &[],
            progress(150),
            PlantingInput::new(Some(PlantKind::Sunflower), None, None),
            &mut out,
        );

        let mut over = progress(150);
        over.status = GameStatus::Lost;
        planting.handle(
            &[],
            over,
            PlantingInput::new(None, Some(CellCoord::new(1, 1)), None),
            &mut out,
        );

        assert_eq!(planting.selected(), None);
        assert!(out.is_empty());
    }
}
