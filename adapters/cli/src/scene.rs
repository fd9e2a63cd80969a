//! Projection of the world onto the rendering scene.

use anyhow::Result;
use garden_defence_core::{
    GameStatus, PlantKind, CELL_LENGTH, LAWN_COLUMNS, LAWN_ROWS, ZOMBIE_HEALTH,
};
use garden_defence_rendering::{
    to_vec2, Color, HudPresentation, LawnPresentation, OutcomePresentation, Scene, ScenePea,
    ScenePlant, SceneSun, SceneZombie, SeedPacket,
};
use garden_defence_world::{query, World};
use glam::Vec2;

/// Describes the lawn as drawn by rendering backends.
pub(crate) fn lawn_presentation() -> Result<LawnPresentation> {
    Ok(LawnPresentation::new(
        LAWN_COLUMNS,
        LAWN_ROWS,
        CELL_LENGTH,
        Color::from_rgb_u8(0x4c, 0xaf, 0x50),
    )?)
}

/// Rebuilds every dynamic part of `scene` from the world.
pub(crate) fn refresh(scene: &mut Scene, world: &World, selected: Option<PlantKind>) {
    let progress = query::progress(world);

    scene.plants.clear();
    scene.plants.extend(query::plant_view(world).iter().map(|plant| ScenePlant {
        id: plant.id,
        kind: plant.kind,
        cell: plant.cell,
    }));

    scene.zombies.clear();
    scene
        .zombies
        .extend(query::zombie_view(world).iter().map(|zombie| SceneZombie {
            id: zombie.id,
            position: Vec2::new(zombie.x, zombie.row as f32 * CELL_LENGTH),
            health_fraction: (zombie.health as f32 / ZOMBIE_HEALTH as f32).clamp(0.0, 1.0),
        }));

    scene.peas.clear();
    scene.peas.extend(query::pea_view(world).iter().map(|pea| ScenePea {
        position: Vec2::new(pea.x, (pea.row as f32 + 0.5) * CELL_LENGTH),
    }));

    scene.suns.clear();
    scene.suns.extend(query::sun_view(world).iter().map(|sun| SceneSun {
        id: sun.id,
        position: to_vec2(sun.position),
    }));

    scene.packets.clear();
    scene.packets.extend(PlantKind::ALL.iter().map(|kind| SeedPacket {
        kind: *kind,
        cost: kind.cost(),
        affordable: progress.sun >= kind.cost(),
        selected: selected == Some(*kind),
    }));

    scene.hud = HudPresentation {
        sun: progress.sun.get(),
        score: progress.score,
        wave: progress.wave,
        kills: progress.kills,
        quota: progress.quota,
    };

    scene.outcome = match progress.status {
        GameStatus::Playing => None,
        status => Some(OutcomePresentation {
            status,
            score: progress.score,
            waves_completed: progress.wave.saturating_sub(1),
        }),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_defence_core::{lawn_height, lawn_width, CellCoord, Command};
    use garden_defence_world as world;

    fn scene() -> Scene {
        Scene::new(lawn_presentation().expect("lawn"))
    }

    #[test]
    fn lawn_matches_world_dimensions() {
        let lawn = lawn_presentation().expect("lawn");

        assert_eq!(lawn.width(), lawn_width());
        assert_eq!(lawn.height(), lawn_height());
    }

    #[test]
    fn entities_are_projected_into_lanes() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Peashooter,
                cell: CellCoord::new(2, 3),
            },
            &mut events,
        );
        world::apply(&mut world, Command::SpawnZombie { row: 3 }, &mut events);
        let mut scene = scene();

        refresh(&mut scene, &world, None);

        assert_eq!(scene.plants.len(), 1);
        assert_eq!(scene.plants[0].cell, CellCoord::new(2, 3));
        assert_eq!(scene.zombies.len(), 1);
        assert_eq!(scene.zombies[0].position.y, 240.0);
        assert_eq!(scene.zombies[0].health_fraction, 1.0);
        assert!(scene.outcome.is_none());
    }

    #[test]
    fn packets_reflect_balance_and_selection() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(0, 1),
            },
            &mut events,
        );
        let mut scene = scene();

        refresh(&mut scene, &world, Some(PlantKind::Sunflower));

        assert_eq!(scene.hud.sun, 50);
        let sunflower = scene.packets[0];
        let peashooter = scene.packets[1];
        assert_eq!(sunflower.kind, PlantKind::Sunflower);
        assert!(sunflower.affordable && sunflower.selected);
        assert!(!peashooter.affordable && !peashooter.selected);
    }
}
