//! Pea flight and collision resolution.

use garden_defence_core::{
    lawn_width, Event, PeaId, ZombieId, PEA_DAMAGE, PEA_HIT_DISTANCE, PEA_SPEED_PER_TICK,
};

#[derive(Clone, Debug)]
pub(crate) struct Pea {
    pub(crate) id: PeaId,
    pub(crate) row: u32,
    pub(crate) x: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Zombie {
    pub(crate) id: ZombieId,
    pub(crate) row: u32,
    pub(crate) x: f32,
    pub(crate) health: i32,
    pub(crate) speed: f32,
}

/// Moves every pea down its lane and drops the ones that left the lawn.
pub(crate) fn advance_peas(peas: &mut Vec<Pea>, out_events: &mut Vec<Event>) {
    let edge = lawn_width();
    peas.retain_mut(|pea| {
        pea.x += PEA_SPEED_PER_TICK;
        if pea.x < edge {
            true
        } else {
            out_events.push(Event::PeaExpired { pea: pea.id });
            false
        }
    });
}

/// Applies pea hits to zombies and removes destroyed zombies.
///
/// Peas are processed in identifier order. Each pea strikes at most one
/// zombie: the lowest-identifier zombie in its lane within hit distance.
/// A zombie destroyed by one pea is gone before the next pea is examined.
/// Returns the number of zombies destroyed.
pub(crate) fn resolve_hits(
    peas: &mut Vec<Pea>,
    zombies: &mut Vec<Zombie>,
    out_events: &mut Vec<Event>,
) -> u32 {
    let mut kills = 0;
    peas.retain(|pea| {
        let Some(index) = zombies.iter().position(|zombie| {
            zombie.row == pea.row && (zombie.x - pea.x).abs() < PEA_HIT_DISTANCE
        }) else {
            return true;
        };

        let zombie = &mut zombies[index];
        zombie.health -= PEA_DAMAGE;
        out_events.push(Event::ZombieHit {
            zombie: zombie.id,
            pea: pea.id,
            remaining_health: zombie.health,
        });

        if zombie.health <= 0 {
            let destroyed = zombies.remove(index);
            out_events.push(Event::ZombieKilled {
                zombie: destroyed.id,
                row: destroyed.row,
            });
            kills += 1;
        }
        false
    });
    kills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zombie(id: u32, row: u32, x: f32, health: i32) -> Zombie {
        Zombie {
            id: ZombieId::new(id),
            row,
            x,
            health,
            speed: 0.5,
        }
    }

    fn pea(id: u32, row: u32, x: f32) -> Pea {
        Pea {
            id: PeaId::new(id),
            row,
            x,
        }
    }

    #[test]
    fn peas_expire_at_lawn_edge() {
        let mut peas = vec![pea(0, 0, 714.0), pea(1, 0, 716.0)];
        let mut events = Vec::new();

        advance_peas(&mut peas, &mut events);

        assert_eq!(peas.len(), 1);
        assert_eq!(peas[0].id, PeaId::new(0));
        assert_eq!(events, vec![Event::PeaExpired { pea: PeaId::new(1) }]);
    }

    #[test]
    fn pea_strikes_only_one_zombie() {
        let mut peas = vec![pea(0, 1, 300.0)];
        let mut zombies = vec![zombie(0, 1, 310.0, 100), zombie(1, 1, 305.0, 100)];
        let mut events = Vec::new();

        let kills = resolve_hits(&mut peas, &mut zombies, &mut events);

        assert_eq!(kills, 0);
        assert!(peas.is_empty());
        assert_eq!(zombies[0].health, 80);
        assert_eq!(zombies[1].health, 100);
    }

    #[test]
    fn peas_ignore_other_lanes_and_distant_zombies() {
        let mut peas = vec![pea(0, 0, 300.0), pea(1, 1, 100.0)];
        let mut zombies = vec![zombie(0, 1, 300.0, 100)];
        let mut events = Vec::new();

        let kills = resolve_hits(&mut peas, &mut zombies, &mut events);

        assert_eq!(kills, 0);
        assert_eq!(peas.len(), 2);
        assert!(events.is_empty());
    }

    #[test]
    fn destroyed_zombie_is_not_hit_twice() {
        let mut peas = vec![pea(0, 2, 500.0), pea(1, 2, 502.0)];
        let mut zombies = vec![zombie(4, 2, 510.0, 20)];
        let mut events = Vec::new();

        let kills = resolve_hits(&mut peas, &mut zombies, &mut events);

        assert_eq!(kills, 1);
        assert!(zombies.is_empty());
        assert_eq!(peas.len(), 1, "second pea keeps flying");
        assert!(events.contains(&Event::ZombieKilled {
            zombie: ZombieId::new(4),
            row: 2,
        }));
    }
}
