use garden_defence_core::{CellCoord, Command, Event, PlantKind, SunAmount, TICK_DURATION};
use garden_defence_system_sun_production::SunProduction;
use garden_defence_world::{self as world, query, World};

fn step(world: &mut World, system: &SunProduction) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: TICK_DURATION }, &mut events);

    let mut commands = Vec::new();
    system.handle(query::status(world), &query::plant_view(world), &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn produced(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::SunProduced { .. }))
        .count()
}

#[test]
fn fresh_sunflower_produces_on_first_tick_then_waits_for_reload() {
    let mut world = World::new();
    let system = SunProduction::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlacePlant {
            kind: PlantKind::Sunflower,
            cell: CellCoord::new(0, 0),
        },
        &mut events,
    );

    assert_eq!(produced(&step(&mut world, &system)), 1);

    let mut total = 0;
    for _ in 0..299 {
        total += produced(&step(&mut world, &system));
    }
    assert_eq!(total, 0, "sunflower is still reloading");

    assert_eq!(produced(&step(&mut world, &system)), 1);
    assert_eq!(query::sun_view(&world).into_vec().len(), 2);
}

#[test]
fn peashooters_never_produce_sun() {
    let mut world = World::new();
    let system = SunProduction::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlacePlant {
            kind: PlantKind::Peashooter,
            cell: CellCoord::new(3, 3),
        },
        &mut events,
    );

    for _ in 0..10 {
        assert_eq!(produced(&step(&mut world, &system)), 0);
    }
    assert_eq!(query::sun_balance(&world), SunAmount::new(50));
}
