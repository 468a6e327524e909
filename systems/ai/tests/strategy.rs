use bomb_arena_bonus::NoBonus;
use bomb_arena_core::{
    CellCoord, CharacterId, Command, Controller, Event, GameConfig, LevelLayout, Terrain,
    TextureId, TileSpec,
};
use bomb_arena_system_ai::Ai;
use bomb_arena_world::{self as world, query, World};

fn world(rows: &[&str], spawns: &[(u32, u32, Controller)]) -> World {
    let mut config = GameConfig::default();
    config.character.speed = 32;
    let mut world = World::with_bonus_policy(config, Box::new(NoBonus)).expect("world");

    let tiles = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|symbol| {
                    let terrain = if symbol == '#' {
                        Terrain::Unbreakable
                    } else {
                        Terrain::Empty
                    };
                    TileSpec::new(terrain, TextureId::new(0))
                })
                .collect()
        })
        .collect();
    let layout = LevelLayout::from_rows(tiles).expect("layout");
    let mut events = Vec::new();
    world::apply(&mut world, Command::LoadLevel { layout }, &mut events).expect("load");
    for (index, (column, row, controller)) in spawns.iter().enumerate() {
        world::apply(
            &mut world,
            Command::SpawnPlayer {
                name: format!("bot-{index}"),
                cell: CellCoord::new(*column, *row),
                controller: *controller,
            },
            &mut events,
        )
        .expect("spawn");
    }
    world
}

fn plan(ai: &mut Ai, world: &World) -> Vec<Command> {
    let characters = query::character_view(world);
    let level = query::level_view(world).expect("level");
    let coordinates = query::coordinates(world).expect("coordinates");
    let mut commands = Vec::new();
    ai.handle(&characters, &level, coordinates, &mut commands);
    commands
}

fn advance(ai: &mut Ai, world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    for command in plan(ai, world) {
        world::apply(world, command, &mut events).expect("move");
    }
    world::apply(world, Command::Tick, &mut events).expect("tick");
    events
}

fn cell(world: &World, id: CharacterId) -> CellCoord {
    query::character_view(world).get(id).expect("character").cell
}

#[test]
fn lone_ai_moves_one_cell_every_tick() {
    let bot = CharacterId::new(0);
    for seed in [0_u64, 3, 17, 4242] {
        let mut world = world(
            &[".....", ".#.#.", ".....", ".#.#.", "....."],
            &[(2, 2, Controller::Ai)],
        );
        let mut ai = Ai::new(seed);

        for _ in 0..50 {
            let before = cell(&world, bot);
            let events = advance(&mut ai, &mut world);
            let after = cell(&world, bot);

            let moved = events
                .iter()
                .filter(|event| matches!(event, Event::CharacterMoved { .. }))
                .count();
            assert_eq!(moved, 1, "seed {seed}: exactly one move per tick");
            assert!(!events
                .iter()
                .any(|event| matches!(event, Event::MoveRejected { .. })));
            let distance = before.column().abs_diff(after.column())
                + before.row().abs_diff(after.row());
            assert_eq!(distance, 1, "seed {seed}: {before:?} -> {after:?}");
        }
    }
}

#[test]
fn boxed_in_ai_stays_put() {
    let mut world = world(&["###", "#.#", "###"], &[(1, 1, Controller::Ai)]);
    let mut ai = Ai::new(7);

    for _ in 0..10 {
        assert!(plan(&mut ai, &world).is_empty());
        let _ = advance(&mut ai, &mut world);
    }
    assert_eq!(cell(&world, CharacterId::new(0)), CellCoord::new(1, 1));
}

#[test]
fn ai_closes_in_on_the_nearest_opponent() {
    let hunter = CharacterId::new(0);
    let mut world = world(
        &["......", "......", "......"],
        &[
            (0, 0, Controller::Ai),
            (3, 2, Controller::Human),
            (5, 0, Controller::Human),
        ],
    );
    let mut ai = Ai::new(1);

    let _ = advance(&mut ai, &mut world);
    assert_eq!(cell(&world, hunter), CellCoord::new(1, 1));
    let _ = advance(&mut ai, &mut world);
    assert_eq!(cell(&world, hunter), CellCoord::new(2, 2));
    let _ = advance(&mut ai, &mut world);
    assert_eq!(cell(&world, hunter), CellCoord::new(3, 2));

    assert!(plan(&mut ai, &world).is_empty());
}

#[test]
fn human_players_are_left_alone() {
    let world = world(&["...", "..."], &[(0, 0, Controller::Human)]);
    let mut ai = Ai::new(0);
    assert!(plan(&mut ai, &world).is_empty());
}
