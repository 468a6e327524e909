#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for Bomb Arena.
//!
//! The world owns the loaded level, the players standing on it and the bonus
//! policy consulted when walls break. Adapters and systems mutate it only
//! through [`apply`] (and [`detonate`] for direct blasts), and observe it only
//! through the [`query`] module and the emitted [`Event`] stream.

mod blast;
mod characters;
mod level;

use bomb_arena_bonus::{BonusPolicy, WeightedBonusPolicy};
use bomb_arena_core::{
    BombId, BombKind, CellCoord, CharacterId, Command, Controller, CoordinateModel, Direction,
    Element, Event, GameConfig, LevelLayout, SimulationError,
};

use crate::blast::BlastContext;
pub use crate::{
    characters::{Character, Player},
    level::LevelMap,
};

#[derive(Debug)]
struct Arena {
    map: LevelMap,
    coordinates: CoordinateModel,
}

/// Represents the authoritative Bomb Arena world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    bonus_policy: Box<dyn BonusPolicy>,
    arena: Option<Arena>,
    players: Vec<Player>,
    next_character: u32,
    next_bomb: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world whose bonus policy is built from `config`.
    ///
    /// No level is loaded; send [`Command::LoadLevel`] before anything else.
    pub fn new(config: GameConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let policy = WeightedBonusPolicy::new(&config.bonus)?;
        Self::with_bonus_policy(config, Box::new(policy))
    }

    /// Creates an empty world that consults the injected bonus policy.
    pub fn with_bonus_policy(
        config: GameConfig,
        bonus_policy: Box<dyn BonusPolicy>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            config,
            bonus_policy,
            arena: None,
            players: Vec::new(),
            next_character: 0,
            next_bomb: 0,
            tick_index: 0,
        })
    }

    fn load_level(
        &mut self,
        layout: &LevelLayout,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let coordinates =
            CoordinateModel::new(&self.config.viewport, layout.columns(), layout.rows())?;
        self.arena = Some(Arena {
            map: LevelMap::from_layout(layout),
            coordinates,
        });
        self.players.clear();
        self.tick_index = 0;

        tracing::info!(
            columns = layout.columns(),
            rows = layout.rows(),
            "level loaded"
        );
        out_events.push(Event::LevelLoaded {
            columns: layout.columns(),
            rows: layout.rows(),
        });
        Ok(())
    }

    fn spawn_player(
        &mut self,
        name: String,
        cell: CellCoord,
        controller: Controller,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let arena = self.arena.as_mut().ok_or(SimulationError::LevelNotLoaded)?;
        if !arena.map.is_walkable(cell)? {
            return Err(SimulationError::illegal(
                "spawn cell",
                format!("({}, {}) is not walkable", cell.column(), cell.row()),
            ));
        }

        let id = CharacterId::new(self.next_character);
        let character = Character::new(
            id,
            name,
            cell,
            &arena.coordinates,
            self.config.character.life,
            self.config.character.speed,
        )?;
        self.next_character += 1;
        arena.map.register_character(id);
        tracing::info!(
            character = id.get(),
            name = character.name(),
            ?controller,
            ?cell,
            "player spawned"
        );
        self.players
            .push(Player::new(character, controller, &self.config.character));
        out_events.push(Event::PlayerSpawned { character: id, cell });
        Ok(())
    }

    fn move_character(
        &mut self,
        id: CharacterId,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let Self {
            arena,
            players,
            config,
            ..
        } = self;
        let arena = arena.as_mut().ok_or(SimulationError::LevelNotLoaded)?;
        let player = find_player(players, id)?;
        if !player.character().is_alive() {
            return Ok(());
        }
        player.moved_this_tick = true;

        let from = player.character().cell();
        let view = arena.map.view();
        if !player
            .character_mut()
            .move_direction(direction, &arena.coordinates, &view)
        {
            tracing::trace!(character = id.get(), ?direction, "move rejected");
            out_events.push(Event::MoveRejected {
                character: id,
                direction,
            });
            return Ok(());
        }

        let to = player.character().cell();
        tracing::trace!(character = id.get(), ?from, ?to, "character moved");
        out_events.push(Event::CharacterMoved {
            character: id,
            from,
            to,
        });

        if let Some(Element::Bonus(bonus)) = arena.map.cell(to)?.element().copied() {
            arena.map.clear_element(to)?;
            player.apply_bonus(bonus, config.character.speed_step);
            tracing::debug!(character = id.get(), ?bonus, "bonus collected");
            out_events.push(Event::BonusCollected {
                character: id,
                bonus,
                cell: to,
            });
        }
        Ok(())
    }

    fn drop_bomb(
        &mut self,
        id: CharacterId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let Self {
            arena,
            players,
            config,
            next_bomb,
            ..
        } = self;
        let arena = arena.as_mut().ok_or(SimulationError::LevelNotLoaded)?;
        let player = find_player(players, id)?;
        if let Some(reason) = player.drop_rejection(&arena.map)? {
            out_events.push(Event::BombDropRejected { player: id, reason });
            return Ok(());
        }

        let bomb = BombId::new(*next_bomb);
        let cell = player.character().cell();
        let kind = player.bomb_kind();
        let points = config.score.bomb_dropped;
        if !player.drop_bomb(&mut arena.map, bomb, config.bomb.fuse_ticks, points)? {
            return Ok(());
        }
        *next_bomb += 1;

        tracing::debug!(bomb = bomb.get(), owner = id.get(), ?cell, ?kind, "bomb dropped");
        out_events.push(Event::BombDropped {
            bomb,
            owner: id,
            cell,
            kind,
        });
        if points > 0 {
            out_events.push(Event::ScoreAwarded {
                character: id,
                points,
                total: player.character().score(),
            });
        }
        Ok(())
    }

    fn select_bomb_kind(
        &mut self,
        id: CharacterId,
        kind: BombKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        if self.arena.is_none() {
            return Err(SimulationError::LevelNotLoaded);
        }
        let player = find_player(&mut self.players, id)?;
        if player.select_bomb_kind(kind) {
            out_events.push(Event::BombKindSelected { player: id, kind });
        } else {
            out_events.push(Event::BombKindLocked { player: id, kind });
        }
        Ok(())
    }

    fn activate_trigger_bombs(
        &mut self,
        id: CharacterId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let Self {
            arena,
            players,
            config,
            bonus_policy,
            ..
        } = self;
        let arena = arena.as_mut().ok_or(SimulationError::LevelNotLoaded)?;
        let mut ctx = BlastContext {
            map: &mut arena.map,
            players: players.as_mut_slice(),
            bonus_policy: bonus_policy.as_mut(),
            config,
            out: &mut *out_events,
        };
        let detonated = blast::activate_trigger_bombs(&mut ctx, id)?;
        out_events.push(Event::TriggerBombsActivated {
            player: id,
            detonated,
        });
        Ok(())
    }

    fn award_score(
        &mut self,
        id: CharacterId,
        points: u32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        if self.arena.is_none() {
            return Err(SimulationError::LevelNotLoaded);
        }
        let player = find_player(&mut self.players, id)?;
        if !player.character().is_alive() {
            return Ok(());
        }
        let total = player.character_mut().award_score(points);
        out_events.push(Event::ScoreAwarded {
            character: id,
            points,
            total,
        });
        Ok(())
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) -> Result<(), SimulationError> {
        let Self {
            arena,
            players,
            config,
            bonus_policy,
            tick_index,
            ..
        } = self;
        let arena = arena.as_mut().ok_or(SimulationError::LevelNotLoaded)?;
        *tick_index = tick_index.saturating_add(1);

        for (cell, square) in arena.map.iter_mut() {
            let Some(Element::Explosion(explosion)) = square.element_mut() else {
                continue;
            };
            if !explosion.tick() {
                continue;
            }
            let revealed = explosion.reveal();
            match revealed {
                Some(bonus) => square.set_element(Element::Bonus(bonus)),
                None => {
                    let _ = square.take_element();
                }
            }
            out_events.push(Event::ExplosionCleared { cell, revealed });
        }

        let mut expired: Vec<(BombId, CellCoord)> = Vec::new();
        for (cell, square) in arena.map.iter_mut() {
            if let Some(Element::Bomb(bomb)) = square.element_mut() {
                if bomb.tick() {
                    expired.push((bomb.id(), cell));
                }
            }
        }
        expired.sort_by_key(|(bomb, _)| *bomb);

        let mut ctx = BlastContext {
            map: &mut arena.map,
            players: players.as_mut_slice(),
            bonus_policy: bonus_policy.as_mut(),
            config,
            out: &mut *out_events,
        };
        for (bomb, cell) in expired {
            let still_placed = matches!(
                ctx.map.cell(cell)?.element(),
                Some(Element::Bomb(placed)) if placed.id() == bomb
            );
            if still_placed {
                let _ = blast::detonate(&mut ctx, cell)?;
            }
        }

        for player in players.iter_mut() {
            if !player.moved_this_tick {
                player.character_mut().reset_status();
            }
            player.moved_this_tick = false;
        }

        out_events.push(Event::TimeAdvanced { tick: *tick_index });
        Ok(())
    }
}

fn find_player(players: &mut [Player], id: CharacterId) -> Result<&mut Player, SimulationError> {
    players
        .iter_mut()
        .find(|player| player.id() == id)
        .ok_or(SimulationError::UnknownCharacter(id))
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Contract violations fail before anything is mutated. Expected refusals,
/// such as a move into a wall, succeed and are reported as events.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), SimulationError> {
    match command {
        Command::LoadLevel { layout } => world.load_level(&layout, out_events),
        Command::SpawnPlayer {
            name,
            cell,
            controller,
        } => world.spawn_player(name, cell, controller, out_events),
        Command::MoveCharacter {
            character,
            direction,
        } => world.move_character(character, direction, out_events),
        Command::DropBomb { player } => world.drop_bomb(player, out_events),
        Command::SelectBombKind { player, kind } => {
            world.select_bomb_kind(player, kind, out_events)
        }
        Command::ActivateTriggerBombs { player } => {
            world.activate_trigger_bombs(player, out_events)
        }
        Command::AwardScore { character, points } => {
            world.award_score(character, points, out_events)
        }
        Command::Tick => world.tick(out_events),
    }
}

/// Detonates the placed bomb on `cell` and everything it chains into.
///
/// Returns `Ok(false)` when the cell holds no placed bomb, so detonating an
/// already exploded bomb has no effect. Fails with
/// [`SimulationError::LevelNotLoaded`] when no level is loaded.
pub fn detonate(
    world: &mut World,
    cell: CellCoord,
    out_events: &mut Vec<Event>,
) -> Result<bool, SimulationError> {
    let World {
        arena,
        players,
        config,
        bonus_policy,
        ..
    } = world;
    let arena = arena.as_mut().ok_or(SimulationError::LevelNotLoaded)?;
    let mut ctx = BlastContext {
        map: &mut arena.map,
        players: players.as_mut_slice(),
        bonus_policy: bonus_policy.as_mut(),
        config,
        out: &mut *out_events,
    };
    blast::detonate(&mut ctx, cell)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bomb_arena_core::{
        CharacterId, CharacterView, CoordinateModel, LevelView, RoundOutcome,
    };

    use super::{LevelMap, Player, World};

    /// Number of ticks processed since the level loaded.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only view of the loaded level's cells.
    #[must_use]
    pub fn level_view(world: &World) -> Option<LevelView<'_>> {
        world.arena.as_ref().map(|arena| arena.map.view())
    }

    /// The loaded level's grid.
    #[must_use]
    pub fn level_map(world: &World) -> Option<&LevelMap> {
        world.arena.as_ref().map(|arena| &arena.map)
    }

    /// Pixel/grid transform of the loaded level.
    #[must_use]
    pub fn coordinates(world: &World) -> Option<&CoordinateModel> {
        world.arena.as_ref().map(|arena| &arena.coordinates)
    }

    /// Captures a snapshot of every player in registration order.
    #[must_use]
    pub fn character_view(world: &World) -> CharacterView {
        CharacterView::from_snapshots(world.players.iter().map(Player::snapshot).collect())
    }

    /// Snapshot of the characters registered on the loaded level.
    #[must_use]
    pub fn registered_characters(world: &World) -> Vec<CharacterId> {
        world
            .arena
            .as_ref()
            .map(|arena| arena.map.list_characters())
            .unwrap_or_default()
    }

    /// Derives the round state from the surviving players.
    ///
    /// A round with a single spawned player never reports a winner.
    #[must_use]
    pub fn round_outcome(world: &World) -> RoundOutcome {
        let mut alive = world
            .players
            .iter()
            .filter(|player| player.character().is_alive());
        match (alive.next(), alive.next()) {
            (None, _) if !world.players.is_empty() => RoundOutcome::Draw,
            (Some(winner), None) if world.players.len() > 1 => RoundOutcome::Winner(winner.id()),
            _ => RoundOutcome::InProgress,
        }
    }
}
