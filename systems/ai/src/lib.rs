#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Naive opponent strategy that proposes moves for computer-controlled players.
//!
//! A lone survivor wanders in a random direction the level accepts. Otherwise
//! each computer player closes in on its nearest living opponent one axis step
//! at a time, horizontal before vertical.

use bomb_arena_core::{
    resolve_step, CharacterSnapshot, CharacterView, Command, Controller, CoordinateModel,
    Direction, LevelView,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that reads world views and emits movement commands.
#[derive(Debug)]
pub struct Ai {
    rng: ChaCha8Rng,
}

impl Ai {
    /// Creates a strategy whose wandering is reproducible for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Proposes this tick's moves for every living computer-controlled player.
    ///
    /// Players are visited in registration order. Humans and the dead are
    /// skipped.
    pub fn handle(
        &mut self,
        characters: &CharacterView,
        level: &LevelView<'_>,
        coordinates: &CoordinateModel,
        out: &mut Vec<Command>,
    ) {
        for mover in characters.iter() {
            if mover.controller != Controller::Ai || !mover.alive {
                continue;
            }
            match nearest_opponent(mover, characters) {
                Some(target) => seek(mover, target, out),
                None => self.wander(mover, level, coordinates, out),
            }
        }
    }

    fn wander(
        &mut self,
        mover: &CharacterSnapshot,
        level: &LevelView<'_>,
        coordinates: &CoordinateModel,
        out: &mut Vec<Command>,
    ) {
        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.rng);
        let accepted = directions.into_iter().find(|direction| {
            resolve_step(
                coordinates,
                level,
                mover.cell,
                mover.pixel,
                *direction,
                mover.speed,
            )
            .is_some()
        });

        match accepted {
            Some(direction) => {
                tracing::trace!(character = mover.id.get(), ?direction, "ai wanders");
                out.push(Command::MoveCharacter {
                    character: mover.id,
                    direction,
                });
            }
            None => tracing::trace!(character = mover.id.get(), "ai boxed in"),
        }
    }
}

/// Closest living opponent by Euclidean grid distance; the first seen wins ties.
fn nearest_opponent<'a>(
    mover: &CharacterSnapshot,
    characters: &'a CharacterView,
) -> Option<&'a CharacterSnapshot> {
    let mut nearest: Option<(&CharacterSnapshot, f32)> = None;
    for candidate in characters.iter() {
        if candidate.id == mover.id || !candidate.alive {
            continue;
        }
        let distance = mover.cell.euclidean_distance(candidate.cell);
        match nearest {
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((candidate, distance)),
        }
    }
    nearest.map(|(candidate, _)| candidate)
}

fn seek(mover: &CharacterSnapshot, target: &CharacterSnapshot, out: &mut Vec<Command>) {
    let horizontal = match target.cell.column().cmp(&mover.cell.column()) {
        std::cmp::Ordering::Greater => Some(Direction::Right),
        std::cmp::Ordering::Less => Some(Direction::Left),
        std::cmp::Ordering::Equal => None,
    };
    let vertical = match target.cell.row().cmp(&mover.cell.row()) {
        std::cmp::Ordering::Greater => Some(Direction::Down),
        std::cmp::Ordering::Less => Some(Direction::Up),
        std::cmp::Ordering::Equal => None,
    };

    tracing::trace!(
        character = mover.id.get(),
        target = target.id.get(),
        "ai seeks opponent"
    );
    for direction in [horizontal, vertical].into_iter().flatten() {
        out.push(Command::MoveCharacter {
            character: mover.id,
            direction,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomb_arena_core::{BombKind, CellCoord, CharacterId, MovingStatus, PixelPoint};

    fn snapshot(id: u32, column: u32, row: u32, controller: Controller) -> CharacterSnapshot {
        CharacterSnapshot {
            id: CharacterId::new(id),
            name: format!("c{id}"),
            controller,
            cell: CellCoord::new(column, row),
            pixel: PixelPoint::new(0.0, 0.0),
            life: 1,
            speed: 32,
            alive: true,
            status: MovingStatus::Still,
            score: 0,
            bombs: 1,
            bomb_power: 1,
            bomb_kind: BombKind::Time,
            armed_trigger_bombs: 0,
        }
    }

    fn moves(out: &[Command]) -> Vec<Direction> {
        out.iter()
            .filter_map(|command| match command {
                Command::MoveCharacter { direction, .. } => Some(*direction),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn nearest_opponent_prefers_first_seen_on_ties() {
        let view = CharacterView::from_snapshots(vec![
            snapshot(0, 2, 2, Controller::Ai),
            snapshot(1, 4, 2, Controller::Human),
            snapshot(2, 0, 2, Controller::Human),
            snapshot(3, 9, 9, Controller::Human),
        ]);
        let mover = view.get(CharacterId::new(0)).expect("mover");
        let target = nearest_opponent(mover, &view).expect("target");
        assert_eq!(target.id, CharacterId::new(1));
    }

    #[test]
    fn dead_players_are_not_targets() {
        let mut dead = snapshot(1, 3, 2, Controller::Human);
        dead.alive = false;
        let view = CharacterView::from_snapshots(vec![snapshot(0, 2, 2, Controller::Ai), dead]);
        let mover = view.get(CharacterId::new(0)).expect("mover");
        assert!(nearest_opponent(mover, &view).is_none());
    }

    #[test]
    fn seeking_steps_horizontally_then_vertically() {
        let mut out = Vec::new();
        seek(
            &snapshot(0, 3, 3, Controller::Ai),
            &snapshot(1, 1, 5, Controller::Human),
            &mut out,
        );
        assert_eq!(moves(&out), vec![Direction::Left, Direction::Down]);

        out.clear();
        seek(
            &snapshot(0, 3, 3, Controller::Ai),
            &snapshot(1, 3, 0, Controller::Human),
            &mut out,
        );
        assert_eq!(moves(&out), vec![Direction::Up]);

        out.clear();
        seek(
            &snapshot(0, 3, 3, Controller::Ai),
            &snapshot(1, 3, 3, Controller::Human),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
