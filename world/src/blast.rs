//! Bomb detonation and four-way blast propagation.
//!
//! A detonation turns the bomb's cell into an explosion and walks each
//! cardinal direction up to the bomb's power. Unbreakable walls and the grid
//! edge stop a ray untouched, breakable walls are destroyed and absorb the ray,
//! and other bombs chain-detonate. Chains are processed depth first, exactly
//! as nested recursive calls would, but on an explicit frame stack.

use bomb_arena_bonus::BonusPolicy;
use bomb_arena_core::{
    BombKind, CellCoord, CharacterId, Direction, Element, Event, Explosion, GameConfig, GridPoint,
    SimulationError, WallKind,
};

use crate::{characters::Player, level::LevelMap};

/// Mutable state a detonation may touch.
pub(crate) struct BlastContext<'a> {
    pub(crate) map: &'a mut LevelMap,
    pub(crate) players: &'a mut [Player],
    pub(crate) bonus_policy: &'a mut dyn BonusPolicy,
    pub(crate) config: &'a GameConfig,
    pub(crate) out: &'a mut Vec<Event>,
}

#[derive(Clone, Copy, Debug)]
struct BlastFrame {
    origin: CellCoord,
    power: u32,
    owner: CharacterId,
    direction: usize,
    distance: u32,
}

impl BlastFrame {
    fn next_direction(&mut self) {
        self.direction += 1;
        self.distance = 0;
    }
}

/// Detonates the placed bomb on `cell`, including every bomb it chains into.
///
/// Returns `false` when the cell holds no placed bomb, which makes repeated
/// detonation of the same bomb a no-op.
pub(crate) fn detonate(ctx: &mut BlastContext<'_>, cell: CellCoord) -> Result<bool, SimulationError> {
    let Some(first) = ignite(ctx, cell)? else {
        return Ok(false);
    };

    let (columns, rows) = ctx.map.dimensions();
    let mut stack = vec![first];
    while let Some(frame) = stack.last_mut() {
        let Some(direction) = Direction::ALL.get(frame.direction).copied() else {
            let _ = stack.pop();
            continue;
        };

        frame.distance += 1;
        if frame.distance > frame.power {
            frame.next_direction();
            continue;
        }

        let Some(target) = ray_cell(frame.origin, direction, frame.distance, columns, rows) else {
            frame.next_direction();
            continue;
        };

        let owner = frame.owner;
        let origin = frame.origin;
        match ctx.map.cell(target)?.element().copied() {
            Some(Element::Wall(WallKind::Unbreakable)) => frame.next_direction(),
            Some(Element::Wall(WallKind::Breakable)) => {
                frame.next_direction();
                damage_characters_at(ctx, target, owner)?;
                destroy_wall(ctx, target, owner)?;
            }
            Some(Element::Bomb(_)) => {
                frame.next_direction();
                if let Some(chained) = ignite(ctx, target)? {
                    tracing::debug!(from = ?origin, to = ?target, "bomb chain");
                    stack.push(chained);
                }
            }
            Some(Element::Explosion(existing)) => {
                damage_characters_at(ctx, target, owner)?;
                let lifetime = ctx.config.bomb.explosion_ticks;
                ctx.map.set_element(
                    target,
                    Element::Explosion(Explosion::new(lifetime, existing.reveal())),
                )?;
            }
            Some(Element::Bonus(_)) | None => {
                damage_characters_at(ctx, target, owner)?;
                let lifetime = ctx.config.bomb.explosion_ticks;
                ctx.map
                    .set_element(target, Element::Explosion(Explosion::new(lifetime, None)))?;
            }
        }
    }

    Ok(true)
}

/// Detonates every trigger bomb `player` has armed, then clears the list.
///
/// Returns how many of the armed bombs detonated directly; bombs already
/// consumed by a chain are skipped.
pub(crate) fn activate_trigger_bombs(
    ctx: &mut BlastContext<'_>,
    player: CharacterId,
) -> Result<usize, SimulationError> {
    let armed = match ctx.players.iter_mut().find(|candidate| candidate.id() == player) {
        Some(owner) => owner.take_armed_trigger_bombs(),
        None => return Err(SimulationError::UnknownCharacter(player)),
    };

    let mut detonated = 0;
    for (bomb, cell) in armed {
        let still_placed = matches!(
            ctx.map.cell(cell)?.element(),
            Some(Element::Bomb(placed)) if placed.id() == bomb
        );
        if still_placed && detonate(ctx, cell)? {
            detonated += 1;
        }
    }
    Ok(detonated)
}

fn ray_cell(
    origin: CellCoord,
    direction: Direction,
    distance: u32,
    columns: u32,
    rows: u32,
) -> Option<CellCoord> {
    let (column, row) = direction.offset();
    let distance = i64::from(distance);
    let start = GridPoint::from(origin);
    GridPoint::new(start.column + column * distance, start.row + row * distance)
        .to_cell(columns, rows)
}

/// Replaces the bomb on `cell` with an explosion and starts its blast frame.
fn ignite(ctx: &mut BlastContext<'_>, cell: CellCoord) -> Result<Option<BlastFrame>, SimulationError> {
    let lifetime = ctx.config.bomb.explosion_ticks;
    let square = ctx.map.cell_mut(cell)?;
    let Some(Element::Bomb(bomb)) = square.element_mut() else {
        return Ok(None);
    };
    if !bomb.mark_exploded() {
        return Ok(None);
    }
    let bomb = *bomb;
    square.set_element(Element::Explosion(Explosion::new(lifetime, None)));

    tracing::debug!(
        bomb = bomb.id().get(),
        owner = bomb.owner().get(),
        ?cell,
        power = bomb.power(),
        "bomb detonated"
    );
    ctx.out.push(Event::BombDetonated {
        bomb: bomb.id(),
        owner: bomb.owner(),
        cell,
        power: bomb.power(),
    });

    let refund = ctx.config.bomb.refund_on_detonation;
    if let Some(owner) = ctx
        .players
        .iter_mut()
        .find(|player| player.id() == bomb.owner())
    {
        if bomb.kind() == BombKind::Trigger {
            owner.disarm(bomb.id());
        }
        if refund {
            owner.refund_bomb();
        }
    }

    damage_characters_at(ctx, cell, bomb.owner())?;

    Ok(Some(BlastFrame {
        origin: cell,
        power: bomb.power(),
        owner: bomb.owner(),
        direction: 0,
        distance: 0,
    }))
}

fn destroy_wall(
    ctx: &mut BlastContext<'_>,
    cell: CellCoord,
    owner: CharacterId,
) -> Result<(), SimulationError> {
    let bonus = ctx.bonus_policy.roll();
    let lifetime = ctx.config.bomb.explosion_ticks;
    ctx.map
        .set_element(cell, Element::Explosion(Explosion::new(lifetime, bonus)))?;
    ctx.out.push(Event::WallDestroyed { cell, bonus });
    let points = ctx.config.score.wall_destroyed;
    award(ctx, owner, points);
    Ok(())
}

/// Removes one life from every living character standing on `cell`.
fn damage_characters_at(
    ctx: &mut BlastContext<'_>,
    cell: CellCoord,
    owner: CharacterId,
) -> Result<(), SimulationError> {
    let mut kills = 0_u32;
    for player in ctx.players.iter_mut() {
        let character = player.character_mut();
        if !character.is_alive() || character.cell() != cell {
            continue;
        }
        character.remove_one_life()?;
        ctx.out.push(Event::CharacterDamaged {
            character: character.id(),
            remaining_life: character.life(),
        });
        if !character.is_alive() {
            tracing::info!(character = character.id().get(), ?cell, "character died");
            ctx.out.push(Event::CharacterDied {
                character: character.id(),
            });
            if character.id() != owner {
                kills += 1;
            }
        }
    }

    let points = ctx.config.score.opponent_killed;
    for _ in 0..kills {
        award(ctx, owner, points);
    }
    Ok(())
}

fn award(ctx: &mut BlastContext<'_>, character: CharacterId, points: u32) {
    if points == 0 {
        return;
    }
    let Some(player) = ctx
        .players
        .iter_mut()
        .find(|player| player.id() == character && player.character().is_alive())
    else {
        return;
    };
    let total = player.character_mut().award_score(points);
    ctx.out.push(Event::ScoreAwarded {
        character,
        points,
        total,
    });
}
