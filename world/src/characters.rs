//! Characters and players moving on the grid.

use bomb_arena_core::{
    resolve_step, Bomb, BombId, BombKind, BonusKind, CellCoord, CharacterConfig, CharacterId,
    CharacterSnapshot, Controller, CoordinateModel, Direction, DropRejection, Element, LevelView,
    MovingStatus, PixelPoint, SimulationError,
};

use crate::level::LevelMap;

/// Shared state of anything that walks the grid and can be hurt.
///
/// The pixel position and the grid cell always agree through the coordinate
/// model: every mutation of one recomputes the other.
#[derive(Clone, Debug)]
pub struct Character {
    id: CharacterId,
    name: String,
    cell: CellCoord,
    pixel: PixelPoint,
    life: u32,
    speed: u32,
    alive: bool,
    status: MovingStatus,
    score: u64,
}

impl Character {
    /// Creates a living character standing on `cell`.
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        cell: CellCoord,
        coordinates: &CoordinateModel,
        life: u32,
        speed: u32,
    ) -> Result<Self, SimulationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SimulationError::illegal("name", "must not be empty"));
        }
        if life == 0 {
            return Err(SimulationError::illegal("life", "must be > 0"));
        }
        if speed == 0 {
            return Err(SimulationError::illegal("speed", "must be > 0"));
        }
        Ok(Self {
            id,
            name,
            cell,
            pixel: coordinates.to_pixel(cell),
            life,
            speed,
            alive: true,
            status: MovingStatus::Still,
            score: 0,
        })
    }

    /// Identifier of the character.
    #[must_use]
    pub const fn id(&self) -> CharacterId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid cell currently occupied.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Rendered position.
    #[must_use]
    pub const fn pixel(&self) -> PixelPoint {
        self.pixel
    }

    /// Remaining life.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
    }

    /// Pixels travelled per accepted move.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Whether the character can still be damaged and score.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Animation status.
    #[must_use]
    pub const fn status(&self) -> MovingStatus {
        self.status
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Attempts one speed step in `direction`.
    ///
    /// The status always reflects the attempted direction. The position only
    /// changes when the level accepts the step; a refused step is not an error.
    /// Dead characters never move.
    pub fn move_direction(
        &mut self,
        direction: Direction,
        coordinates: &CoordinateModel,
        level: &LevelView<'_>,
    ) -> bool {
        if !self.alive {
            return false;
        }
        self.status = MovingStatus::from(direction);
        match resolve_step(
            coordinates,
            level,
            self.cell,
            self.pixel,
            direction,
            self.speed,
        ) {
            Some(target) => {
                self.pixel = target.pixel;
                self.cell = target.cell;
                true
            }
            None => false,
        }
    }

    /// Returns the status to `Still` unless the character is dead.
    pub fn reset_status(&mut self) {
        if self.alive {
            self.status = MovingStatus::Still;
        }
    }

    /// Adds one life. Never revives a dead character.
    pub fn add_one_life(&mut self) {
        self.life = self.life.saturating_add(1);
    }

    /// Removes one life, marking the character dead when it reaches zero.
    pub fn remove_one_life(&mut self) -> Result<(), SimulationError> {
        if self.life == 0 {
            return Err(SimulationError::LifeExhausted(self.id));
        }
        self.life -= 1;
        if self.life == 0 {
            self.alive = false;
            self.status = MovingStatus::Die;
        }
        Ok(())
    }

    /// Adds `points` to the score and returns the new total.
    pub fn award_score(&mut self, points: u32) -> u64 {
        self.score = self.score.saturating_add(u64::from(points));
        self.score
    }
}

/// Character that carries bombs.
#[derive(Clone, Debug)]
pub struct Player {
    character: Character,
    controller: Controller,
    bombs: u32,
    bomb_power: u32,
    bomb_kind: BombKind,
    trigger_unlocked: bool,
    armed: Vec<(BombId, CellCoord)>,
    pub(crate) moved_this_tick: bool,
}

impl Player {
    /// Wraps `character` with the loadout from `config`.
    #[must_use]
    pub fn new(character: Character, controller: Controller, config: &CharacterConfig) -> Self {
        Self {
            character,
            controller,
            bombs: config.bombs,
            bomb_power: config.bomb_power,
            bomb_kind: BombKind::Time,
            trigger_unlocked: false,
            armed: Vec::new(),
            moved_this_tick: false,
        }
    }

    /// Shared character state.
    #[must_use]
    pub const fn character(&self) -> &Character {
        &self.character
    }

    /// Mutable shared character state.
    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    /// Identifier of the player.
    #[must_use]
    pub const fn id(&self) -> CharacterId {
        self.character.id
    }

    /// Who drives the player.
    #[must_use]
    pub const fn controller(&self) -> Controller {
        self.controller
    }

    /// Bombs left in the inventory.
    #[must_use]
    pub const fn bombs(&self) -> u32 {
        self.bombs
    }

    /// Blast radius of dropped bombs.
    #[must_use]
    pub const fn bomb_power(&self) -> u32 {
        self.bomb_power
    }

    /// Bomb type dropped next.
    #[must_use]
    pub const fn bomb_kind(&self) -> BombKind {
        self.bomb_kind
    }

    /// Trigger bombs waiting for activation, in arming order.
    #[must_use]
    pub fn armed_trigger_bombs(&self) -> &[(BombId, CellCoord)] {
        &self.armed
    }

    /// Reason a drop on the player's cell would currently be refused, if any.
    pub fn drop_rejection(
        &self,
        map: &LevelMap,
    ) -> Result<Option<DropRejection>, SimulationError> {
        let reason = if !self.character.alive {
            Some(DropRejection::Dead)
        } else if self.bombs == 0 {
            Some(DropRejection::EmptyInventory)
        } else if self.bomb_power == 0 {
            Some(DropRejection::NoPower)
        } else if matches!(
            map.cell(self.character.cell)?.element(),
            Some(Element::Bomb(_))
        ) {
            Some(DropRejection::Occupied)
        } else {
            None
        };
        Ok(reason)
    }

    /// Drops a bomb of the selected type on the player's cell.
    ///
    /// Returns `Ok(false)` without touching the map whenever
    /// [`Player::drop_rejection`] names a reason. A bonus or explosion on the
    /// cell is overwritten, so an explosion's pending bonus is lost. On
    /// success the inventory shrinks by one, `drop_score` is credited, the
    /// status resets to `Still`, and trigger bombs are armed.
    pub fn drop_bomb(
        &mut self,
        map: &mut LevelMap,
        id: BombId,
        fuse_ticks: u32,
        drop_score: u32,
    ) -> Result<bool, SimulationError> {
        if self.drop_rejection(map)?.is_some() {
            return Ok(false);
        }
        let bomb = match self.bomb_kind {
            BombKind::Time => Bomb::timed(id, self.id(), self.bomb_power, fuse_ticks)?,
            BombKind::Trigger => Bomb::trigger(id, self.id(), self.bomb_power)?,
        };
        let cell = self.character.cell;
        map.set_element(cell, Element::Bomb(bomb))?;

        self.bombs -= 1;
        let _ = self.character.award_score(drop_score);
        self.character.status = MovingStatus::Still;
        if bomb.kind() == BombKind::Trigger {
            self.armed.push((id, cell));
        }
        Ok(true)
    }

    /// Selects the bomb type dropped next. Trigger bombs need unlocking first.
    pub fn select_bomb_kind(&mut self, kind: BombKind) -> bool {
        if kind == BombKind::Trigger && !self.trigger_unlocked {
            return false;
        }
        self.bomb_kind = kind;
        true
    }

    /// Applies the one-shot effect of a picked-up bonus.
    pub fn apply_bonus(&mut self, bonus: BonusKind, speed_step: u32) {
        match bonus {
            BonusKind::AddBomb => self.bombs = self.bombs.saturating_add(1),
            BonusKind::AddLife => self.character.add_one_life(),
            BonusKind::AddSpeed => {
                self.character.speed = self.character.speed.saturating_add(speed_step);
            }
            BonusKind::UnlockTriggerBomb => self.trigger_unlocked = true,
        }
    }

    /// Returns a detonated bomb to the inventory.
    pub fn refund_bomb(&mut self) {
        self.bombs = self.bombs.saturating_add(1);
    }

    /// Removes and returns every armed trigger bomb.
    pub fn take_armed_trigger_bombs(&mut self) -> Vec<(BombId, CellCoord)> {
        std::mem::take(&mut self.armed)
    }

    /// Forgets a trigger bomb that detonated some other way.
    pub(crate) fn disarm(&mut self, bomb: BombId) {
        self.armed.retain(|(armed, _)| *armed != bomb);
    }

    /// Captures the state read by renderers and systems.
    #[must_use]
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            id: self.character.id,
            name: self.character.name.clone(),
            controller: self.controller,
            cell: self.character.cell,
            pixel: self.character.pixel,
            life: self.character.life,
            speed: self.character.speed,
            alive: self.character.alive,
            status: self.character.status,
            score: self.character.score,
            bombs: self.bombs,
            bomb_power: self.bomb_power,
            bomb_kind: self.bomb_kind,
            armed_trigger_bombs: self.armed.len(),
        }
    }
}
