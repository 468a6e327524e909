#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bomb Arena simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that renderers,
//! sound notifiers and systems consume. Systems read immutable views and
//! respond exclusively with new command batches.

mod config;
mod error;
mod geometry;
mod terrain;

use serde::{Deserialize, Serialize};

pub use config::{
    BombConfig, BonusConfig, BonusWeights, CharacterConfig, GameConfig, ScoreConfig,
    ViewportConfig,
};
pub use error::SimulationError;
pub use geometry::{CellCoord, CoordinateModel, Direction, GridPoint, PixelPoint};
pub use terrain::{
    resolve_step, Bomb, BombId, BombKind, BombState, BonusKind, Element, Explosion, Fuse,
    LevelLayout, LevelView, Square, StepTarget, Terrain, TextureId, TileSpec, WallKind,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current level with the provided layout.
    ///
    /// Characters from a previous level are discarded.
    LoadLevel {
        /// Grid supplied by the map-load collaborator.
        layout: LevelLayout,
    },
    /// Places a new player on the level.
    SpawnPlayer {
        /// Display name; must not be empty.
        name: String,
        /// Starting cell; must be walkable.
        cell: CellCoord,
        /// Who drives the player.
        controller: Controller,
    },
    /// Attempts to move a character one speed step.
    MoveCharacter {
        /// Character attempting to move.
        character: CharacterId,
        /// Direction of travel.
        direction: Direction,
    },
    /// Attempts to drop a bomb on the player's current cell.
    DropBomb {
        /// Player dropping the bomb.
        player: CharacterId,
    },
    /// Switches the bomb type the player drops next.
    SelectBombKind {
        /// Player changing selection.
        player: CharacterId,
        /// Requested bomb type.
        kind: BombKind,
    },
    /// Detonates every trigger bomb the player has armed.
    ActivateTriggerBombs {
        /// Player sending the trigger.
        player: CharacterId,
    },
    /// Credits points to a character's score.
    AwardScore {
        /// Character receiving the points.
        character: CharacterId,
        /// Points to add.
        points: u32,
    },
    /// Advances the simulation by one tick.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A level finished loading.
    LevelLoaded {
        /// Number of columns in the new grid.
        columns: u32,
        /// Number of rows in the new grid.
        rows: u32,
    },
    /// A player joined the level.
    PlayerSpawned {
        /// Identifier assigned to the player.
        character: CharacterId,
        /// Cell the player starts on.
        cell: CellCoord,
    },
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// A movement step was applied.
    CharacterMoved {
        /// Character that moved.
        character: CharacterId,
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step; equal to `from` for sub-cell steps.
        to: CellCoord,
    },
    /// A movement step was refused by the level.
    MoveRejected {
        /// Character that attempted to move.
        character: CharacterId,
        /// Attempted direction.
        direction: Direction,
    },
    /// A bomb was placed on the grid.
    BombDropped {
        /// Identifier assigned to the bomb.
        bomb: BombId,
        /// Player owning the bomb.
        owner: CharacterId,
        /// Cell holding the bomb.
        cell: CellCoord,
        /// Type of the bomb.
        kind: BombKind,
    },
    /// A bomb drop request was refused.
    BombDropRejected {
        /// Player that attempted the drop.
        player: CharacterId,
        /// Why the drop was refused.
        reason: DropRejection,
    },
    /// A bomb detonated. Emitted once per bomb, including chained bombs.
    BombDetonated {
        /// Identifier of the detonated bomb.
        bomb: BombId,
        /// Player owning the bomb.
        owner: CharacterId,
        /// Cell the bomb occupied.
        cell: CellCoord,
        /// Blast radius of the bomb.
        power: u32,
    },
    /// A blast destroyed a breakable wall.
    WallDestroyed {
        /// Cell the wall occupied.
        cell: CellCoord,
        /// Bonus revealed once the explosion clears, if any.
        bonus: Option<BonusKind>,
    },
    /// A blast removed one life from a character.
    CharacterDamaged {
        /// Character that was hit.
        character: CharacterId,
        /// Life left after the hit.
        remaining_life: u32,
    },
    /// A character's life reached zero.
    CharacterDied {
        /// Character that died.
        character: CharacterId,
    },
    /// A player picked up a bonus.
    BonusCollected {
        /// Player receiving the bonus.
        character: CharacterId,
        /// Bonus applied to the player.
        bonus: BonusKind,
        /// Cell the bonus was picked up from.
        cell: CellCoord,
    },
    /// An explosion expired and left its cell.
    ExplosionCleared {
        /// Cell the explosion occupied.
        cell: CellCoord,
        /// Bonus left on the cell afterwards, if any.
        revealed: Option<BonusKind>,
    },
    /// Points were credited to a character.
    ScoreAwarded {
        /// Character receiving the points.
        character: CharacterId,
        /// Points added.
        points: u32,
        /// Score after the award.
        total: u64,
    },
    /// A player changed the bomb type it drops.
    BombKindSelected {
        /// Player changing selection.
        player: CharacterId,
        /// Bomb type now selected.
        kind: BombKind,
    },
    /// A player asked for trigger bombs before unlocking them.
    BombKindLocked {
        /// Player that made the request.
        player: CharacterId,
        /// Bomb type that is still locked.
        kind: BombKind,
    },
    /// A player fired its trigger.
    TriggerBombsActivated {
        /// Player sending the trigger.
        player: CharacterId,
        /// Number of armed bombs detonated directly. Bombs already consumed by
        /// an earlier chain are not counted.
        detonated: usize,
    },
}

/// Reasons a bomb drop may be refused. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropRejection {
    /// The player is dead.
    Dead,
    /// The player has no bombs left.
    EmptyInventory,
    /// The player's bomb power is zero.
    NoPower,
    /// The player's cell already holds a placed bomb.
    Occupied,
}

/// Unique identifier assigned to a character, increasing in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(u32);

impl CharacterId {
    /// Creates a new character identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Source of a player's commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    /// Commands come from an input device.
    Human,
    /// Commands come from the AI system.
    Ai,
}

/// Animation status of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovingStatus {
    /// No movement during the last tick.
    Still,
    /// Last attempted movement went up.
    Up,
    /// Last attempted movement went down.
    Down,
    /// Last attempted movement went left.
    Left,
    /// Last attempted movement went right.
    Right,
    /// The character died.
    Die,
}

impl From<Direction> for MovingStatus {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

/// Immutable representation of a single player's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterSnapshot {
    /// Unique identifier assigned to the player.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Who drives the player.
    pub controller: Controller,
    /// Grid cell currently occupied.
    pub cell: CellCoord,
    /// Rendered position; always maps to `cell`.
    pub pixel: PixelPoint,
    /// Remaining life.
    pub life: u32,
    /// Pixels travelled per accepted move.
    pub speed: u32,
    /// Whether the character can still be damaged and score.
    pub alive: bool,
    /// Animation status.
    pub status: MovingStatus,
    /// Accumulated score.
    pub score: u64,
    /// Bombs left in the inventory.
    pub bombs: u32,
    /// Blast radius of dropped bombs.
    pub bomb_power: u32,
    /// Bomb type dropped next.
    pub bomb_kind: BombKind,
    /// Trigger bombs currently armed.
    pub armed_trigger_bombs: usize,
}

/// Read-only snapshot describing every character on the level.
#[derive(Clone, Debug, Default)]
pub struct CharacterView {
    snapshots: Vec<CharacterSnapshot>,
}

impl CharacterView {
    /// Creates a new character view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CharacterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the given character, if present.
    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&CharacterSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// State of the round derived from the surviving players.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// More than one player is alive.
    InProgress,
    /// Exactly one player survives.
    Winner(CharacterId),
    /// Nobody survives.
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&CharacterId::new(7));
        assert_round_trip(&BombId::new(42));
        assert_round_trip(&CellCoord::new(3, 9));
    }

    #[test]
    fn configuration_round_trips_through_bincode() {
        assert_round_trip(&GameConfig::default());
    }

    #[test]
    fn moving_status_mirrors_direction() {
        assert_eq!(MovingStatus::from(Direction::Left), MovingStatus::Left);
        assert_eq!(MovingStatus::from(Direction::Down), MovingStatus::Down);
    }

    #[test]
    fn character_view_lookup_uses_identifier() {
        let snapshot = |id: u32| CharacterSnapshot {
            id: CharacterId::new(id),
            name: format!("p{id}"),
            controller: Controller::Ai,
            cell: CellCoord::new(id, 0),
            pixel: PixelPoint::default(),
            life: 1,
            speed: 1,
            alive: true,
            status: MovingStatus::Still,
            score: 0,
            bombs: 1,
            bomb_power: 1,
            bomb_kind: BombKind::Time,
            armed_trigger_bombs: 0,
        };
        let view = CharacterView::from_snapshots(vec![snapshot(4), snapshot(1)]);
        assert_eq!(view.iter().next().map(|s| s.id), Some(CharacterId::new(1)));
        assert_eq!(view.get(CharacterId::new(4)).map(|s| s.cell), Some(CellCoord::new(4, 0)));
        assert!(view.get(CharacterId::new(2)).is_none());
    }
}
