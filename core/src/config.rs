//! Tuning surface for a round, deserialisable from TOML by adapters.

use serde::{Deserialize, Serialize};

use crate::{BonusKind, SimulationError};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Aggregated tuning knobs controlling every adjustable aspect of a round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport and tile geometry used by the coordinate model.
    pub viewport: ViewportConfig,
    /// Starting statistics granted to every spawned player.
    pub character: CharacterConfig,
    /// Fuse and explosion timings.
    pub bomb: BombConfig,
    /// Drop probability and weighting of bonuses hidden in breakable walls.
    pub bonus: BonusConfig,
    /// Points credited for scoring actions.
    pub score: ScoreConfig,
}

impl GameConfig {
    /// Checks every documented range, failing on the first violation.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.viewport.validate()?;
        self.character.validate()?;
        self.bomb.validate()?;
        self.bonus.validate()
    }
}

/// Viewport geometry. The grid is centred inside the viewport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width of the drawable area in pixels.
    pub width: f32,
    /// Height of the drawable area in pixels.
    pub height: f32,
    /// Unscaled side length of a tile in pixels.
    pub tile_size: f32,
    /// Multiplier applied to `tile_size` when laying out the grid.
    pub scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tile_size: 32.0,
            scale: 1.0,
        }
    }
}

impl ViewportConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(SimulationError::illegal(
                "viewport.tile_size",
                "must be a positive number",
            ));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SimulationError::illegal(
                "viewport.scale",
                "must be a positive number",
            ));
        }
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(SimulationError::illegal(
                "viewport",
                "dimensions must be finite",
            ));
        }
        Ok(())
    }
}

/// Statistics every player starts the round with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Initial life; must be positive.
    pub life: u32,
    /// Pixels travelled per accepted move; must be positive.
    pub speed: u32,
    /// Pixels added to the speed by an `AddSpeed` bonus.
    pub speed_step: u32,
    /// Bombs available at spawn.
    pub bombs: u32,
    /// Blast radius of dropped bombs, in cells.
    pub bomb_power: u32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            life: 3,
            speed: 4,
            speed_step: 1,
            bombs: 1,
            bomb_power: 2,
        }
    }
}

impl CharacterConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.life == 0 {
            return Err(SimulationError::illegal("character.life", "must be > 0"));
        }
        if self.speed == 0 {
            return Err(SimulationError::illegal("character.speed", "must be > 0"));
        }
        Ok(())
    }
}

/// Bomb timing parameters measured in simulation ticks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Ticks between dropping a time bomb and its detonation.
    pub fuse_ticks: u32,
    /// Ticks an explosion stays on its cell before clearing.
    pub explosion_ticks: u32,
    /// Whether a detonated bomb returns to its owner's inventory.
    pub refund_on_detonation: bool,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            fuse_ticks: 90,
            explosion_ticks: 20,
            refund_on_detonation: true,
        }
    }
}

impl BombConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.fuse_ticks == 0 {
            return Err(SimulationError::illegal("bomb.fuse_ticks", "must be > 0"));
        }
        if self.explosion_ticks == 0 {
            return Err(SimulationError::illegal(
                "bomb.explosion_ticks",
                "must be > 0",
            ));
        }
        Ok(())
    }
}

/// Probability model for bonuses revealed by destroyed breakable walls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// Chance in `[0, 1]` that a destroyed wall yields any bonus.
    pub spawn_probability: f64,
    /// Relative weights of the bonus kinds; they must sum to 1.0.
    pub weights: BonusWeights,
    /// Seed of the deterministic generator backing the policy.
    pub seed: u64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.25,
            weights: BonusWeights::default(),
            seed: 0x5eed_b0b5_2024_0001,
        }
    }
}

impl BonusConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(SimulationError::illegal(
                "bonus.spawn_probability",
                "must lie within [0, 1]",
            ));
        }
        self.weights.validate()
    }
}

/// Weight assigned to each [`BonusKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusWeights {
    /// Weight of [`BonusKind::AddBomb`].
    pub add_bomb: f64,
    /// Weight of [`BonusKind::AddLife`].
    pub add_life: f64,
    /// Weight of [`BonusKind::AddSpeed`].
    pub add_speed: f64,
    /// Weight of [`BonusKind::UnlockTriggerBomb`].
    pub unlock_trigger_bomb: f64,
}

impl Default for BonusWeights {
    fn default() -> Self {
        Self {
            add_bomb: 0.35,
            add_life: 0.15,
            add_speed: 0.35,
            unlock_trigger_bomb: 0.15,
        }
    }
}

impl BonusWeights {
    /// Weight configured for the provided kind.
    #[must_use]
    pub const fn weight(&self, kind: BonusKind) -> f64 {
        match kind {
            BonusKind::AddBomb => self.add_bomb,
            BonusKind::AddLife => self.add_life,
            BonusKind::AddSpeed => self.add_speed,
            BonusKind::UnlockTriggerBomb => self.unlock_trigger_bomb,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        BonusKind::ALL.iter().map(|kind| self.weight(*kind)).sum()
    }

    fn validate(&self) -> Result<(), SimulationError> {
        if BonusKind::ALL
            .iter()
            .any(|kind| !(self.weight(*kind).is_finite() && self.weight(*kind) >= 0.0))
        {
            return Err(SimulationError::illegal(
                "bonus.weights",
                "weights must be finite and non-negative",
            ));
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SimulationError::illegal(
                "bonus.weights",
                format!("weights must sum to 1.0, got {total}"),
            ));
        }
        Ok(())
    }
}

/// Points credited for scoring actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Awarded for every successful bomb drop.
    pub bomb_dropped: u32,
    /// Awarded to a bomb's owner for each breakable wall it destroys.
    pub wall_destroyed: u32,
    /// Awarded to a bomb's owner for each opponent its blast kills.
    pub opponent_killed: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            bomb_dropped: 5,
            wall_destroyed: 10,
            opponent_killed: 100,
        }
    }
}
