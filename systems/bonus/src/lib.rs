#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bonus-drop policies consulted when a blast destroys a breakable wall.

use std::fmt::Debug;

use bomb_arena_core::{BonusConfig, BonusKind, SimulationError};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;

/// Decides which bonus, if any, a destroyed breakable wall leaves behind.
///
/// The world owns exactly one policy and consults it once per destroyed wall.
pub trait BonusPolicy: Debug {
    /// Draws the bonus for a single wall destruction.
    fn roll(&mut self) -> Option<BonusKind>;
}

/// Two-stage weighted random policy.
///
/// A uniform draw below `spawn_probability` yields a bonus, whose kind comes
/// from a second draw weighted by the configured per-kind weights.
#[derive(Debug)]
pub struct WeightedBonusPolicy {
    spawn_probability: f64,
    kinds: WeightedIndex<f64>,
    rng: ChaCha8Rng,
}

impl WeightedBonusPolicy {
    /// Builds a policy from validated configuration.
    pub fn new(config: &BonusConfig) -> Result<Self, SimulationError> {
        if !(0.0..=1.0).contains(&config.spawn_probability) {
            return Err(SimulationError::illegal(
                "bonus.spawn_probability",
                "must lie within [0, 1]",
            ));
        }
        let weights = BonusKind::ALL.map(|kind| config.weights.weight(kind));
        let kinds = WeightedIndex::new(weights)
            .map_err(|error| SimulationError::illegal("bonus.weights", error.to_string()))?;
        Ok(Self {
            spawn_probability: config.spawn_probability,
            kinds,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }
}

impl BonusPolicy for WeightedBonusPolicy {
    fn roll(&mut self) -> Option<BonusKind> {
        let draw: f64 = self.rng.gen();
        if draw >= self.spawn_probability {
            return None;
        }
        let kind = BonusKind::ALL[self.kinds.sample(&mut self.rng)];
        tracing::debug!(?kind, "bonus drawn");
        Some(kind)
    }
}

/// Policy under which walls never leave a bonus.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBonus;

impl BonusPolicy for NoBonus {
    fn roll(&mut self) -> Option<BonusKind> {
        None
    }
}

/// Policy under which every wall leaves the same bonus.
#[derive(Clone, Copy, Debug)]
pub struct FixedBonus(pub BonusKind);

impl BonusPolicy for FixedBonus {
    fn roll(&mut self) -> Option<BonusKind> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_probability_never_drops() {
        let config = BonusConfig {
            spawn_probability: 0.0,
            ..BonusConfig::default()
        };
        let mut policy = WeightedBonusPolicy::new(&config).expect("policy");
        assert!((0..500).all(|_| policy.roll().is_none()));
    }

    #[test]
    fn certain_probability_always_drops() {
        let config = BonusConfig {
            spawn_probability: 1.0,
            ..BonusConfig::default()
        };
        let mut policy = WeightedBonusPolicy::new(&config).expect("policy");
        assert!((0..500).all(|_| policy.roll().is_some()));
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let mut config = BonusConfig::default();
        config.weights.add_bomb = 0.0;
        config.weights.add_life = 0.0;
        config.weights.add_speed = 0.0;
        config.weights.unlock_trigger_bomb = 0.0;
        assert!(WeightedBonusPolicy::new(&config).is_err());
    }

    #[test]
    fn same_seed_replays_same_drops() {
        let config = BonusConfig::default();
        let mut first = WeightedBonusPolicy::new(&config).expect("policy");
        let mut second = WeightedBonusPolicy::new(&config).expect("policy");
        let a: Vec<_> = (0..64).map(|_| first.roll()).collect();
        let b: Vec<_> = (0..64).map(|_| second.roll()).collect();
        assert_eq!(a, b);
    }
}
