use std::collections::HashMap;

use bomb_arena_bonus::{BonusPolicy, WeightedBonusPolicy};
use bomb_arena_core::{BonusConfig, BonusKind};

const TRIALS: usize = 20_000;

fn sample(config: &BonusConfig) -> HashMap<Option<BonusKind>, usize> {
    let mut policy = WeightedBonusPolicy::new(config).expect("policy");
    let mut counts = HashMap::new();
    for _ in 0..TRIALS {
        *counts.entry(policy.roll()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn drop_rate_converges_to_configured_probability() {
    let config = BonusConfig::default();
    let counts = sample(&config);

    let dropped = TRIALS - counts.get(&None).copied().unwrap_or(0);
    let rate = dropped as f64 / TRIALS as f64;
    assert!(
        (rate - config.spawn_probability).abs() < 0.10,
        "drop rate {rate} strayed from {}",
        config.spawn_probability
    );
}

#[test]
fn drop_rate_holds_for_thousand_walls_across_seeds() {
    for seed in [1_u64, 7, 99, 0xdead_beef] {
        let config = BonusConfig {
            seed,
            ..BonusConfig::default()
        };
        let mut policy = WeightedBonusPolicy::new(&config).expect("policy");
        let dropped = (0..1_000).filter(|_| policy.roll().is_some()).count();
        let rate = dropped as f64 / 1_000.0;
        assert!(
            (rate - 0.25).abs() < 0.10,
            "seed {seed}: drop rate {rate} outside tolerance"
        );
    }
}

#[test]
fn kind_distribution_follows_weights() {
    let config = BonusConfig {
        spawn_probability: 1.0,
        ..BonusConfig::default()
    };
    let counts = sample(&config);

    for kind in BonusKind::ALL {
        let observed = counts.get(&Some(kind)).copied().unwrap_or(0) as f64 / TRIALS as f64;
        let expected = config.weights.weight(kind);
        assert!(
            (observed - expected).abs() < 0.03,
            "{kind:?}: observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn zero_weight_kind_is_never_drawn() {
    let mut config = BonusConfig {
        spawn_probability: 1.0,
        ..BonusConfig::default()
    };
    config.weights.add_bomb = 0.5;
    config.weights.add_life = 0.0;
    config.weights.add_speed = 0.5;
    config.weights.unlock_trigger_bomb = 0.0;

    let counts = sample(&config);
    assert_eq!(counts.get(&Some(BonusKind::AddLife)), None);
    assert_eq!(counts.get(&Some(BonusKind::UnlockTriggerBomb)), None);
}
