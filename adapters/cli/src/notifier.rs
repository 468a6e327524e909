//! Fire-and-forget notification sink fed from the world's event stream.

use bomb_arena_core::Event;

/// Receives world events. Nothing a notifier does flows back into the world.
pub(crate) trait Notifier {
    /// Observes a single event.
    fn notify(&mut self, event: &Event);
}

/// Notifier that turns explosions, pickups and deaths into log lines.
#[derive(Debug, Default)]
pub(crate) struct LogNotifier {
    detonations: u64,
    pickups: u64,
    deaths: u64,
}

impl LogNotifier {
    /// One-line tally of everything observed so far.
    pub(crate) fn summary(&self) -> String {
        format!(
            "{} detonations, {} bonuses collected, {} deaths",
            self.detonations, self.pickups, self.deaths
        )
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, event: &Event) {
        match event {
            Event::BombDetonated {
                bomb, owner, cell, ..
            } => {
                self.detonations += 1;
                tracing::info!(bomb = bomb.get(), owner = owner.get(), ?cell, "boom");
            }
            Event::BonusCollected {
                character, bonus, ..
            } => {
                self.pickups += 1;
                tracing::info!(character = character.get(), ?bonus, "bonus collected");
            }
            Event::CharacterDied { character } => {
                self.deaths += 1;
                tracing::info!(character = character.get(), "player eliminated");
            }
            other => tracing::trace!(event = ?other, "world event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomb_arena_core::{BombId, BonusKind, CellCoord, CharacterId};

    #[test]
    fn tallies_notable_events_only() {
        let mut notifier = LogNotifier::default();
        let cell = CellCoord::new(1, 1);
        for event in [
            Event::BombDetonated {
                bomb: BombId::new(0),
                owner: CharacterId::new(0),
                cell,
                power: 2,
            },
            Event::BonusCollected {
                character: CharacterId::new(0),
                bonus: BonusKind::AddLife,
                cell,
            },
            Event::TimeAdvanced { tick: 1 },
            Event::CharacterDied {
                character: CharacterId::new(1),
            },
        ] {
            notifier.notify(&event);
        }
        assert_eq!(
            notifier.summary(),
            "1 detonations, 1 bonuses collected, 1 deaths"
        );
    }
}
