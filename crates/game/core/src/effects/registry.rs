//! Registry of technology effects.

use std::collections::HashMap;
use std::sync::Arc;

use super::TriggerEffect;
use crate::event::{EventKind, GameEvent, TriggeredEffect};
use crate::state::{Game, PlayerId, TechId};

/// Effects indexed by the event they observe and by name.
///
/// Per-kind lists are sorted by priority once, at construction. Registering
/// two effects under one name keeps the first.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    by_event: HashMap<EventKind, Vec<Arc<dyn TriggerEffect>>>,
    lookup_table: HashMap<&'static str, Arc<dyn TriggerEffect>>,
}

impl EffectRegistry {
    pub fn new(effects: Vec<Arc<dyn TriggerEffect>>) -> Self {
        let mut registry = Self::default();
        for effect in effects {
            if registry.lookup_table.contains_key(effect.name()) {
                continue;
            }
            registry
                .lookup_table
                .insert(effect.name(), Arc::clone(&effect));
            registry
                .by_event
                .entry(effect.event())
                .or_default()
                .push(effect);
        }
        for list in registry.by_event.values_mut() {
            list.sort_by_key(|e| e.priority());
        }
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Finds an effect by registry name.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn TriggerEffect>> {
        self.lookup_table.get(name)
    }

    pub fn for_event(&self, kind: EventKind) -> &[Arc<dyn TriggerEffect>] {
        self.by_event.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.lookup_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup_table.is_empty()
    }

    /// Registered names, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lookup_table.keys().copied()
    }

    /// Whether `effect` may currently trigger for `player`: the technology is
    /// owned and ready, and the effect's own predicate holds.
    pub fn is_applicable(
        effect: &dyn TriggerEffect,
        event: &GameEvent,
        game: &Game,
        player: PlayerId,
    ) -> bool {
        let tech = TechId::new(effect.tech());
        let ready = game
            .player(player)
            .and_then(|p| p.tech(&tech))
            .is_some_and(|t| !t.exhausted);
        ready && effect.applies_to(event, game, player)
    }

    /// Candidate effects for `event`, grouped by player in `order` and by
    /// priority within a player.
    pub fn candidates(
        &self,
        event: &GameEvent,
        game: &Game,
        order: &[PlayerId],
    ) -> Vec<TriggeredEffect> {
        let effects = self.for_event(event.kind());
        let mut candidates = Vec::new();
        for &player in order {
            for effect in effects {
                if Self::is_applicable(effect.as_ref(), event, game, player) {
                    candidates.push(TriggeredEffect {
                        effect: effect.name().to_string(),
                        tech: TechId::new(effect.tech()),
                        player,
                        mode: effect.mode(),
                        label: effect.label().to_string(),
                        interaction: None,
                    });
                }
            }
        }
        candidates
    }
}

impl core::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("EffectRegistry")
            .field("effects", &names)
            .finish()
    }
}
