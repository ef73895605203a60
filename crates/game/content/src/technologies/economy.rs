use game_core::{
    EventKind, Game, GameEvent, InvariantViolation, PlayerId, TriggerContext, TriggerEffect,
    TriggerMode,
};

use super::ids;

/// Production yields one extra force.
#[derive(Debug, Clone, Copy)]
pub struct Industrialization;

impl TriggerEffect for Industrialization {
    fn name(&self) -> &'static str {
        "industrialization"
    }

    fn tech(&self) -> &'static str {
        ids::INDUSTRIALIZATION
    }

    fn event(&self) -> EventKind {
        EventKind::BeginProduce
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Mandatory
    }

    fn label(&self) -> &'static str {
        "Industrialization (+1 force)"
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::BeginProduce(e) if e.player == player)
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        let GameEvent::BeginProduce(e) = &mut *ctx.event else {
            return Err(ctx.unexpected_event(self.name()));
        };
        e.bonus += 1;
        Ok(())
    }
}

/// Purchases cost one science less. Runs before anything else looks at the
/// purchase.
#[derive(Debug, Clone, Copy)]
pub struct ResearchGrants;

impl TriggerEffect for ResearchGrants {
    fn name(&self) -> &'static str {
        "research-grants"
    }

    fn tech(&self) -> &'static str {
        ids::RESEARCH_GRANTS
    }

    fn event(&self) -> EventKind {
        EventKind::TechPurchaseDecision
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Mandatory
    }

    fn label(&self) -> &'static str {
        "Research Grants (-1 cost)"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::TechPurchaseDecision(e) if e.player == player && e.choice.is_none())
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        let GameEvent::TechPurchaseDecision(e) = &mut *ctx.event else {
            return Err(ctx.unexpected_event(self.name()));
        };
        e.discount += 1;
        Ok(())
    }
}

/// One science at the start of each of the owner's turns.
#[derive(Debug, Clone, Copy)]
pub struct LogisticsNetwork;

impl TriggerEffect for LogisticsNetwork {
    fn name(&self) -> &'static str {
        "logistics-network"
    }

    fn tech(&self) -> &'static str {
        ids::LOGISTICS_NETWORK
    }

    fn event(&self) -> EventKind {
        EventKind::TurnBegin
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Mandatory
    }

    fn label(&self) -> &'static str {
        "Logistics Network (+1 science)"
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::TurnBegin(e) if e.player == player)
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        ctx.player_mut()?.science += 1;
        Ok(())
    }
}
