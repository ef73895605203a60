use std::sync::Arc;

use super::*;
use crate::effects::TriggerEffect;
use crate::event::{EventKind, PreMove};
use crate::interaction::{InteractionPayload, RecordingSink};
use crate::movement::{self, CombatModifiers};
use crate::state::{Coordinate, Planet, PlannedMove, TechId};
use crate::technology;
use crate::testing::{Shield, Techs, game_on, registry};

const A: PlayerId = PlayerId(0);
const B: PlayerId = PlayerId(1);
const X: Coordinate = Coordinate::new(0, 0);
const Y: Coordinate = Coordinate::new(1, 0);

/// +1 victory point to the capturer.
struct Trophy;

impl TriggerEffect for Trophy {
    fn name(&self) -> &'static str {
        "trophy"
    }
    fn tech(&self) -> &'static str {
        "trophy"
    }
    fn event(&self) -> EventKind {
        EventKind::CapturePlanet
    }
    fn mode(&self) -> TriggerMode {
        TriggerMode::Optional
    }
    fn applies_to(&self, event: &GameEvent, _: &Game, player: PlayerId) -> bool {
        event.owner() == player
    }
    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        ctx.player_mut()?.victory_points += 1;
        Ok(())
    }
}

fn shields() -> EffectRegistry {
    registry(vec![
        Arc::new(Shield {
            name: "bulwark",
            tech: "bulwark",
            mode: TriggerMode::Mandatory,
            amount: 1,
        }) as Arc<dyn TriggerEffect>,
        Arc::new(Shield {
            name: "aegis",
            tech: "aegis",
            mode: TriggerMode::Optional,
            amount: 2,
        }),
        Arc::new(Trophy),
    ])
}

/// A (6 at X) attacks B (4 at Y); B owns both shields.
fn attack_setup() -> Game {
    let mut game = game_on(vec![
        Planet::new(X, 12).with_forces(A, 6),
        Planet::new(Y, 12).with_forces(B, 4),
    ]);
    game.players[1].gain_tech(TechId::new("bulwark"));
    game.players[1].gain_tech(TechId::new("aegis"));
    let mut plan = PlannedMove::new(Y);
    plan.set_amount(X, 6);
    game.players[0].planned_move = Some(plan);
    game
}

fn attack(
    game: &mut Game,
    effects: &EffectRegistry,
    sink: &mut RecordingSink,
    log: &mut ActionLog,
) -> Resolution {
    let techs = Techs::with(&[]);
    let env = GameEnv::new(&techs, effects);
    movement::commit_move(game, A, env, sink, log).expect("commit")
}

fn resume(
    game: &mut Game,
    effects: &EffectRegistry,
    sink: &mut RecordingSink,
    log: &mut ActionLog,
    option: &crate::interaction::InteractionId,
    responder: PlayerId,
) -> Result<Resolution, ExecuteError> {
    let payload = sink.payload(option).cloned().expect("issued payload");
    let techs = Techs::with(&[]);
    let env = GameEnv::new(&techs, effects);
    TriggerEngine::new(game, env, sink, log).resume(&payload, responder)
}

#[test]
fn mandatory_applies_without_round_trip_and_optional_is_offered_once() {
    let effects = shields();
    let mut game = attack_setup();
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();

    let resolution = attack(&mut game, &effects, &mut sink, &mut log);

    let prompt = resolution.prompt().expect("suspended");
    assert_eq!(prompt.audience, vec![B]);
    let labels: Vec<_> = prompt.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["aegis", "Decline remaining"]);

    // one offer: a single effect option, plus the decline that closes it
    let offered: Vec<_> = sink
        .issued
        .iter()
        .filter(|(_, _, payload)| matches!(payload, InteractionPayload::RespondToTrigger { .. }))
        .collect();
    assert_eq!(offered.len(), 1);
    let InteractionPayload::RespondToTrigger { player, effect, .. } = &offered[0].2 else {
        unreachable!();
    };
    assert_eq!((*player, effect.as_str()), (B, "aegis"));
    assert_eq!(offered[0].1, vec![B]);
    assert_eq!(sink.issued.len(), 2);
    assert!(matches!(
        sink.issued[1].2,
        InteractionPayload::DeclineTriggers { player: B, .. }
    ));

    let pending = game.pending_events.front().expect("pending");
    assert_eq!(pending.stage, ResolutionStage::AwaitingPlayer(B));
    let GameEvent::PreMove(PreMove { modifiers, .. }) = &pending.event else {
        panic!("expected PreMove");
    };
    assert_eq!(modifiers.defender_bonus, 1);
    assert_eq!(game.board.planet(X).unwrap().forces, 6, "nothing moved yet");
}

#[test]
fn declining_finalizes_with_no_residue() {
    let effects = shields();
    let mut game = attack_setup();
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();
    let resolution = attack(&mut game, &effects, &mut sink, &mut log);
    let decline = resolution
        .prompt()
        .and_then(|p| p.option("Decline remaining"))
        .cloned()
        .unwrap();

    let resolution = resume(&mut game, &effects, &mut sink, &mut log, &decline, B).unwrap();

    // attacker loses min(6, 4 + 1) = 5, defender loses 4
    assert!(resolution.is_resolved());
    assert!(game.pending_events.is_empty());
    let y = game.board.planet(Y).unwrap();
    assert_eq!((y.forces, y.controller()), (1, Some(A)));
    assert!(game.turn.action_taken);
    assert!(!game.players[1].tech(&TechId::new("aegis")).unwrap().exhausted);
    assert!(game.players[0].planned_move.is_none());
}

#[test]
fn accepting_the_optional_effect_applies_and_exhausts_it() {
    let effects = shields();
    let mut game = attack_setup();
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();
    let resolution = attack(&mut game, &effects, &mut sink, &mut log);
    let aegis = resolution
        .prompt()
        .and_then(|p| p.option("aegis"))
        .cloned()
        .unwrap();

    let resolution = resume(&mut game, &effects, &mut sink, &mut log, &aegis, B).unwrap();

    // bonus 3: attacker loses all 6, defender loses all 4
    assert!(resolution.is_resolved());
    assert_eq!(game.board.planet(Y).unwrap().controller(), None);
    assert!(game.players[1].tech(&TechId::new("aegis")).unwrap().exhausted);
    assert!(log.lines().iter().any(|l| l.contains("used aegis")));
}

#[test]
fn foreign_responder_is_rejected_without_changes() {
    let effects = shields();
    let mut game = attack_setup();
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();
    let resolution = attack(&mut game, &effects, &mut sink, &mut log);
    let aegis = resolution
        .prompt()
        .and_then(|p| p.option("aegis"))
        .cloned()
        .unwrap();
    let before = game.clone();

    let err = resume(&mut game, &effects, &mut sink, &mut log, &aegis, A).unwrap_err();

    assert_eq!(err, RuleError::StaleInteraction.into());
    assert_eq!(game, before);
}

#[test]
fn raising_while_suspended_is_refused() {
    let effects = shields();
    let mut game = attack_setup();
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();
    attack(&mut game, &effects, &mut sink, &mut log);

    let techs = Techs::with(&[]);
    let env = GameEnv::new(&techs, &effects);
    let err = TriggerEngine::new(&mut game, env, &mut sink, &mut log)
        .raise(crate::event::TurnBegin { player: A }.into())
        .unwrap_err();
    assert_eq!(err, RuleError::DecisionPending.into());
}

#[test]
fn follow_on_events_resolve_before_the_action_completes() {
    let effects = shields();
    let mut game = attack_setup();
    game.players[1].techs.clear();
    game.players[0].gain_tech(TechId::new("trophy"));
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();

    let resolution = attack(&mut game, &effects, &mut sink, &mut log);

    // 6 vs 4 resolved; CapturePlanet now waits for A's trophy.
    let prompt = resolution.prompt().expect("capture offer");
    assert_eq!(prompt.audience, vec![A]);
    assert_eq!(game.board.planet(Y).unwrap().forces, 2);
    assert!(!game.turn.action_taken);
    let trophy = prompt.option("trophy").cloned().unwrap();

    let resolution = resume(&mut game, &effects, &mut sink, &mut log, &trophy, A).unwrap();

    assert!(resolution.is_resolved());
    assert_eq!(game.players[0].victory_points, 1);
    assert!(game.turn.action_taken);
}

#[test]
fn unrelated_players_are_not_visited() {
    let effects = shields();
    let mut game = game_on(vec![
        Planet::new(X, 12).with_forces(A, 5),
        Planet::new(Y, 12),
    ]);
    game.players[1].gain_tech(TechId::new("aegis"));
    let mut plan = PlannedMove::new(Y);
    plan.set_amount(X, 5);
    game.players[0].planned_move = Some(plan);
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();

    let resolution = attack(&mut game, &effects, &mut sink, &mut log);

    assert!(resolution.is_resolved());
    assert!(sink.issued.is_empty());
    assert_eq!(game.board.planet(Y).unwrap().controller(), Some(A));
}

#[test]
fn tech_purchase_waits_for_a_choice() {
    let effects = EffectRegistry::empty();
    let techs = Techs::with(&[("cheap", 2), ("pricey", 9)]);
    let mut game = game_on(vec![Planet::new(X, 12).with_forces(A, 1)]);
    game.market = crate::state::TechMarket::new(
        vec![TechId::new("cheap"), TechId::new("pricey")],
        2,
    );
    game.players[0].science = 3;
    let mut sink = RecordingSink::new();
    let mut log = ActionLog::new();

    let env = GameEnv::new(&techs, &effects);
    let resolution = technology::buy_tech(&mut game, A, env, &mut sink, &mut log).unwrap();
    let prompt = resolution.prompt().expect("purchase choice");
    let labels: Vec<_> = prompt.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["cheap (2)", "Skip"]);

    let choose = prompt.option("cheap (2)").cloned().unwrap();
    let payload = sink.payload(&choose).cloned().unwrap();
    let resolution = TriggerEngine::new(&mut game, env, &mut sink, &mut log)
        .resume(&payload, A)
        .unwrap();

    assert!(resolution.is_resolved());
    assert!(game.players[0].has_tech(&TechId::new("cheap")));
    assert_eq!(game.players[0].science, 1);
    assert_eq!(game.market.offered, vec![TechId::new("pricey")]);
    assert!(game.turn.action_taken);
}

#[test]
fn shield_only_applies_to_its_owner() {
    let modifiers = CombatModifiers::default();
    let event: GameEvent = PreMove {
        player: A,
        destination: Y,
        sources: Vec::new(),
        defender: Some(B),
        modifiers,
    }
    .into();
    let game = attack_setup();
    let shield = Shield {
        name: "s",
        tech: "s",
        mode: TriggerMode::Mandatory,
        amount: 1,
    };
    assert!(shield.applies_to(&event, &game, B));
    assert!(!shield.applies_to(&event, &game, A));
}
